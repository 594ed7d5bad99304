//! Property-based tests for the dialog engine
//!
//! Random utterance sequences must never break the snapshot invariants.

use super::engine::TurnOutcome;
use super::state::*;
use super::*;
use crate::options::HospitalDirectory;
use futures::executor::block_on;
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn chain() -> SlotChain {
    SlotChain::appointment(Arc::new(HospitalDirectory::new())).unwrap()
}

fn step(chain: &SlotChain, state: &SessionState, utterance: &str) -> TurnOutcome {
    block_on(transition(state, chain, utterance)).unwrap()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_option_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Central Hospital"),
        Just("north hospital"),
        Just("Cardiology"),
        Just("DERMATOLOGY"),
        Just("Pediatrics"),
        Just("Dr. Garcia"),
        Just("dr. perez"),
        Just("Dr. Ruiz"),
        Just("2024-05-01 10:00"),
        Just("2024-05-03 15:00"),
    ]
    .prop_map(String::from)
}

fn arb_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_option_text(),
        1 => Just(String::new()),
        1 => Just("   ".to_string()),
        1 => "[a-zA-Z ]{1,20}",
        1 => (prop_oneof![
                Just("hospital"),
                Just("specialty"),
                Just("doctor"),
                Just("timeslot"),
            ], arb_option_text())
            .prop_map(|(slot, value)| format!("change {slot} to {value}")),
        1 => Just("change the doctor".to_string()),
        1 => Just("I want another appointment".to_string()),
    ]
}

fn run_sequence(utterances: &[String]) -> Vec<TurnOutcome> {
    let chain = chain();
    let mut state = SessionState::default();
    let mut outcomes = Vec::new();
    for utterance in utterances {
        let outcome = step(&chain, &state, utterance);
        state = outcome.state.clone();
        outcomes.push(outcome);
    }
    outcomes
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_turn(
        utterances in proptest::collection::vec(arb_utterance(), 1..25)
    ) {
        for (i, outcome) in run_sequence(&utterances).iter().enumerate() {
            if let Err(e) = outcome.state.check_invariants() {
                prop_assert!(false, "turn {} ({:?}): {}", i, utterances[i], e);
            }
            prop_assert!(!outcome.reply.is_empty());
            prop_assert!(!outcome.state.is_first_turn);
        }
    }

    #[test]
    fn prop_stored_values_are_canonical_options(
        utterances in proptest::collection::vec(arb_utterance(), 1..25)
    ) {
        let canonical = [
            "Central Hospital", "North Hospital",
            "Cardiology", "Dermatology", "Pediatrics", "Traumatology",
            "Dr. Garcia", "Dr. Perez", "Dr. Lopez", "Dr. Ruiz", "Dr. Fernandez", "Dr. Ortega",
            "2024-05-01 10:00", "2024-05-01 12:00", "2024-05-02 09:30",
            "2024-05-03 15:00", "2024-05-04 11:00",
        ];
        for outcome in run_sequence(&utterances) {
            for value in outcome.state.answers.values().flatten() {
                prop_assert!(canonical.contains(&value.as_str()), "stored {:?}", value);
            }
        }
    }

    #[test]
    fn prop_unknown_answer_leaves_state_unchanged(
        prefix in proptest::collection::vec(arb_option_text(), 0..4),
        garbage in "[0-9]{3,8}"
    ) {
        let chain = chain();
        let mut state = step(&chain, &SessionState::default(), "").state;
        for utterance in &prefix {
            state = step(&chain, &state, utterance).state;
        }
        prop_assume!(state.awaiting_input);

        let outcome = step(&chain, &state, &garbage);

        prop_assert_eq!(&outcome.state, &state);
        let expected_prefix = format!("Sorry, '{garbage}' isn't valid");
        prop_assert!(outcome.reply.starts_with(&expected_prefix));
    }

    #[test]
    fn prop_change_clears_every_later_slot(
        target in 0usize..3,
        doctor in prop_oneof![Just("Dr. Garcia"), Just("Dr. Perez")]
    ) {
        let chain = chain();
        let mut state = SessionState::default();
        for utterance in ["", "Central Hospital", "Cardiology", doctor] {
            state = step(&chain, &state, utterance).state;
        }
        let (slot, value) = [
            ("hospital", "North Hospital"),
            ("specialty", "Dermatology"),
            ("doctor", "Dr. Perez"),
        ][target];

        let outcome = step(&chain, &state, &format!("please change {slot} to {value}"));

        prop_assert_eq!(outcome.state.answer(slot), Some(value));
        for later in outcome.state.slot_order.iter().skip(target + 1) {
            prop_assert_eq!(outcome.state.answer(later), None);
        }
        prop_assert_eq!(outcome.state.cursor, target + 1);
        prop_assert!(!outcome.state.completed);
    }
}
