//! Per-turn dialog transition
//!
//! `transition` takes the stored snapshot and one utterance and returns the
//! next snapshot plus exactly one reply. The input snapshot is never touched,
//! so a failed option lookup leaves nothing half-written.

use super::intent;
use super::slots::SlotChain;
use super::state::{SessionState, SlotStatus};
use crate::options::OptionError;

/// Result of one dialog turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub state: SessionState,
    pub reply: String,
}

/// Conceptual steps of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Init,
    DetectIntent,
    PromptSlot,
    ProcessSlot,
    Complete,
}

/// What a step hands to the driver loop
enum Next {
    Go(Step),
    Reply(String),
}

/// Run one turn of the dialog
pub async fn transition(
    state: &SessionState,
    chain: &SlotChain,
    utterance: &str,
) -> Result<TurnOutcome, OptionError> {
    let mut turn = Turn::new(state.clone(), chain, utterance);
    let mut step = Step::Init;

    loop {
        let next = match step {
            Step::Init => {
                turn.init();
                Next::Go(Step::DetectIntent)
            }
            Step::DetectIntent => turn.detect_intent().await?,
            Step::PromptSlot => Next::Reply(turn.prompt_slot().await?),
            Step::ProcessSlot => turn.process_slot().await?,
            Step::Complete => Next::Reply(turn.complete()),
        };

        match next {
            Next::Go(following) => {
                tracing::trace!(from = ?step, to = ?following, "Dialog step");
                step = following;
            }
            Next::Reply(reply) => {
                return Ok(TurnOutcome {
                    state: turn.state,
                    reply,
                });
            }
        }
    }
}

struct Turn<'a> {
    state: SessionState,
    chain: &'a SlotChain,
    /// Trimmed utterance
    text: String,
    /// Trimmed, lowercased utterance
    lowered: String,
}

impl<'a> Turn<'a> {
    fn new(state: SessionState, chain: &'a SlotChain, utterance: &str) -> Self {
        let text = utterance.trim().to_string();
        let lowered = text.to_lowercase();
        Self {
            state,
            chain,
            text,
            lowered,
        }
    }

    fn init(&mut self) {
        if !self.state.is_initialized() {
            self.state.initialize(self.chain.names());
        }
    }

    async fn detect_intent(&mut self) -> Result<Next, OptionError> {
        // An explicit "change X to Y" wins even while an answer is awaited,
        // provided both the slot and the new value resolve.
        if intent::has_replacement(&self.lowered) {
            if let Some(index) = intent::change_target(&self.state, &self.lowered) {
                if let Some(value) = self.replacement_value(index).await? {
                    self.begin_change(index);
                    return self.commit_change(index, value).await.map(Next::Reply);
                }
            }
        }

        if self.state.is_first_turn || self.text.is_empty() {
            self.state.is_first_turn = false;
            return Ok(Next::Go(Step::PromptSlot));
        }

        if self.state.awaiting_input {
            return Ok(Next::Go(Step::ProcessSlot));
        }

        if let Some(index) = intent::change_target(&self.state, &self.lowered) {
            self.begin_change(index);
            return match self.replacement_value(index).await? {
                Some(value) => self.commit_change(index, value).await.map(Next::Reply),
                None => Ok(Next::Go(Step::PromptSlot)),
            };
        }

        let all_filled = self.state.all_filled();

        if all_filled && intent::wants_new_booking(&self.lowered) {
            tracing::debug!("Starting a new booking");
            self.state.reset_all();
            return Ok(Next::Go(Step::PromptSlot));
        }

        if all_filled {
            return Ok(Next::Go(Step::Complete));
        }

        // A change request that named no filled slot re-prompts rather than
        // being judged as an answer.
        if intent::mentions_change(&self.lowered) {
            return Ok(Next::Go(Step::PromptSlot));
        }

        Ok(Next::Go(Step::ProcessSlot))
    }

    async fn process_slot(&mut self) -> Result<Next, OptionError> {
        let current = self.current_slot();
        let options = self.options_for(&current).await?;

        let Some(matched) = intent::match_exact(&options, &self.text).cloned() else {
            tracing::debug!(slot = %current, "Rejected selection");
            self.state.solicit_current();
            return Ok(Next::Reply(format!(
                "Sorry, '{}' isn't valid for {current}. Choices: {}",
                self.text,
                list(&options)
            )));
        };

        self.state.fill(&current, matched.as_str());
        self.state.awaiting_input = false;

        if self.state.is_last(self.state.cursor) {
            self.state.completed = self.state.all_filled();
            return Ok(Next::Go(Step::Complete));
        }

        self.state.cursor += 1;
        self.state.solicit_current();
        let next = self.current_slot();
        let next_options = self.options_for(&next).await?;
        Ok(Next::Reply(format!(
            "Great, {matched} selected for {current}. Now choose {next}: {}",
            list(&next_options)
        )))
    }

    async fn prompt_slot(&mut self) -> Result<String, OptionError> {
        let current = self.current_slot();
        let options = self.options_for(&current).await?;
        self.state.solicit_current();
        Ok(format!(
            "Please select a {current}. Options: {}",
            list(&options)
        ))
    }

    fn complete(&self) -> String {
        if !self.state.all_filled() {
            return "We still need more information to finalise your appointment.".to_string();
        }

        let mut reply = String::from("✅ Your appointment is booked!\n");
        for name in &self.state.slot_order {
            let value = self.state.answer(name).unwrap_or_default();
            reply.push_str(&format!("• {}: {value}\n", self.chain.label(name)));
        }
        reply.push_str("\nLet me know if you'd like to change anything.");
        reply
    }

    /// Mark `index` as changing and clear every later slot
    fn begin_change(&mut self, index: usize) {
        let Some(name) = self.state.slot_name(index).map(str::to_string) else {
            return;
        };
        tracing::debug!(slot = %name, "Change requested");
        self.state.set_status(&name, SlotStatus::Changing);
        self.state.reset_from(index + 1);
        self.state.cursor = index;
        self.state.awaiting_input = false;
    }

    /// Store the replacement value and move on to the following slot
    async fn commit_change(&mut self, index: usize, value: String) -> Result<String, OptionError> {
        let name = self.current_slot();
        self.state.fill(&name, value.as_str());
        self.state.completed = self.state.all_filled();

        if self.state.is_last(index) {
            return Ok(format!("Changed {name} to {value}."));
        }

        self.state.cursor = index + 1;
        self.state.solicit_current();
        let next = self.current_slot();
        let options = self.options_for(&next).await?;
        Ok(format!(
            "Changed {name} to {value}. Please select a {next}. Options: {}",
            list(&options)
        ))
    }

    /// Option matching the "... to <value>" part of the utterance, if any
    async fn replacement_value(&self, index: usize) -> Result<Option<String>, OptionError> {
        let Some(fragment) = intent::replacement_fragment(&self.lowered) else {
            return Ok(None);
        };
        let Some(name) = self.state.slot_name(index) else {
            return Ok(None);
        };
        let options = self.options_for(name).await?;
        Ok(intent::match_fragment(&options, fragment).cloned())
    }

    fn current_slot(&self) -> String {
        self.state.current_slot().unwrap_or_default().to_string()
    }

    async fn options_for(&self, slot: &str) -> Result<Vec<String>, OptionError> {
        self.chain.resolve_options(slot, &self.state.answers).await
    }
}

fn list(options: &[String]) -> String {
    if options.is_empty() {
        "none available".to_string()
    } else {
        options.join(", ")
    }
}
