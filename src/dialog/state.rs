//! Session state types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answers collected so far, keyed by slot name. `None` until filled.
pub type Answers = BTreeMap<String, Option<String>>;

/// Lifecycle of a single slot within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Empty,
    AwaitingInput,
    Filled,
    /// A filled slot the user asked to change; keeps its old value until replaced
    Changing,
}

/// Serializable snapshot of one conversation
///
/// Only what must survive between turns lives here. The utterance and the
/// reply of a turn are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub slot_order: Vec<String>,
    pub answers: Answers,
    pub statuses: BTreeMap<String, SlotStatus>,
    /// Index into `slot_order` of the slot being solicited
    pub cursor: usize,
    pub awaiting_input: bool,
    pub completed: bool,
    pub is_first_turn: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            slot_order: Vec::new(),
            answers: Answers::new(),
            statuses: BTreeMap::new(),
            cursor: 0,
            awaiting_input: false,
            completed: false,
            is_first_turn: true,
        }
    }
}

impl SessionState {
    /// Whether the slot list has been populated from a chain
    pub fn is_initialized(&self) -> bool {
        !self.slot_order.is_empty()
    }

    /// Populate the slot list, every slot empty, cursor at the first slot
    pub fn initialize<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slot_order = names.into_iter().map(Into::into).collect();
        self.answers = self.slot_order.iter().map(|n| (n.clone(), None)).collect();
        self.statuses = self
            .slot_order
            .iter()
            .map(|n| (n.clone(), SlotStatus::Empty))
            .collect();
        self.cursor = 0;
        self.completed = false;
    }

    pub fn slot_name(&self, index: usize) -> Option<&str> {
        self.slot_order.get(index).map(String::as_str)
    }

    pub fn current_slot(&self) -> Option<&str> {
        self.slot_name(self.cursor)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.slot_order.len()
    }

    pub fn answer(&self, slot: &str) -> Option<&str> {
        self.answers.get(slot).and_then(|v| v.as_deref())
    }

    pub fn status(&self, slot: &str) -> SlotStatus {
        self.statuses.get(slot).copied().unwrap_or_default()
    }

    pub fn set_status(&mut self, slot: &str, status: SlotStatus) {
        self.statuses.insert(slot.to_string(), status);
    }

    /// Store a value and mark the slot filled
    pub fn fill(&mut self, slot: &str, value: impl Into<String>) {
        self.answers.insert(slot.to_string(), Some(value.into()));
        self.set_status(slot, SlotStatus::Filled);
    }

    pub fn all_filled(&self) -> bool {
        self.is_initialized() && self.answers.values().all(Option::is_some)
    }

    /// Clear value and status of every slot at `from` or later
    pub fn reset_from(&mut self, from: usize) {
        for name in self.slot_order.iter().skip(from) {
            self.answers.insert(name.clone(), None);
            self.statuses.insert(name.clone(), SlotStatus::Empty);
        }
        self.completed = self.all_filled();
    }

    /// Clear every slot and move the cursor back to the start
    pub fn reset_all(&mut self) {
        self.reset_from(0);
        self.cursor = 0;
        self.awaiting_input = false;
    }

    /// Mark the slot at the cursor as the one being asked for
    pub fn solicit_current(&mut self) {
        if let Some(name) = self.current_slot().map(str::to_string) {
            if self.status(&name) != SlotStatus::Changing {
                self.set_status(&name, SlotStatus::AwaitingInput);
            }
        }
        self.awaiting_input = true;
    }

    /// Check the structural invariants a stored snapshot must satisfy
    #[cfg(test)]
    pub fn check_invariants(&self) -> Result<(), String> {
        let keys: Vec<&String> = self.slot_order.iter().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        if self.answers.keys().collect::<Vec<_>>() != sorted {
            return Err("answers keys differ from slot_order".to_string());
        }
        if self.statuses.keys().collect::<Vec<_>>() != sorted {
            return Err("statuses keys differ from slot_order".to_string());
        }
        if self.completed != self.all_filled() {
            return Err(format!(
                "completed={} but all_filled={}",
                self.completed,
                self.all_filled()
            ));
        }
        if self.is_initialized() && self.cursor >= self.slot_order.len() {
            return Err(format!("cursor {} out of range", self.cursor));
        }
        if self.awaiting_input {
            let current = self.current_slot().unwrap_or_default();
            let status = self.status(current);
            if !matches!(status, SlotStatus::AwaitingInput | SlotStatus::Changing) {
                return Err(format!("awaiting input for {current} but status is {status:?}"));
            }
        }
        for (name, value) in &self.answers {
            let status = self.status(name);
            match (value, status) {
                (Some(_), SlotStatus::Empty) => {
                    return Err(format!("{name} has a value but is Empty"));
                }
                (None, SlotStatus::Filled | SlotStatus::Changing) => {
                    return Err(format!("{name} is {status:?} without a value"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
