//! Slot chain declaration
//!
//! A chain is a fixed, totally ordered list of slots. Each slot knows how to
//! compute its valid options from the answers collected so far.

use super::state::Answers;
use crate::options::{OptionError, OptionProvider};
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Future returned by a slot's option resolver
pub type OptionsFuture = BoxFuture<'static, Result<Vec<String>, OptionError>>;

type Resolver = Arc<dyn Fn(&Answers) -> OptionsFuture + Send + Sync>;

/// Errors in a chain declaration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("Slot chain must declare at least one slot")]
    Empty,
    #[error("Slot declared twice: {0}")]
    DuplicateSlot(String),
    #[error("Slot {slot} depends on {dependency}, which is not declared before it")]
    InvalidDependency { slot: String, dependency: String },
}

/// One question in the dialog
#[derive(Clone)]
pub struct Slot {
    pub name: String,
    /// Human-readable label used in the booking summary
    pub label: String,
    /// Slots that must be filled first. Descriptive only: invalidation on
    /// change uses chain position, not these edges.
    pub dependencies: Vec<String>,
    resolver: Resolver,
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl Slot {
    pub fn new<F>(name: impl Into<String>, dependencies: &[&str], resolver: F) -> Self
    where
        F: Fn(&Answers) -> OptionsFuture + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            label: capitalize(&name),
            name,
            dependencies: dependencies.iter().map(|d| (*d).to_string()).collect(),
            resolver: Arc::new(resolver),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Query the options for this slot given the current answers
    pub async fn options(&self, answers: &Answers) -> Result<Vec<String>, OptionError> {
        let options = (self.resolver)(answers).await?;
        validate_options(&self.name, &options)?;
        Ok(options)
    }
}

/// Reject option lists the dialog cannot match against unambiguously
fn validate_options(slot: &str, options: &[String]) -> Result<(), OptionError> {
    let mut seen = HashSet::new();
    for option in options {
        if option.trim().is_empty() {
            return Err(OptionError::malformed(format!(
                "Blank option returned for {slot}"
            )));
        }
        if !seen.insert(option.to_lowercase()) {
            return Err(OptionError::malformed(format!(
                "Duplicate option '{option}' returned for {slot}"
            )));
        }
    }
    Ok(())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn answer(answers: &Answers, slot: &str) -> Option<String> {
    answers.get(slot).cloned().flatten()
}

/// Immutable ordered list of slots
#[derive(Debug, Clone)]
pub struct SlotChain {
    slots: Vec<Slot>,
}

impl SlotChain {
    pub fn new(slots: Vec<Slot>) -> Result<Self, ChainError> {
        if slots.is_empty() {
            return Err(ChainError::Empty);
        }
        let mut declared: HashSet<&str> = HashSet::new();
        for slot in &slots {
            for dependency in &slot.dependencies {
                if !declared.contains(dependency.as_str()) {
                    return Err(ChainError::InvalidDependency {
                        slot: slot.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
            if !declared.insert(slot.name.as_str()) {
                return Err(ChainError::DuplicateSlot(slot.name.clone()));
            }
        }
        Ok(Self { slots })
    }

    /// hospital → specialty → doctor → timeslot, backed by `provider`
    pub fn appointment(provider: Arc<dyn OptionProvider>) -> Result<Self, ChainError> {
        let hospitals = {
            let provider = Arc::clone(&provider);
            move |_: &Answers| -> OptionsFuture {
                let provider = Arc::clone(&provider);
                async move { provider.hospitals().await }.boxed()
            }
        };

        let specialties = {
            let provider = Arc::clone(&provider);
            move |answers: &Answers| -> OptionsFuture {
                let Some(hospital) = answer(answers, "hospital") else {
                    return future::ready(Ok(Vec::new())).boxed();
                };
                let provider = Arc::clone(&provider);
                async move { provider.specialties(&hospital).await }.boxed()
            }
        };

        let doctors = {
            let provider = Arc::clone(&provider);
            move |answers: &Answers| -> OptionsFuture {
                let (Some(hospital), Some(specialty)) =
                    (answer(answers, "hospital"), answer(answers, "specialty"))
                else {
                    return future::ready(Ok(Vec::new())).boxed();
                };
                let provider = Arc::clone(&provider);
                async move { provider.doctors(&hospital, &specialty).await }.boxed()
            }
        };

        let timeslots = move |answers: &Answers| -> OptionsFuture {
            let (Some(hospital), Some(specialty), Some(doctor)) = (
                answer(answers, "hospital"),
                answer(answers, "specialty"),
                answer(answers, "doctor"),
            ) else {
                return future::ready(Ok(Vec::new())).boxed();
            };
            let provider = Arc::clone(&provider);
            async move { provider.timeslots(&hospital, &specialty, &doctor).await }.boxed()
        };

        Self::new(vec![
            Slot::new("hospital", &[], hospitals),
            Slot::new("specialty", &["hospital"], specialties),
            Slot::new("doctor", &["hospital", "specialty"], doctors),
            Slot::new("timeslot", &["hospital", "specialty", "doctor"], timeslots)
                .with_label("Date/Time"),
        ])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn label(&self, name: &str) -> String {
        self.get(name)
            .map_or_else(|| capitalize(name), |s| s.label.clone())
    }

    /// Options for `slot` given `answers`. Unmet dependencies yield an empty list.
    pub async fn resolve_options(
        &self,
        slot: &str,
        answers: &Answers,
    ) -> Result<Vec<String>, OptionError> {
        let Some(slot) = self.get(slot) else {
            return Err(OptionError::unknown(format!("No slot named {slot}")));
        };
        slot.options(answers).await
    }
}
