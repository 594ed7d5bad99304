//! Slot-filling dialog core
//!
//! A pure per-turn transition over a serializable session snapshot. Option
//! lookups are the only I/O, and they go through the slot chain.

mod engine;
pub mod intent;
pub mod slots;
pub mod state;

#[cfg(test)]
mod proptests;

pub use engine::transition;
pub use slots::SlotChain;
pub use state::SessionState;
