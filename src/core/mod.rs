//! Core data model for fault isolation.
//!
//! This module contains the pure values every other layer works on:
//! - Tagged properties parsed from `"TAG: value"` strings
//! - Fault entries
//! - The caller-held session state
//!
//! Nothing in this module performs I/O.

mod entry;
mod property;
mod state;

pub use entry::Entry;
pub use property::{
    question_text, Property, PropertyError, PropertyKind, MACHINE_TAG, QUESTION_TAG, SEPARATOR,
    STEP_TAG_PREFIX,
};
pub use state::SessionState;
