//! Engine error types.

use thiserror::Error;

/// Errors surfaced by a single engine call.
///
/// Terminal business outcomes (no match, ambiguity, exhausted steps) are
/// not errors; they are returned as [`crate::engine::FinalOutcome`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The caller supplied a state inconsistent with its declared mode
    #[error("Invalid session state ({mode}): {reason}")]
    InvalidState { mode: String, reason: String },

    /// The answer was neither affirmative nor negative
    #[error("Unrecognized answer '{answer}', expected 'si' or 'no'")]
    InvalidAnswer { answer: String },
}

impl EngineError {
    pub(crate) fn invalid_state(mode: &str, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            mode: mode.to_string(),
            reason: reason.into(),
        }
    }
}
