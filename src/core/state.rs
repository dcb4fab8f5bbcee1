//! Session state threaded through the caller.
//!
//! The engine keeps no server-side session. Every call receives the
//! previous [`SessionState`] and hands back its successor as a new value.

use serde::{Deserialize, Serialize};

/// Progress of one diagnosis session.
///
/// States are immutable values: the engine never mutates the state it was
/// given, it returns a new one.
///
/// # Example
///
/// ```rust
/// use faultfinder::core::SessionState;
///
/// let state = SessionState::Solution {
///     machine_id: "torno_cnc".to_string(),
///     active_fault_name: "Husillo bloqueado".to_string(),
///     current_step: 1,
/// };
///
/// assert_eq!(state.name(), "solution");
/// assert_eq!(state.machine_id(), "torno_cnc");
/// assert!(!state.is_final());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Narrowing the candidate set with yes/no questions.
    Diagnosis {
        machine_id: String,
        /// Positions into the catalog snapshot; order is irrelevant.
        candidate_indices: Vec<usize>,
        /// Question tags already asked, most recent last.
        asked_questions: Vec<String>,
    },

    /// Walking the remediation script of an isolated fault.
    Solution {
        machine_id: String,
        active_fault_name: String,
        /// 1-based index of the step last shown to the caller.
        current_step: u32,
    },

    /// The session reached a terminal result.
    Closed { machine_id: String },
}

impl SessionState {
    /// Mode name for display and logging.
    pub fn name(&self) -> &str {
        match self {
            Self::Diagnosis { .. } => "diagnosis",
            Self::Solution { .. } => "solution",
            Self::Closed { .. } => "closed",
        }
    }

    pub fn machine_id(&self) -> &str {
        match self {
            Self::Diagnosis { machine_id, .. }
            | Self::Solution { machine_id, .. }
            | Self::Closed { machine_id } => machine_id,
        }
    }

    /// Terminal states accept no further answers.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// Number of remaining candidates, when diagnosing.
    pub fn candidate_count(&self) -> Option<usize> {
        match self {
            Self::Diagnosis {
                candidate_indices, ..
            } => Some(candidate_indices.len()),
            _ => None,
        }
    }
}
