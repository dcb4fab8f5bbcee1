//! Results returned to the transport.

use crate::core::SessionState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a session ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "snake_case")]
pub enum FinalOutcome {
    /// No fault in the catalog matches the machine and answers.
    NoMatch,

    /// Questions ran out while several faults remained.
    Ambiguous { remaining: Vec<String> },

    /// The caller confirmed a remediation step fixed the fault.
    Success {
        fault_name: String,
        fault_description: String,
    },

    /// Every remediation step was tried without success.
    Exhausted { active_fault_name: String },
}

/// What the caller should see next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaggedResult {
    /// Ask a yes/no question. `tag` is the full `PREGUNTA: ...` property.
    Question { tag: String, text: String },

    /// Perform a remediation step and report whether it worked.
    Instruction {
        text: String,
        active_fault_name: String,
        step: u32,
        /// Set on the first step only, when the fault has just been isolated.
        #[serde(default)]
        diagnosis: Option<String>,
    },

    Final { outcome: FinalOutcome },
}

impl TaggedResult {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Question { .. } => "question",
            Self::Instruction { .. } => "instruction",
            Self::Final { .. } => "final",
        }
    }
}

impl From<FinalOutcome> for TaggedResult {
    fn from(outcome: FinalOutcome) -> Self {
        Self::Final { outcome }
    }
}

impl fmt::Display for TaggedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question { text, .. } => write!(f, "{text} (si/no)"),
            Self::Instruction {
                text,
                step,
                diagnosis: Some(diagnosis),
                ..
            } => write!(f, "Diagnosis: {diagnosis}. Step {step}: {text}"),
            Self::Instruction { text, step, .. } => write!(f, "Step {step}: {text}"),
            Self::Final { outcome } => write!(f, "{outcome}"),
        }
    }
}

impl fmt::Display for FinalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => f.write_str(
                "No known fault matches the symptoms. Please contact a specialist.",
            ),
            Self::Ambiguous { remaining } => write!(
                f,
                "The exact fault could not be determined. Remaining possibilities: {}. Please contact support.",
                remaining.join(", ")
            ),
            Self::Success {
                fault_description, ..
            } => write!(f, "Success! '{fault_description}' has been resolved."),
            Self::Exhausted { active_fault_name } => write!(
                f,
                "All remediation steps for '{active_fault_name}' have been tried. Please contact a specialist."
            ),
        }
    }
}

/// Outcome of one engine call: the result plus the successor state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub result: TaggedResult,
    pub state: SessionState,
}
