//! Yes/no answers.

use super::error::EngineError;
use std::fmt;
use std::str::FromStr;

/// A caller's reply to a question or remediation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn is_affirmative(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Answer {
    fn from(yes: bool) -> Self {
        if yes {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl FromStr for Answer {
    type Err = EngineError;

    /// Accepts `si`, `sí` and `no`, ignoring case and surrounding spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "si" | "sí" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(EngineError::InvalidAnswer {
                answer: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yes => "si",
            Self::No => "no",
        })
    }
}
