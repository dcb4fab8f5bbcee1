//! Tagged fault properties.
//!
//! Catalog documents store properties as `"TAG: value"` strings. They are
//! parsed once, at load time, into a [`Property`] so that malformed entries
//! are rejected before any session touches them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Separator between a property tag and its value.
pub const SEPARATOR: &str = ": ";

/// Tag naming the machine a fault applies to.
pub const MACHINE_TAG: &str = "MAQUINA";

/// Tag for a yes/no disambiguating question.
pub const QUESTION_TAG: &str = "PREGUNTA";

/// Prefix of the numbered remediation step tags (`SOLUCION_PASO_<n>`).
pub const STEP_TAG_PREFIX: &str = "SOLUCION_PASO_";

/// Reasons a raw property string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PropertyError {
    #[error("property '{raw}' has no ': ' separator")]
    MissingSeparator { raw: String },

    #[error("property '{raw}' has an invalid remediation step index")]
    InvalidStepIndex { raw: String },
}

/// What a property means to the decision procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// `MAQUINA: <display name>`
    Machine(String),

    /// `PREGUNTA: <question text>`
    Question(String),

    /// `SOLUCION_PASO_<index>: <instruction>`; index is 1-based.
    SolutionStep { index: u32, text: String },

    /// Any other tag. Kept so that save reproduces the catalog.
    Other { tag: String, value: String },
}

/// A parsed property that remembers its original spelling.
///
/// Equality and serialization use the raw string, which is also what
/// question tags are matched against during filtering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Property {
    raw: String,
    kind: PropertyKind,
}

impl Property {
    /// Parse a `"TAG: value"` string. Only the first separator splits.
    pub fn parse(raw: impl Into<String>) -> Result<Self, PropertyError> {
        let raw = raw.into();
        let Some((tag, value)) = raw.split_once(SEPARATOR) else {
            return Err(PropertyError::MissingSeparator { raw });
        };

        let kind = if tag == MACHINE_TAG {
            PropertyKind::Machine(value.to_string())
        } else if tag == QUESTION_TAG {
            PropertyKind::Question(value.to_string())
        } else if let Some(index) = tag.strip_prefix(STEP_TAG_PREFIX) {
            match index.parse::<u32>() {
                Ok(index) if index >= 1 => PropertyKind::SolutionStep {
                    index,
                    text: value.to_string(),
                },
                _ => return Err(PropertyError::InvalidStepIndex { raw }),
            }
        } else {
            PropertyKind::Other {
                tag: tag.to_string(),
                value: value.to_string(),
            }
        };

        Ok(Self { raw, kind })
    }

    /// Build a `MAQUINA` property.
    pub fn machine(name: &str) -> Self {
        Self {
            raw: format!("{MACHINE_TAG}{SEPARATOR}{name}"),
            kind: PropertyKind::Machine(name.to_string()),
        }
    }

    /// Build a `PREGUNTA` property.
    pub fn question(text: &str) -> Self {
        Self {
            raw: format!("{QUESTION_TAG}{SEPARATOR}{text}"),
            kind: PropertyKind::Question(text.to_string()),
        }
    }

    /// Build a `SOLUCION_PASO_<index>` property. `index` must be at least 1.
    pub fn step(index: u32, text: &str) -> Result<Self, PropertyError> {
        Self::parse(format!("{STEP_TAG_PREFIX}{index}{SEPARATOR}{text}"))
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// The text after the first separator.
    pub fn value(&self) -> &str {
        match &self.kind {
            PropertyKind::Machine(v) | PropertyKind::Question(v) => v,
            PropertyKind::SolutionStep { text, .. } => text,
            PropertyKind::Other { value, .. } => value,
        }
    }

    pub fn is_question(&self) -> bool {
        matches!(self.kind, PropertyKind::Question(_))
    }
}

impl TryFrom<String> for Property {
    type Error = PropertyError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<Property> for String {
    fn from(property: Property) -> Self {
        property.raw
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Extract the question text from a full `PREGUNTA: ...` tag.
///
/// Falls back to the whole tag when it carries no separator.
pub fn question_text(tag: &str) -> &str {
    tag.split_once(SEPARATOR).map_or(tag, |(_, text)| text)
}
