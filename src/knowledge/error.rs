//! Catalog error types.

use crate::core::PropertyError;
use std::path::PathBuf;
use thiserror::Error;

/// A single problem found while validating a catalog document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogViolation {
    #[error("entry '{entry}': {source}")]
    MalformedProperty {
        entry: String,
        #[source]
        source: PropertyError,
    },

    #[error("entry at position {position} has an empty name")]
    EmptyName { position: usize },

    #[error("entry '{name}' duplicates '{existing}' (names are case-insensitive)")]
    DuplicateEntry { name: String, existing: String },
}

/// Errors that can occur while loading or saving a catalog.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The document carries a version marker this build does not read
    #[error("Unsupported catalog version {found}, supported: {supported}")]
    VersionMismatch { found: u32, supported: u32 },

    /// The document is not valid JSON or lacks required fields
    #[error("Catalog parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but one or more entries are invalid
    #[error("Catalog validation failed with {} violation(s): {}", .violations.len(), summarize(.violations))]
    Invalid { violations: Vec<CatalogViolation> },

    #[error("Catalog I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn summarize(violations: &[CatalogViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
