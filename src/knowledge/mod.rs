//! Fault catalog: document format, validation and snapshot management.
//!
//! Catalogs are validated in full before they become visible. Entry
//! problems are accumulated with Stillwater's `Validation` so that a
//! rejected upload reports every violation at once.

mod base;
pub mod error;
mod store;

pub use base::{
    machine_display_name, machine_id, CatalogDocument, DocumentEntry, KnowledgeBase,
    CATALOG_VERSION,
};
pub use error::{CatalogViolation, KnowledgeError};
pub use store::{KnowledgeStore, Snapshot, DEFAULT_RETAINED_SNAPSHOTS};
