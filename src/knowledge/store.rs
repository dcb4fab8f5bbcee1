//! Atomically swapped catalog snapshots.
//!
//! Sessions read an `Arc<Snapshot>` and never hold the lock while working,
//! so a reload only contends with other readers for the duration of a
//! pointer swap. A failed reload leaves the active snapshot untouched.

use super::base::{write_atomic, CatalogDocument, KnowledgeBase};
use super::error::KnowledgeError;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Default number of superseded snapshots kept for in-flight sessions.
pub const DEFAULT_RETAINED_SNAPSHOTS: usize = 4;

/// An immutable catalog tagged with the generation it was published as.
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    published_at: DateTime<Utc>,
    catalog: KnowledgeBase,
}

impl Snapshot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn catalog(&self) -> &KnowledgeBase {
        &self.catalog
    }
}

#[derive(Debug)]
struct Slots {
    current: Arc<Snapshot>,
    retired: VecDeque<Arc<Snapshot>>,
}

/// Holder of the active catalog snapshot.
#[derive(Debug)]
pub struct KnowledgeStore {
    slots: RwLock<Slots>,
    retain: usize,
}

impl KnowledgeStore {
    /// Create a store whose first snapshot is generation 1.
    pub fn new(catalog: KnowledgeBase) -> Self {
        Self::with_retention(catalog, DEFAULT_RETAINED_SNAPSHOTS)
    }

    /// Create a store keeping up to `retain` superseded snapshots.
    pub fn with_retention(catalog: KnowledgeBase, retain: usize) -> Self {
        let first = Arc::new(Snapshot {
            generation: 1,
            published_at: Utc::now(),
            catalog,
        });
        Self {
            slots: RwLock::new(Slots {
                current: first,
                retired: VecDeque::new(),
            }),
            retain,
        }
    }

    /// Load the initial catalog from a file.
    pub fn open(path: impl AsRef<Path>, retain: usize) -> Result<Self, KnowledgeError> {
        Ok(Self::with_retention(KnowledgeBase::load(path)?, retain))
    }

    /// The active snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&slots.current)
    }

    /// The snapshot published as `generation`, if still retained.
    pub fn snapshot(&self, generation: u64) -> Option<Arc<Snapshot>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        if slots.current.generation == generation {
            return Some(Arc::clone(&slots.current));
        }
        slots
            .retired
            .iter()
            .find(|s| s.generation == generation)
            .cloned()
    }

    /// Make `catalog` the active snapshot.
    pub fn publish(&self, catalog: KnowledgeBase) -> Arc<Snapshot> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(Snapshot {
            generation: slots.current.generation + 1,
            published_at: Utc::now(),
            catalog,
        });
        let previous = std::mem::replace(&mut slots.current, Arc::clone(&next));
        slots.retired.push_front(previous);
        slots.retired.truncate(self.retain);

        info!(
            generation = next.generation,
            entries = next.catalog.len(),
            "catalog snapshot published"
        );
        next
    }

    /// Reload the catalog file. On failure the active snapshot stays.
    pub fn reload_from_path(&self, path: impl AsRef<Path>) -> Result<Arc<Snapshot>, KnowledgeError> {
        let path = path.as_ref();
        match KnowledgeBase::load(path) {
            Ok(catalog) => Ok(self.publish(catalog)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "catalog reload rejected");
                Err(err)
            }
        }
    }

    /// Replace the catalog file with `json` and publish it.
    ///
    /// The document is validated before anything is written; an invalid
    /// document leaves both the file and the active snapshot unchanged.
    pub fn replace_document(
        &self,
        json: &str,
        path: impl AsRef<Path>,
    ) -> Result<Arc<Snapshot>, KnowledgeError> {
        let path = path.as_ref();
        let catalog = serde_json::from_str::<CatalogDocument>(json)
            .map_err(KnowledgeError::from)
            .and_then(KnowledgeBase::from_document)
            .inspect_err(|err| warn!(error = %err, "catalog upload rejected"))?;

        write_atomic(path, &catalog.to_json_string()?)?;
        Ok(self.publish(catalog))
    }
}
