//! The fault catalog and its document format.

use super::error::{CatalogViolation, KnowledgeError};
use crate::core::{Entry, Property};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, info};

/// Version identifier for the catalog document format
pub const CATALOG_VERSION: u32 = 1;

const DEFAULT_DESCRIPTION: &str = "Base de conocimientos Big Tools";

type Checked<T> = Validation<T, NonEmptyVec<CatalogViolation>>;

/// On-disk shape of a catalog.
///
/// Properties are kept as raw strings here; [`KnowledgeBase::from_document`]
/// parses and validates them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(alias = "__v")]
    pub version: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entries: Vec<DocumentEntry>,
}

/// A single entry as it appears in a catalog document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub props: Vec<String>,
}

/// In-memory catalog of faults.
///
/// A loaded catalog is treated as immutable: the store replaces it
/// wholesale on reload instead of editing it in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeBase {
    description: String,
    entries: Vec<Entry>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new(DEFAULT_DESCRIPTION)
    }
}

impl KnowledgeBase {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            entries: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup of an entry position by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.is_named(name))
    }

    /// Case-insensitive lookup of an entry by name.
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.position(name).map(|i| &self.entries[i])
    }

    /// Fetch an entry by name, appending an empty one if absent.
    pub fn get_or_create(&mut self, name: &str) -> &mut Entry {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.entries.push(Entry::new(name));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    /// Every distinct `PREGUNTA:` tag across the catalog.
    pub fn all_question_tags(&self) -> BTreeSet<&str> {
        self.entries.iter().flat_map(Entry::question_tags).collect()
    }

    /// Positions of entries tagged with the machine behind `machine_id`.
    pub fn candidates_for(&self, machine_id: &str) -> Vec<usize> {
        let display = machine_display_name(machine_id);
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.applies_to(&display))
            .map(|(i, _)| i)
            .collect()
    }

    /// Machines mentioned in the catalog, keyed by machine id.
    pub fn machines(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .flat_map(Entry::machines)
            .map(|name| (machine_id(name), name.to_string()))
            .collect()
    }

    /// Build a validated catalog from a parsed document.
    ///
    /// Fails on a version mismatch before looking at any entry. Otherwise
    /// all entry problems are collected and reported together.
    pub fn from_document(document: CatalogDocument) -> Result<Self, KnowledgeError> {
        if document.version != CATALOG_VERSION {
            return Err(KnowledgeError::VersionMismatch {
                found: document.version,
                supported: CATALOG_VERSION,
            });
        }

        let mut checks: Vec<Checked<()>> = Vec::new();
        let mut entries = Vec::with_capacity(document.entries.len());
        let mut seen: BTreeMap<String, String> = BTreeMap::new();

        for (position, raw) in document.entries.into_iter().enumerate() {
            checks.push(check_name(position, &raw.name, &mut seen));

            let mut properties = Vec::with_capacity(raw.props.len());
            for prop in raw.props {
                match Property::parse(prop) {
                    Ok(property) => properties.push(property),
                    Err(source) => checks.push(Validation::fail(
                        CatalogViolation::MalformedProperty {
                            entry: raw.name.clone(),
                            source,
                        },
                    )),
                }
            }

            entries.push(Entry {
                name: raw.name,
                description: raw.description,
                properties,
            });
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => {
                debug!(entries = entries.len(), "catalog document validated");
                Ok(Self {
                    description: document.description,
                    entries,
                })
            }
            Validation::Failure(errors) => Err(KnowledgeError::Invalid {
                violations: errors.iter().cloned().collect(),
            }),
        }
    }

    /// Convert back to the document shape, including the version marker.
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            version: CATALOG_VERSION,
            description: self.description.clone(),
            entries: self
                .entries
                .iter()
                .map(|e| DocumentEntry {
                    name: e.name.clone(),
                    description: e.description.clone(),
                    props: e.properties.iter().map(|p| p.raw().to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, KnowledgeError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Load a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json_str(&json)?;
        info!(path = %path.display(), entries = kb.len(), "catalog loaded");
        Ok(kb)
    }

    /// Save the catalog to a file.
    ///
    /// Writes to a sibling temp file and renames it into place so readers
    /// never see a partially written catalog.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), KnowledgeError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        write_atomic(path, &json)?;
        info!(path = %path.display(), entries = self.len(), "catalog saved");
        Ok(())
    }
}

/// Derive the display name the catalog uses for a machine id.
pub fn machine_display_name(machine_id: &str) -> String {
    machine_id.replace('_', " ")
}

/// Derive a machine id from its display name.
pub fn machine_id(display_name: &str) -> String {
    display_name.to_lowercase().replace(' ', "_")
}

pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), KnowledgeError> {
    let io_err = |source| KnowledgeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");

    fs::write(&temp, contents).map_err(io_err)?;
    if let Err(source) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(io_err(source));
    }
    debug!(path = %path.display(), bytes = contents.len(), "atomic write complete");
    Ok(())
}

fn check_name(position: usize, name: &str, seen: &mut BTreeMap<String, String>) -> Checked<()> {
    if name.trim().is_empty() {
        return Validation::fail(CatalogViolation::EmptyName { position });
    }
    match seen.get(&name.to_lowercase()) {
        Some(existing) => Validation::fail(CatalogViolation::DuplicateEntry {
            name: name.to_string(),
            existing: existing.clone(),
        }),
        None => {
            seen.insert(name.to_lowercase(), name.to_string());
            Validation::success(())
        }
    }
}
