//! Fault records.

use super::property::{Property, PropertyKind};

/// One diagnosable failure mode in the catalog.
///
/// Names are unique within a catalog under case-insensitive comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub description: String,
    pub properties: Vec<Property>,
}

impl Entry {
    /// Create an entry with an empty description and no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            properties: Vec::new(),
        }
    }

    /// Builder-style description setter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style property append.
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// True when a property with exactly this raw text is present.
    pub fn has_property(&self, raw: &str) -> bool {
        self.properties.iter().any(|p| p.raw() == raw)
    }

    /// True when the entry applies to the machine with this display name.
    ///
    /// Display names are compared case-insensitively.
    pub fn applies_to(&self, display_name: &str) -> bool {
        let wanted = display_name.to_lowercase();
        self.machines().any(|m| m.to_lowercase() == wanted)
    }

    /// Machine display names this fault is tagged with.
    pub fn machines(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().filter_map(|p| match p.kind() {
            PropertyKind::Machine(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Question tags (full `PREGUNTA: ...` strings) carried by this entry.
    pub fn question_tags(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|p| p.is_question())
            .map(Property::raw)
    }

    /// Text of remediation step `index`, if the entry defines it.
    ///
    /// Steps may be sparse; the first matching property wins.
    pub fn step(&self, index: u32) -> Option<&str> {
        self.properties.iter().find_map(|p| match p.kind() {
            PropertyKind::SolutionStep { index: i, text } if *i == index => Some(text.as_str()),
            _ => None,
        })
    }
}
