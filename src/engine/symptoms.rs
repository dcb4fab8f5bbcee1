//! Symptom extraction from the free-text problem description.

use super::answer::Answer;
use crate::knowledge::KnowledgeBase;

/// Turns a caller's description into pre-answered questions.
///
/// Each returned pair is a full `PREGUNTA: ...` tag and the answer implied
/// by the description. The engine applies them as if the caller had
/// answered those questions before the session started.
pub trait SymptomExtractor: Send + Sync {
    fn extract(&self, description: &str, catalog: &KnowledgeBase) -> Vec<(String, Answer)>;
}

/// Accepts the description but derives nothing from it.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreDescription;

impl SymptomExtractor for IgnoreDescription {
    fn extract(&self, _description: &str, _catalog: &KnowledgeBase) -> Vec<(String, Answer)> {
        Vec::new()
    }
}
