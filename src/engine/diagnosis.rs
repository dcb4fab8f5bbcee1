//! The two-mode fault isolation procedure.

use super::answer::Answer;
use super::error::EngineError;
use super::policy::{QuestionPolicy, RandomQuestionPolicy};
use super::result::{FinalOutcome, Step, TaggedResult};
use super::symptoms::{IgnoreDescription, SymptomExtractor};
use crate::core::{question_text, Entry, SessionState};
use crate::knowledge::{machine_display_name, KnowledgeBase};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Instruction shown when an isolated fault defines no first step.
pub const DEFAULT_FALLBACK_INSTRUCTION: &str = "Technical support is required.";

/// Stateless decision procedure over a catalog snapshot.
///
/// Every operation is a pure function of the catalog, the caller's state and
/// the input; the engine keeps nothing between calls, so one engine can
/// serve any number of concurrent sessions.
pub struct DiagnosisEngine<P = RandomQuestionPolicy, X = IgnoreDescription> {
    policy: P,
    extractor: X,
    fallback_instruction: String,
}

impl DiagnosisEngine {
    /// Engine with random question selection and an inert description.
    pub fn new() -> Self {
        Self {
            policy: RandomQuestionPolicy::new(),
            extractor: IgnoreDescription,
            fallback_instruction: DEFAULT_FALLBACK_INSTRUCTION.to_string(),
        }
    }
}

impl Default for DiagnosisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: QuestionPolicy, X: SymptomExtractor> DiagnosisEngine<P, X> {
    /// Replace the question selection policy.
    pub fn with_policy<Q: QuestionPolicy>(self, policy: Q) -> DiagnosisEngine<Q, X> {
        DiagnosisEngine {
            policy,
            extractor: self.extractor,
            fallback_instruction: self.fallback_instruction,
        }
    }

    /// Replace the symptom extractor.
    pub fn with_extractor<Y: SymptomExtractor>(self, extractor: Y) -> DiagnosisEngine<P, Y> {
        DiagnosisEngine {
            policy: self.policy,
            extractor,
            fallback_instruction: self.fallback_instruction,
        }
    }

    pub fn with_fallback_instruction(mut self, text: impl Into<String>) -> Self {
        self.fallback_instruction = text.into();
        self
    }

    pub fn fallback_instruction(&self) -> &str {
        &self.fallback_instruction
    }

    /// Start a session for `machine_id`.
    ///
    /// Candidates are every fault tagged with the machine's display name.
    /// The description only reaches the symptom extractor.
    pub fn start_session(&self, catalog: &KnowledgeBase, machine_id: &str, description: &str) -> Step {
        let mut candidates = catalog.candidates_for(machine_id);
        let mut asked = Vec::new();

        for (tag, answer) in self.extractor.extract(description, catalog) {
            if asked.contains(&tag) {
                continue;
            }
            candidates = filter_candidates(catalog, &candidates, &tag, answer);
            asked.push(tag);
        }

        debug!(
            machine_id,
            candidates = candidates.len(),
            preanswered = asked.len(),
            "diagnosis session started"
        );
        self.advance(catalog, machine_id, candidates, asked)
    }

    /// Apply `answer` to the caller's `state`.
    pub fn continue_session(
        &self,
        catalog: &KnowledgeBase,
        state: &SessionState,
        answer: Answer,
    ) -> Result<Step, EngineError> {
        let step = match state {
            SessionState::Diagnosis {
                machine_id,
                candidate_indices,
                asked_questions,
            } => {
                let Some(tag) = asked_questions.last() else {
                    return Err(reject(state, "no question has been asked"));
                };
                check_candidates(catalog, machine_id, candidate_indices)
                    .map_err(|reason| reject(state, reason))?;

                let filtered = filter_candidates(catalog, candidate_indices, tag, answer);
                debug!(
                    machine_id = %machine_id,
                    %answer,
                    before = candidate_indices.len(),
                    after = filtered.len(),
                    "candidates filtered"
                );
                self.advance(catalog, machine_id, filtered, asked_questions.clone())
            }

            SessionState::Solution {
                machine_id,
                active_fault_name,
                current_step,
            } => {
                if *current_step == 0 {
                    return Err(reject(state, "remediation steps start at 1"));
                }
                let Some(fault) = catalog.find(active_fault_name) else {
                    return Err(reject(
                        state,
                        format!("fault '{active_fault_name}' is not in the catalog"),
                    ));
                };
                self.remediate(machine_id, fault, *current_step, answer)
            }

            SessionState::Closed { .. } => {
                return Err(reject(state, "the session has already ended"));
            }
        };

        Ok(step)
    }

    /// Decide what follows a candidate set, given the questions asked so far.
    pub fn next_step(
        &self,
        catalog: &KnowledgeBase,
        candidates: &[usize],
        asked: &[String],
    ) -> TaggedResult {
        match candidates {
            [] => FinalOutcome::NoMatch.into(),
            [only] => {
                let Some(fault) = catalog.entry(*only) else {
                    return FinalOutcome::NoMatch.into();
                };
                TaggedResult::Instruction {
                    text: fault
                        .step(1)
                        .unwrap_or(self.fallback_instruction.as_str())
                        .to_string(),
                    active_fault_name: fault.name.clone(),
                    step: 1,
                    diagnosis: Some(fault.description.clone()),
                }
            }
            _ => {
                let unasked: Vec<&str> = catalog
                    .all_question_tags()
                    .into_iter()
                    .filter(|tag| !asked.iter().any(|a| a.as_str() == *tag))
                    .collect();

                let chosen = if unasked.is_empty() {
                    None
                } else {
                    self.policy.select(catalog, candidates, &unasked)
                };

                match chosen {
                    Some(tag) => TaggedResult::Question {
                        tag: tag.to_string(),
                        text: question_text(tag).to_string(),
                    },
                    None => FinalOutcome::Ambiguous {
                        remaining: candidates
                            .iter()
                            .filter_map(|&i| catalog.entry(i))
                            .map(|e| e.name.clone())
                            .collect(),
                    }
                    .into(),
                }
            }
        }
    }

    fn advance(
        &self,
        catalog: &KnowledgeBase,
        machine_id: &str,
        candidates: Vec<usize>,
        mut asked: Vec<String>,
    ) -> Step {
        let result = self.next_step(catalog, &candidates, &asked);
        let state = match &result {
            TaggedResult::Question { tag, .. } => {
                asked.push(tag.clone());
                SessionState::Diagnosis {
                    machine_id: machine_id.to_string(),
                    candidate_indices: candidates,
                    asked_questions: asked,
                }
            }
            TaggedResult::Instruction {
                active_fault_name,
                step,
                ..
            } => {
                debug!(machine_id, fault = %active_fault_name, "fault isolated");
                SessionState::Solution {
                    machine_id: machine_id.to_string(),
                    active_fault_name: active_fault_name.clone(),
                    current_step: *step,
                }
            }
            TaggedResult::Final { .. } => closed(machine_id),
        };
        Step { result, state }
    }

    fn remediate(&self, machine_id: &str, fault: &Entry, current: u32, answer: Answer) -> Step {
        if answer.is_affirmative() {
            debug!(machine_id, fault = %fault.name, step = current, "remediation succeeded");
            return Step {
                result: FinalOutcome::Success {
                    fault_name: fault.name.clone(),
                    fault_description: fault.description.clone(),
                }
                .into(),
                state: closed(machine_id),
            };
        }

        let next = current.saturating_add(1);
        match fault.step(next) {
            Some(text) => Step {
                result: TaggedResult::Instruction {
                    text: text.to_string(),
                    active_fault_name: fault.name.clone(),
                    step: next,
                    diagnosis: None,
                },
                state: SessionState::Solution {
                    machine_id: machine_id.to_string(),
                    active_fault_name: fault.name.clone(),
                    current_step: next,
                },
            },
            None => {
                debug!(machine_id, fault = %fault.name, tried = current, "remediation exhausted");
                Step {
                    result: FinalOutcome::Exhausted {
                        active_fault_name: fault.name.clone(),
                    }
                    .into(),
                    state: closed(machine_id),
                }
            }
        }
    }
}

/// Keep candidates consistent with `answer` to the question `tag`.
pub fn filter_candidates(
    catalog: &KnowledgeBase,
    candidates: &[usize],
    tag: &str,
    answer: Answer,
) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|&i| {
            catalog
                .entry(i)
                .is_some_and(|e| e.has_property(tag) == answer.is_affirmative())
        })
        .collect()
}

/// Candidates must be distinct catalog positions tagged with the session's machine.
fn check_candidates(
    catalog: &KnowledgeBase,
    machine_id: &str,
    candidates: &[usize],
) -> Result<(), String> {
    let display = machine_display_name(machine_id);
    let mut seen = BTreeSet::new();
    for &i in candidates {
        let Some(entry) = catalog.entry(i) else {
            return Err(format!("candidate index {i} is outside the catalog"));
        };
        if !seen.insert(i) {
            return Err(format!("candidate index {i} is listed twice"));
        }
        if !entry.applies_to(&display) {
            return Err(format!(
                "candidate '{}' does not apply to machine '{machine_id}'",
                entry.name
            ));
        }
    }
    Ok(())
}

fn closed(machine_id: &str) -> SessionState {
    SessionState::Closed {
        machine_id: machine_id.to_string(),
    }
}

fn reject(state: &SessionState, reason: impl Into<String>) -> EngineError {
    let err = EngineError::invalid_state(state.name(), reason);
    warn!(machine_id = state.machine_id(), error = %err, "session state rejected");
    err
}
