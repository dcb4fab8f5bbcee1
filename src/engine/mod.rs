//! Fault isolation decision procedure.
//!
//! The engine is a two-mode state machine:
//! - **Diagnosis**: yes/no questions narrow the candidate set
//! - **Solution**: the isolated fault's remediation steps, one per call
//!
//! # Pure Core
//!
//! Each call is `(catalog, state, input) -> (result, state)`. The engine
//! never stores sessions and never blocks, so callers may run any number
//! of sessions in parallel against the same catalog snapshot.
//!
//! # Example
//!
//! ```rust
//! use faultfinder::core::Property;
//! use faultfinder::engine::{Answer, DiagnosisEngine, OrderedQuestionPolicy, TaggedResult};
//! use faultfinder::knowledge::KnowledgeBase;
//!
//! let mut catalog = KnowledgeBase::default();
//! let fault = catalog.get_or_create("Fusible quemado");
//! fault.properties.push(Property::machine("Prensa"));
//! fault.properties.push(Property::step(1, "Cambiar fusible F2").unwrap());
//!
//! let engine = DiagnosisEngine::new().with_policy(OrderedQuestionPolicy);
//! let step = engine.start_session(&catalog, "prensa", "no arranca");
//! assert!(matches!(step.result, TaggedResult::Instruction { step: 1, .. }));
//!
//! let done = engine.continue_session(&catalog, &step.state, Answer::Yes).unwrap();
//! assert!(done.result.is_final());
//! ```

mod answer;
mod diagnosis;
pub mod error;
mod policy;
mod result;
mod symptoms;

pub use answer::Answer;
pub use diagnosis::{filter_candidates, DiagnosisEngine, DEFAULT_FALLBACK_INSTRUCTION};
pub use error::EngineError;
pub use policy::{OrderedQuestionPolicy, QuestionPolicy, RandomQuestionPolicy};
pub use result::{FinalOutcome, Step, TaggedResult};
pub use symptoms::{IgnoreDescription, SymptomExtractor};
