//! Faultfinder: stateless fault isolation over a tagged fault catalog.
//!
//! A session runs in two phases. First, yes/no questions narrow the faults
//! recorded for a machine until one remains. Then that fault's remediation
//! steps are offered one at a time until the caller reports success or the
//! steps run out.
//!
//! The engine holds no sessions. Every call takes the previous state and
//! returns the next one, so the transport only has to echo an opaque token.
//!
//! # Core Concepts
//!
//! - **Catalog**: faults tagged with `MAQUINA`, `PREGUNTA` and `SOLUCION_PASO_<n>`
//! - **Engine**: the pure decision procedure over one catalog snapshot
//! - **Session state**: the caller-held value threading progress between calls
//!
//! # Example
//!
//! ```rust
//! use faultfinder::engine::{Answer, DiagnosisEngine, FinalOutcome, OrderedQuestionPolicy, TaggedResult};
//! use faultfinder::knowledge::KnowledgeBase;
//!
//! let catalog = KnowledgeBase::from_json_str(r#"{
//!     "version": 1,
//!     "description": "demo",
//!     "entries": [
//!         {"name": "F1", "description": "Motor quemado",
//!          "props": ["MAQUINA: X", "PREGUNTA: motor enciende?", "SOLUCION_PASO_1: Cambiar motor"]},
//!         {"name": "F2", "description": "Fusible", "props": ["MAQUINA: X"]}
//!     ]
//! }"#).unwrap();
//!
//! let engine = DiagnosisEngine::new().with_policy(OrderedQuestionPolicy);
//! let step = engine.start_session(&catalog, "x", "");
//! assert!(matches!(step.result, TaggedResult::Question { .. }));
//!
//! let step = engine.continue_session(&catalog, &step.state, Answer::Yes).unwrap();
//! assert!(matches!(step.result, TaggedResult::Instruction { step: 1, .. }));
//!
//! let step = engine.continue_session(&catalog, &step.state, Answer::No).unwrap();
//! assert!(matches!(step.result, TaggedResult::Final { outcome: FinalOutcome::Exhausted { .. } }));
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod knowledge;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use config::EngineConfig;
pub use crate::core::{Entry, Property, SessionState};
pub use engine::{Answer, DiagnosisEngine, EngineError, FinalOutcome, TaggedResult};
pub use knowledge::{KnowledgeBase, KnowledgeError, KnowledgeStore};
pub use service::{DiagnosisService, ServiceError, SessionResponse};
pub use token::SessionToken;
