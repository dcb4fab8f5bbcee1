//! Transport-facing facade.
//!
//! Exposes the two session operations with an opaque string token in
//! place of the structured state, plus the administrative reload path.
//! HTTP handling and credential checks live outside this crate.

use crate::config::EngineConfig;
use crate::engine::{
    Answer, DiagnosisEngine, EngineError, IgnoreDescription, QuestionPolicy, Step,
    SymptomExtractor, TaggedResult,
};
use crate::knowledge::{KnowledgeError, KnowledgeStore, Snapshot};
use crate::token::{SessionToken, TokenError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned to the transport.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    /// The session started on a catalog generation that is no longer kept
    #[error("Session was bound to catalog generation {generation}, which is no longer available")]
    StaleSnapshot { generation: u64 },

    #[error("Missing required input '{field}'")]
    MissingInput { field: &'static str },
}

/// One reply to the transport: what to show, and the token to echo back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub result: TaggedResult,
    /// Opaque session token; send it back unchanged on the next call.
    pub state: String,
}

/// Diagnosis sessions over a reloadable catalog.
pub struct DiagnosisService<P = Box<dyn QuestionPolicy>, X = IgnoreDescription> {
    store: Arc<KnowledgeStore>,
    engine: DiagnosisEngine<P, X>,
    catalog_path: Option<PathBuf>,
}

impl DiagnosisService {
    /// Open the configured catalog and build the configured engine.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ServiceError> {
        let store = KnowledgeStore::open(&config.catalog_path, config.retained_snapshots)?;
        Ok(Self {
            store: Arc::new(store),
            engine: config.engine(),
            catalog_path: Some(config.catalog_path.clone()),
        })
    }
}

impl<P: QuestionPolicy, X: SymptomExtractor> DiagnosisService<P, X> {
    pub fn new(store: Arc<KnowledgeStore>, engine: DiagnosisEngine<P, X>) -> Self {
        Self {
            store,
            engine,
            catalog_path: None,
        }
    }

    /// Set the file used by [`Self::reload`] and [`Self::replace_catalog`].
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    /// Machines known to the active catalog, keyed by machine id.
    pub fn machines(&self) -> BTreeMap<String, String> {
        self.store.current().catalog().machines()
    }

    /// Begin a session for `machine_id` on the active catalog.
    pub fn start_session(
        &self,
        machine_id: &str,
        description: &str,
    ) -> Result<SessionResponse, ServiceError> {
        if machine_id.trim().is_empty() {
            return Err(ServiceError::MissingInput {
                field: "machine_id",
            });
        }

        let snapshot = self.store.current();
        let Step { result, state } =
            self.engine
                .start_session(snapshot.catalog(), machine_id, description);
        let token = SessionToken::issue(snapshot.generation(), state);
        info!(
            session = %token.session_id,
            machine_id,
            generation = snapshot.generation(),
            result = result.kind(),
            "session started"
        );

        Ok(SessionResponse {
            result,
            state: token.to_json()?,
        })
    }

    /// Apply the caller's answer to the session in `token`.
    pub fn continue_session(
        &self,
        token: &str,
        answer: &str,
    ) -> Result<SessionResponse, ServiceError> {
        let token = SessionToken::from_json(token)?;
        let answer: Answer = answer.parse()?;
        let snapshot = self.snapshot_for(&token)?;

        let Step { result, state } =
            self.engine
                .continue_session(snapshot.catalog(), &token.state, answer)?;
        let next = token.succeed(state);
        info!(
            session = %next.session_id,
            mode = next.state.name(),
            result = result.kind(),
            "session advanced"
        );

        Ok(SessionResponse {
            result,
            state: next.to_json()?,
        })
    }

    /// Re-read the catalog file. The active catalog is kept on failure.
    pub fn reload(&self) -> Result<u64, ServiceError> {
        let path = self.catalog_path()?;
        Ok(self.store.reload_from_path(path)?.generation())
    }

    /// Validate, persist and publish an uploaded catalog document.
    pub fn replace_catalog(&self, json: &str) -> Result<u64, ServiceError> {
        let path = self.catalog_path()?;
        Ok(self.store.replace_document(json, path)?.generation())
    }

    fn catalog_path(&self) -> Result<&PathBuf, ServiceError> {
        self.catalog_path
            .as_ref()
            .ok_or(ServiceError::MissingInput {
                field: "catalog_path",
            })
    }

    fn snapshot_for(&self, token: &SessionToken) -> Result<Arc<Snapshot>, ServiceError> {
        self.store.snapshot(token.generation).ok_or_else(|| {
            warn!(
                session = %token.session_id,
                generation = token.generation,
                "session bound to a retired catalog"
            );
            ServiceError::StaleSnapshot {
                generation: token.generation,
            }
        })
    }
}
