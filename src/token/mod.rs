//! Opaque, versioned session tokens.
//!
//! The transport persists the token between calls and echoes it back
//! verbatim. A token records which catalog generation the session started
//! on, so a reload never changes the meaning of its candidate indices.

use crate::core::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::TokenError;

/// Version identifier for the token format
pub const TOKEN_VERSION: u32 = 1;

/// Serializable envelope around a [`SessionState`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Token format version
    pub version: u32,

    /// Identifier shared by every token of one session
    pub session_id: Uuid,

    /// When this token was issued
    pub issued_at: DateTime<Utc>,

    /// Catalog generation the session is bound to
    pub generation: u64,

    pub state: SessionState,
}

impl SessionToken {
    /// Token for the first step of a new session.
    pub fn issue(generation: u64, state: SessionState) -> Self {
        Self {
            version: TOKEN_VERSION,
            session_id: Uuid::new_v4(),
            issued_at: Utc::now(),
            generation,
            state,
        }
    }

    /// Token for the step after this one, keeping session and generation.
    pub fn succeed(&self, state: SessionState) -> Self {
        Self {
            version: TOKEN_VERSION,
            session_id: self.session_id,
            issued_at: Utc::now(),
            generation: self.generation,
            state,
        }
    }

    pub fn to_json(&self) -> Result<String, TokenError> {
        serde_json::to_string(self).map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        let token: Self =
            serde_json::from_str(json).map_err(|e| TokenError::Decode(e.to_string()))?;
        token.check_version()
    }

    /// Compact binary form.
    pub fn to_binary(&self) -> Result<Vec<u8>, TokenError> {
        bincode::serialize(self).map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, TokenError> {
        let token: Self =
            bincode::deserialize(bytes).map_err(|e| TokenError::Decode(e.to_string()))?;
        token.check_version()
    }

    fn check_version(self) -> Result<Self, TokenError> {
        if self.version != TOKEN_VERSION {
            return Err(TokenError::UnsupportedVersion {
                found: self.version,
                supported: TOKEN_VERSION,
            });
        }
        Ok(self)
    }
}
