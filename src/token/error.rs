//! Session token error types.

use thiserror::Error;

/// Errors raised while encoding or decoding a session token
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token could not be written as JSON or bincode
    #[error("Session token encoding failed: {0}")]
    Encode(String),

    /// The caller sent bytes or text that are not a session token
    #[error("Session token is unreadable: {0}")]
    Decode(String),

    /// The token was issued by an incompatible build
    #[error("Unsupported session token version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
