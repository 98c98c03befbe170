//! Error types for the storefront client.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the storefront client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Login failed; fatal for this invocation.
    #[error("login failed: {0}")]
    Auth(String),

    /// The remote returned a fault. The session-expired code never
    /// reaches callers; it is recovered inside [`crate::SessionClient`].
    #[error("({code}) {message}")]
    Fault {
        /// Numeric fault code from the remote.
        code: i32,
        /// Fault message from the remote.
        message: String,
    },

    /// A response could not be decoded into the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the remote fault code, if this is a fault.
    pub fn fault_code(&self) -> Option<i32> {
        match self {
            ClientError::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }
}
