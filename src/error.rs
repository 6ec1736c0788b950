//! Error types for photon-bridge
//!
//! Provides a unified error type for all operations, plus a coarse
//! [`ErrorKind`] so callers can branch on the failure class without
//! matching on message text.

use thiserror::Error;

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type for photon-bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection error ({context}): {source}")]
    Connection {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Truncated payload: need {needed} bytes at offset {offset}, {remaining} remaining")]
    TruncatedPayload {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Unsupported value shape: {0}")]
    UnsupportedShape(String),

    #[error("Unexpected response to {command}: {found}")]
    UnexpectedResponse { command: String, found: String },

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    #[error("Server error {code}: {message}")]
    Server { code: u32, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse failure class of a [`BridgeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Could not connect, or the stream ended before a full frame arrived
    Connection,

    /// Unknown tag, bad length, bad UTF-8, or a response of the wrong shape
    Protocol,

    /// Nested or otherwise unsupported composite value
    UnsupportedShape,

    /// The server answered with an error value
    Server,

    /// Configuration could not be resolved
    Config,
}

impl BridgeError {
    /// Wrap an I/O error with a short description of what was being attempted
    pub fn connection(context: impl Into<String>, source: std::io::Error) -> Self {
        BridgeError::Connection {
            context: context.into(),
            source,
        }
    }

    /// Get the failure class
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::Connection { .. } | BridgeError::ConnectionClosed(_) => {
                ErrorKind::Connection
            }
            BridgeError::Protocol(_)
            | BridgeError::TruncatedPayload { .. }
            | BridgeError::UnexpectedResponse { .. } => ErrorKind::Protocol,
            BridgeError::UnsupportedShape(_) => ErrorKind::UnsupportedShape,
            BridgeError::Server { .. } => ErrorKind::Server,
            BridgeError::Config(_) => ErrorKind::Config,
        }
    }

    /// True when decoding ran past the end of the buffer
    pub fn is_truncated(&self) -> bool {
        matches!(self, BridgeError::TruncatedPayload { .. })
    }
}
