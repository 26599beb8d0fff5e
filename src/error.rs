//! Error types for the fatcache client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FatcacheError
pub type Result<T> = std::result::Result<T, FatcacheError>;

/// Unified error type for fatcache client operations
#[derive(Debug, Error)]
pub enum FatcacheError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    /// Peer closed the stream before a complete response arrived, or the
    /// connection had already been closed.
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timed out waiting for response")]
    Timeout,

    /// The response failed to frame or failed a semantic cross-check.
    #[error("Protocol mismatch: {0}")]
    ProtocolMismatch(String),

    /// `ERROR`, `CLIENT_ERROR <msg>` or `SERVER_ERROR <msg>` from the server.
    #[error("Server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("Set rejected (NOT_STORED): key={key} flags={flags} expiry={expiry} bytes={bytes}")]
    SetRejected {
        key: String,
        flags: u32,
        expiry: u32,
        bytes: usize,
    },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FatcacheError {
    /// Whether the connection that produced this error can no longer be
    /// trusted to be in sync with the server.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FatcacheError::Io(_)
                | FatcacheError::ConnectionClosed
                | FatcacheError::Timeout
                | FatcacheError::ProtocolMismatch(_)
        )
    }
}
