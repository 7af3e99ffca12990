//! Error types for the viewport controller and its collaborators.
//!
//! The controller itself is total over its inputs; errors only arise at
//! the seams where events leave the core (session channel, encoding of
//! event logs) or where the viewer loads its configuration.

use thiserror::Error;

/// The canonical error type for RDV.
#[derive(Debug, Error)]
pub enum RdvError {
    // ── Session Errors ───────────────────────────────────────────
    /// The outbound session channel was closed by the transport side.
    #[error("session channel closed")]
    ChannelClosed,

    // ── Serialization Errors ─────────────────────────────────────
    /// Encoding or decoding of an event failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    // ── I/O Errors ───────────────────────────────────────────────
    /// Reading a script or config file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    // ── Configuration Errors ─────────────────────────────────────
    /// A configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for RdvError {
    fn from(s: String) -> Self {
        RdvError::Other(s)
    }
}

impl From<&str> for RdvError {
    fn from(s: &str) -> Self {
        RdvError::Other(s.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for RdvError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        RdvError::ChannelClosed
    }
}

impl From<serde_json::Error> for RdvError {
    fn from(e: serde_json::Error) -> Self {
        RdvError::Encoding(e.to_string())
    }
}
