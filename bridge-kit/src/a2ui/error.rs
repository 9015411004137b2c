//! Error types for the A2UI bridge.

use thiserror::Error;

/// Errors surfaced by the bridge.
///
/// Recoverable protocol problems (unknown message kinds, unknown component
/// types, dangling child references) are logged and never reach this type.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The input was not well-formed JSON
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed JSON that is not a message envelope
    #[error("invalid message envelope: {0}")]
    InvalidEnvelope(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The other end of a host channel was dropped
    #[error("channel closed")]
    ChannelClosed,
}

pub type Result<T, E = BridgeError> = std::result::Result<T, E>;
