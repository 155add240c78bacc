//! Error types for quake-feed.

use thiserror::Error;

/// Errors that can occur when talking to the P2PQuake feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// WebSocket handshake failed (network, TLS or HTTP upgrade error).
    #[error("Connection failed: {0}")]
    Connection(String),

    /// WebSocket handshake did not complete in time.
    #[error("Connection timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Transport error on an established connection.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Frame could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `connect()` was called while a session is already live.
    #[error("Client is already connected")]
    AlreadyConnected,
}

/// Error type returned by feed handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
