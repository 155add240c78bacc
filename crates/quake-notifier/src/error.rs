//! Error types for the notifier.

use quake_feed::FeedError;
use slack_notify::SlackError;
use thiserror::Error;

/// Errors that can occur in the alert pipeline.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// A configuration value could not be parsed.
    #[error("invalid value {value:?} for {name} (allowed: {allowed})")]
    InvalidConfigValue {
        name: String,
        value: String,
        allowed: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {0}")]
    MissingConfig(String),

    /// The upstream feed could not be reached.
    #[error("upstream connection error: {0}")]
    Upstream(#[from] FeedError),

    /// The notification could not be delivered.
    #[error("delivery error: {0}")]
    Delivery(#[from] SlackError),

    /// The feed stayed unreachable after every reconnect attempt.
    #[error("gave up reconnecting after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    /// Processing one event failed.
    #[error("handler fault: {0}")]
    Handler(String),
}

impl NotifierError {
    /// Whether this is a delivery failure that may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Delivery(e) if e.is_transient())
    }
}
