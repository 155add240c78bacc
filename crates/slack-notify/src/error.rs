//! Error types for slack-notify.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when posting to Slack.
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Slack is rate limiting this token.
    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// The bot is not a member of the target channel.
    #[error("bot is not in the target channel")]
    NotInChannel,

    /// The target channel does not exist or is not visible to the bot.
    #[error("channel not found")]
    ChannelNotFound,

    /// The token is invalid, revoked or belongs to an inactive account.
    #[error("invalid credential: {0}")]
    InvalidAuth(String),

    /// Any other Web API error code.
    #[error("Slack API error: {0}")]
    Api(String),
}

impl SlackError {
    /// Classify a Web API `error` code.
    pub fn from_api_code(code: &str) -> Self {
        match code {
            "ratelimited" | "rate_limited" => Self::RateLimited { retry_after: None },
            "not_in_channel" => Self::NotInChannel,
            "channel_not_found" => Self::ChannelNotFound,
            "invalid_auth" | "not_authed" | "account_inactive" | "token_revoked"
            | "token_expired" => Self::InvalidAuth(code.to_string()),
            other => Self::Api(other.to_string()),
        }
    }

    /// Whether retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
