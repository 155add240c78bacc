//! Notifier configuration.

use std::env;

use quake_feed::{Environment, Scale};
use slack_notify::{SlackConfig, DEFAULT_API_BASE};

use crate::error::NotifierError;
use crate::intensity::parse_threshold;

/// Default accessory image location.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://example.invalid/quake-alert/images";

/// Default notification threshold token.
pub const DEFAULT_MIN_INTENSITY: &str = "3";

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Slack credentials and target channel. `None` only in dry-run mode
    /// without credentials.
    pub slack: Option<SlackConfig>,

    /// Minimum observed intensity for earthquake notifications.
    pub threshold: Scale,

    /// Which feed endpoint to use.
    pub environment: Environment,

    /// Base URL for accessory images.
    pub image_base_url: String,

    /// Log documents instead of posting them.
    pub dry_run: bool,
}

impl NotifierConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SLACK_BOT_TOKEN`, `SLACK_CHANNEL_ID`: required unless `DRY_RUN` is set
    /// - `MIN_INTENSITY`: threshold token (default: 3)
    /// - `P2PQUAKE_SANDBOX`: use the sandbox feed (default: false)
    /// - `IMAGE_BASE_URL`: accessory image base URL
    /// - `SLACK_API_URL`: Slack API base URL (default: https://slack.com/api)
    /// - `DRY_RUN`: log documents instead of posting (default: false)
    pub fn from_env() -> Result<Self, NotifierError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let dry_run = parse_flag("DRY_RUN", get("DRY_RUN"))?;
        let sandbox = parse_flag("P2PQUAKE_SANDBOX", get("P2PQUAKE_SANDBOX"))?;

        let threshold = parse_threshold(
            get("MIN_INTENSITY")
                .as_deref()
                .unwrap_or(DEFAULT_MIN_INTENSITY),
        )?;

        let slack = match (get("SLACK_BOT_TOKEN"), get("SLACK_CHANNEL_ID")) {
            (Some(token), Some(channel)) => {
                let api_base = get("SLACK_API_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
                Some(SlackConfig::new(token.trim(), channel.trim()).with_api_base(api_base))
            }
            _ if dry_run => None,
            (None, _) => return Err(NotifierError::MissingConfig("SLACK_BOT_TOKEN".to_string())),
            (_, None) => return Err(NotifierError::MissingConfig("SLACK_CHANNEL_ID".to_string())),
        };

        let image_base_url = get("IMAGE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            slack,
            threshold,
            environment: Environment::from_sandbox_flag(sandbox),
            image_base_url,
            dry_run,
        })
    }
}

fn parse_flag(name: &str, value: Option<String>) -> Result<bool, NotifierError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(NotifierError::InvalidConfigValue {
            name: name.to_string(),
            value,
            allowed: "true, false, 1, 0, yes, no, on, off".to_string(),
        }),
    }
}
