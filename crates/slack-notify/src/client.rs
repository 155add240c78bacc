//! Slack Web API client.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::blocks::Document;
use crate::config::SlackConfig;
use crate::error::SlackError;
use crate::types::{ApiStatus, AuthInfo, PostMessageRequest, PostedMessage};

/// Client for posting notification documents to one Slack channel.
#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    config: SlackConfig,
}

impl SlackClient {
    /// Create a client. No request is made until the first call.
    pub fn new(config: SlackConfig) -> Result<Self, SlackError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(SlackError::Http)?;

        Ok(Self { http, config })
    }

    /// Verify the bot token with `auth.test`.
    pub async fn check_auth(&self) -> Result<AuthInfo, SlackError> {
        let info: AuthInfo = self.api_call("auth.test", &serde_json::json!({})).await?;
        info!(
            "Authenticated with Slack (team: {:?}, user: {:?})",
            info.team, info.user
        );
        Ok(info)
    }

    /// Post a document to the configured channel.
    pub async fn post_document(&self, document: &Document) -> Result<PostedMessage, SlackError> {
        let request = PostMessageRequest::for_document(&self.config.channel, document);
        let posted: PostedMessage = self.api_call("chat.postMessage", &request).await?;
        debug!("Posted message to {} (ts={})", posted.channel, posted.ts);
        Ok(posted)
    }

    /// Get the configuration.
    pub fn config(&self) -> &SlackConfig {
        &self.config
    }

    /// Make a Web API call.
    async fn api_call<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<R, SlackError> {
        let url = self.config.method_url(method);
        debug!("Slack API call: {}", method);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.token())
            .json(body)
            .send()
            .await
            .map_err(SlackError::Http)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(SlackError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = response.json().await.map_err(SlackError::Http)?;
        let api_status: ApiStatus = serde_json::from_value(value.clone())?;
        if !api_status.ok {
            let code = api_status.error.unwrap_or_else(|| "unknown_error".to_string());
            return Err(SlackError::from_api_code(&code));
        }

        Ok(serde_json::from_value(value)?)
    }
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("config", &self.config)
            .finish()
    }
}
