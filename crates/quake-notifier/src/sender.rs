//! Notification sender trait and implementations.

use async_trait::async_trait;
use slack_notify::{Document, SlackClient};
use tracing::info;

use crate::error::NotifierError;

/// Delivers finished documents to the notification channel.
///
/// Abstracted to support different transports (Slack, dry runs, tests).
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send one document. Each call is independent; no retry is attempted.
    async fn send(&self, document: &Document) -> Result<(), NotifierError>;
}

#[async_trait]
impl<T: NotificationSender + ?Sized> NotificationSender for Box<T> {
    async fn send(&self, document: &Document) -> Result<(), NotifierError> {
        (**self).send(document).await
    }
}

/// Posts documents to a Slack channel.
#[derive(Debug, Clone)]
pub struct SlackSender {
    client: SlackClient,
}

impl SlackSender {
    pub fn new(client: SlackClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SlackClient {
        &self.client
    }
}

#[async_trait]
impl NotificationSender for SlackSender {
    async fn send(&self, document: &Document) -> Result<(), NotifierError> {
        let posted = self.client.post_document(document).await?;
        info!(channel = %posted.channel, ts = %posted.ts, "Notification sent: {}", document.fallback_text);
        Ok(())
    }
}

/// A logging sender for dry runs that prints each document instead of
/// posting it.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl NotificationSender for LoggingSender {
    async fn send(&self, document: &Document) -> Result<(), NotifierError> {
        let blocks = serde_json::to_string(&document.blocks)
            .map_err(|e| NotifierError::Handler(format!("failed to encode blocks: {}", e)))?;
        info!(
            color = document.color.as_deref().unwrap_or("none"),
            "[dry-run] {}: {}", document.fallback_text, blocks
        );
        Ok(())
    }
}
