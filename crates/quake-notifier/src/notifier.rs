//! Feed handler that turns events into notifications.

use async_trait::async_trait;
use quake_feed::{EewEvent, FeedError, FeedHandler, HandlerError, QuakeEvent, Scale, TsunamiEvent};
use tracing::{debug, error, info, warn};

use crate::error::NotifierError;
use crate::formatting::Formatter;
use crate::intensity::{is_notify_worthy, to_label};
use crate::sender::NotificationSender;

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// A document was built and handed to the sender.
    Sent,
    /// The event was below the notification threshold.
    Filtered,
}

/// Binds each feed category to its pipeline.
///
/// Earthquake reports are filtered by the configured threshold before
/// formatting. Tsunami forecasts and early warnings are always sent.
pub struct QuakeNotifier<S> {
    formatter: Formatter,
    threshold: Scale,
    sender: S,
}

impl<S: NotificationSender> QuakeNotifier<S> {
    pub fn new(formatter: Formatter, threshold: Scale, sender: S) -> Self {
        Self {
            formatter,
            threshold,
            sender,
        }
    }

    /// Minimum observed intensity that triggers an earthquake notification.
    pub fn threshold(&self) -> Scale {
        self.threshold
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Classify, filter, format and send an earthquake report.
    pub async fn handle_quake(&self, event: &QuakeEvent) -> Result<NotifyOutcome, NotifierError> {
        let max_scale = event.earthquake.max_scale;
        if !is_notify_worthy(max_scale, self.threshold) {
            debug!(
                "Skipping quake {}: max intensity {} below threshold {}",
                event.id,
                to_label(max_scale),
                to_label(self.threshold)
            );
            return Ok(NotifyOutcome::Filtered);
        }

        let document = self.formatter.quake(event);
        self.sender.send(&document).await?;
        Ok(NotifyOutcome::Sent)
    }

    /// Format and send a tsunami forecast.
    pub async fn handle_tsunami(&self, event: &TsunamiEvent) -> Result<NotifyOutcome, NotifierError> {
        let document = self.formatter.tsunami(event);
        self.sender.send(&document).await?;
        Ok(NotifyOutcome::Sent)
    }

    /// Format and send an early warning.
    pub async fn handle_eew(&self, event: &EewEvent) -> Result<NotifyOutcome, NotifierError> {
        let document = self.formatter.eew(event);
        self.sender.send(&document).await?;
        Ok(NotifyOutcome::Sent)
    }
}

/// Log a per-event result. Failures are contained here so the stream keeps
/// running.
fn report(category: &str, context: &str, result: Result<NotifyOutcome, NotifierError>) {
    match result {
        Ok(NotifyOutcome::Sent) => info!("Sent {} notification ({})", category, context),
        Ok(NotifyOutcome::Filtered) => {}
        Err(e) if e.is_transient() => {
            warn!(category, event = context, "Transient failure delivering notification: {}", e)
        }
        Err(e) => error!(category, event = context, "Failed to deliver notification: {}", e),
    }
}

#[async_trait]
impl<S: NotificationSender + 'static> FeedHandler for QuakeNotifier<S> {
    async fn on_quake(&self, event: QuakeEvent) -> Result<(), HandlerError> {
        report("quake", &event.describe(), self.handle_quake(&event).await);
        Ok(())
    }

    async fn on_tsunami(&self, event: TsunamiEvent) -> Result<(), HandlerError> {
        report("tsunami", &event.describe(), self.handle_tsunami(&event).await);
        Ok(())
    }

    async fn on_eew(&self, event: EewEvent) -> Result<(), HandlerError> {
        report("eew", &event.describe(), self.handle_eew(&event).await);
        Ok(())
    }

    async fn on_error(&self, error: &FeedError) {
        warn!("Feed transport error: {}", error);
    }
}
