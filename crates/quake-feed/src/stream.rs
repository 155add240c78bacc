//! WebSocket session loop and per-frame dispatch.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::{FutureExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use crate::client::{DisconnectReason, FeedHandler};
use crate::error::{FeedError, HandlerError};
use crate::types::{EventCode, FeedEvent};

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Configuration for automatic reconnection.
///
/// The client never reconnects on its own; whoever owns the client drives
/// this policy after an unrequested disconnect.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of retries (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Calculate delay for a given attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Check if we should retry after the given number of attempts.
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_retries.map_or(true, |max| attempts < max)
    }
}

/// Read frames until the connection closes or a close is requested.
pub(crate) async fn run_session<H: FeedHandler + 'static>(
    mut ws: WsStream,
    handler: Arc<H>,
    codes: Vec<EventCode>,
    mut close_rx: oneshot::Receiver<()>,
) -> DisconnectReason {
    loop {
        tokio::select! {
            // Fires on disconnect() and when the client is dropped.
            _ = &mut close_rx => {
                debug!("Closing feed connection");
                if let Err(e) = ws.close(None).await {
                    debug!("Close handshake failed: {}", e);
                }
                return DisconnectReason::Requested;
            }

            frame = ws.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        dispatch_frame(&handler, &codes, text.as_str());
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Feed closed by server: {:?}", frame);
                        return DisconnectReason::ClosedByServer;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        let err = FeedError::WebSocket(e.to_string());
                        error!("Feed transport error: {}", err);
                        let reported = AssertUnwindSafe(handler.on_error(&err))
                            .catch_unwind()
                            .await;
                        if let Err(panic) = reported {
                            error!(
                                "Error handler panicked: {}",
                                panic_message(panic.as_ref())
                            );
                        }
                        return DisconnectReason::Transport(e.to_string());
                    }
                    None => {
                        info!("Feed stream ended");
                        return DisconnectReason::ClosedByServer;
                    }
                }
            }
        }
    }
}

/// Decode a text frame and dispatch it if its category is subscribed.
fn dispatch_frame<H: FeedHandler + 'static>(handler: &Arc<H>, codes: &[EventCode], text: &str) {
    let event = match FeedEvent::parse(text) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!("Ignoring frame with unhandled code");
            return;
        }
        Err(e) => {
            warn!("Failed to parse feed frame: {}", e);
            debug!("Raw frame: {}", text);
            return;
        }
    };

    if !codes.contains(&event.code()) {
        debug!("Ignoring unsubscribed category {}", event.code());
        return;
    }

    spawn_dispatch(Arc::clone(handler), event);
}

/// Run the handler for one event on its own task.
///
/// Errors and panics raised by the handler are logged here and go no further.
pub(crate) fn spawn_dispatch<H: FeedHandler + 'static>(
    handler: Arc<H>,
    event: FeedEvent,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let code = event.code();
        let context = event.describe();
        debug!("Dispatching {} {}", code, context);

        let outcome = AssertUnwindSafe(deliver(handler.as_ref(), event))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(category = %code, event = %context, "Handler failed: {}", e);
            }
            Err(panic) => {
                error!(
                    category = %code,
                    event = %context,
                    "Handler panicked: {}",
                    panic_message(panic.as_ref())
                );
            }
        }
    })
}

async fn deliver<H: FeedHandler + ?Sized>(handler: &H, event: FeedEvent) -> Result<(), HandlerError> {
    match event {
        FeedEvent::Quake(event) => handler.on_quake(event).await,
        FeedEvent::Tsunami(event) => handler.on_tsunami(event).await,
        FeedEvent::Eew(event) => handler.on_eew(event).await,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::types::{EewEvent, QuakeEvent, TsunamiEvent};

    #[test]
    fn test_reconnect_delay_backoff() {
        let config = ReconnectConfig::default();
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(config.delay_for_attempt(20), Duration::from_secs(30));
    }

    #[test]
    fn test_reconnect_should_retry() {
        let unlimited = ReconnectConfig::default();
        assert!(unlimited.should_retry(1_000));

        let limited = ReconnectConfig {
            max_retries: Some(3),
            ..Default::default()
        };
        assert!(limited.should_retry(2));
        assert!(!limited.should_retry(3));
    }

    #[derive(Default)]
    struct RecordingHandler {
        seen: Mutex<Vec<EventCode>>,
    }

    #[async_trait]
    impl FeedHandler for RecordingHandler {
        async fn on_quake(&self, _event: QuakeEvent) -> Result<(), HandlerError> {
            panic!("quake handler exploded");
        }

        async fn on_tsunami(&self, _event: TsunamiEvent) -> Result<(), HandlerError> {
            self.seen.lock().unwrap().push(EventCode::Tsunami);
            Ok(())
        }

        async fn on_eew(&self, _event: EewEvent) -> Result<(), HandlerError> {
            Err("eew handler failed".into())
        }
    }

    #[tokio::test]
    async fn test_dispatch_contains_handler_faults() {
        let handler = Arc::new(RecordingHandler::default());

        let quake = spawn_dispatch(Arc::clone(&handler), FeedEvent::Quake(QuakeEvent::default()));
        assert!(quake.await.is_ok(), "panic must not escape the dispatch task");

        let eew = spawn_dispatch(Arc::clone(&handler), FeedEvent::Eew(EewEvent::default()));
        assert!(eew.await.is_ok());

        let tsunami = spawn_dispatch(
            Arc::clone(&handler),
            FeedEvent::Tsunami(TsunamiEvent::default()),
        );
        tsunami.await.unwrap();

        assert_eq!(*handler.seen.lock().unwrap(), vec![EventCode::Tsunami]);
    }

    #[tokio::test]
    async fn test_dispatch_frame_skips_unsubscribed() {
        let handler = Arc::new(RecordingHandler::default());
        dispatch_frame(&handler, &[EventCode::Quake], r#"{"code": 552}"#);
        dispatch_frame(&handler, &[EventCode::Tsunami], r#"{"code": 555}"#);
        dispatch_frame(&handler, &[EventCode::Tsunami], "garbage");
        tokio::task::yield_now().await;
        assert!(handler.seen.lock().unwrap().is_empty());
    }
}
