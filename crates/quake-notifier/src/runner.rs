//! Connection lifecycle: connect, reconnect on unrequested loss, shut down.

use std::future::Future;
use std::time::Duration;

use quake_feed::{FeedClient, FeedHandler, ReconnectConfig};
use tracing::{info, warn};

use crate::error::NotifierError;

/// How long shutdown waits for the close handshake.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Drive `client` until `shutdown` completes.
///
/// The initial connect must succeed; its error is returned unchanged so the
/// process can exit non-zero. After that, an unrequested disconnect triggers
/// reconnects with backoff per `reconnect`. In-flight notifications are not
/// awaited on shutdown.
///
/// # Example
///
/// ```ignore
/// let client = FeedClient::new(FeedConfig::production(), notifier);
/// runner::run(&client, &ReconnectConfig::default(), async {
///     let _ = tokio::signal::ctrl_c().await;
/// })
/// .await?;
/// ```
pub async fn run<H, F>(
    client: &FeedClient<H>,
    reconnect: &ReconnectConfig,
    shutdown: F,
) -> Result<(), NotifierError>
where
    H: FeedHandler + 'static,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    client.connect().await?;

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!("Shutdown signal received, disconnecting");
                client.disconnect();
                if tokio::time::timeout(CLOSE_GRACE, client.closed()).await.is_err() {
                    warn!("Feed did not close within {:?}", CLOSE_GRACE);
                }
                return Ok(());
            }

            reason = client.closed() => {
                if reason.is_requested() {
                    info!("Feed disconnected on request, stopping");
                    return Ok(());
                }
                warn!("Lost connection to feed: {:?}", reason);
                if !reconnect_with_backoff(client, reconnect, &mut shutdown).await? {
                    info!("Shutdown signal received while reconnecting");
                    return Ok(());
                }
            }
        }
    }
}

/// Retry `connect` until it succeeds (`Ok(true)`), shutdown fires
/// (`Ok(false)`) or the retry budget runs out. Shutdown also abandons a
/// handshake in progress.
async fn reconnect_with_backoff<H, F>(
    client: &FeedClient<H>,
    reconnect: &ReconnectConfig,
    shutdown: &mut std::pin::Pin<&mut F>,
) -> Result<bool, NotifierError>
where
    H: FeedHandler + 'static,
    F: Future<Output = ()>,
{
    let mut attempt = 0;
    loop {
        if !reconnect.should_retry(attempt) {
            return Err(NotifierError::ReconnectExhausted { attempts: attempt });
        }
        let delay = reconnect.delay_for_attempt(attempt);
        attempt += 1;
        info!("Reconnecting in {:?} (attempt {})", delay, attempt);

        tokio::select! {
            biased;
            () = shutdown.as_mut() => return Ok(false),
            () = tokio::time::sleep(delay) => {}
        }

        let result = tokio::select! {
            biased;
            () = shutdown.as_mut() => return Ok(false),
            result = client.connect() => result,
        };
        match result {
            Ok(()) => {
                info!("Reconnected to feed after {} attempt(s)", attempt);
                return Ok(true);
            }
            Err(e) => warn!("Reconnect attempt {} failed: {}", attempt, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use quake_feed::{EewEvent, FeedConfig, FeedError, HandlerError, QuakeEvent, TsunamiEvent};

    struct NoopHandler;

    #[async_trait]
    impl FeedHandler for NoopHandler {
        async fn on_quake(&self, _event: QuakeEvent) -> Result<(), HandlerError> {
            Ok(())
        }

        async fn on_tsunami(&self, _event: TsunamiEvent) -> Result<(), HandlerError> {
            Ok(())
        }

        async fn on_eew(&self, _event: EewEvent) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_initial_connect_failure_is_fatal() {
        let config = FeedConfig::sandbox()
            .with_endpoint("ws://127.0.0.1:9/v2/ws")
            .with_connect_timeout(Duration::from_secs(2));
        let client = FeedClient::new(config, NoopHandler);
        let polled = AtomicBool::new(false);

        let result = run(&client, &ReconnectConfig::default(), async {
            polled.store(true, Ordering::SeqCst);
        })
        .await;

        assert!(matches!(
            result,
            Err(NotifierError::Upstream(FeedError::Connection(_)))
                | Err(NotifierError::Upstream(FeedError::Timeout(_)))
        ));
        assert!(!polled.load(Ordering::SeqCst));
    }
}
