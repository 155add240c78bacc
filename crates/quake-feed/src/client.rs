//! P2PQuake feed client: connection lifecycle and handler wiring.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::error::{FeedError, HandlerError};
use crate::stream;
use crate::types::{EewEvent, QuakeEvent, TsunamiEvent};

/// Receives decoded feed events, one method per category.
///
/// Each call runs on its own task. Returned errors and panics are logged by
/// the client and never reach the connection.
#[async_trait]
pub trait FeedHandler: Send + Sync {
    /// Earthquake information (551).
    async fn on_quake(&self, event: QuakeEvent) -> Result<(), HandlerError>;

    /// Tsunami forecast (552).
    async fn on_tsunami(&self, event: TsunamiEvent) -> Result<(), HandlerError>;

    /// Earthquake early warning (556).
    async fn on_eew(&self, event: EewEvent) -> Result<(), HandlerError>;

    /// Transport error on an established connection.
    ///
    /// Default implementation does nothing; the client already logs it.
    async fn on_error(&self, error: &FeedError) {
        let _ = error;
    }
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// `disconnect()` was called or the client was dropped.
    Requested,
    /// The server closed the connection.
    ClosedByServer,
    /// The transport failed.
    Transport(String),
}

impl DisconnectReason {
    /// Whether the owner asked for this disconnect.
    pub fn is_requested(&self) -> bool {
        matches!(self, Self::Requested)
    }
}

/// Client for the P2PQuake WebSocket feed.
pub struct FeedClient<H> {
    config: FeedConfig,
    handler: Arc<H>,
    state: Arc<watch::Sender<ConnectionState>>,
    close_tx: Mutex<Option<oneshot::Sender<()>>>,
    last_reason: Arc<Mutex<Option<DisconnectReason>>>,
}

impl<H: FeedHandler + 'static> FeedClient<H> {
    /// Create a client. The endpoint is fixed by `config` for the client's lifetime.
    pub fn new(config: FeedConfig, handler: H) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            handler: Arc::new(handler),
            state: Arc::new(state),
            close_tx: Mutex::new(None),
            last_reason: Arc::new(Mutex::new(None)),
        }
    }

    /// Open the WebSocket connection and start dispatching frames.
    ///
    /// Resolves once the handshake completes or fails.
    pub async fn connect(&self) -> Result<(), FeedError> {
        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if *state == ConnectionState::Disconnected {
                *state = ConnectionState::Connecting;
                claimed = true;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Err(FeedError::AlreadyConnected);
        }
        // Back to Disconnected on failure or if this future is dropped mid-handshake.
        let mut pending = ConnectingGuard {
            state: &self.state,
            armed: true,
        };

        let url = self.config.endpoint();
        info!("Connecting to P2PQuake feed at {}", url);

        let handshake = tokio::time::timeout(self.config.connect_timeout, connect_async(url)).await;
        let ws = match handshake {
            Ok(Ok((ws, _response))) => ws,
            Ok(Err(e)) => return Err(FeedError::Connection(e.to_string())),
            Err(_) => return Err(FeedError::Timeout(self.config.connect_timeout)),
        };

        let (close_tx, close_rx) = oneshot::channel();
        *self.close_tx.lock().unwrap_or_else(PoisonError::into_inner) = Some(close_tx);
        pending.armed = false;
        self.state.send_replace(ConnectionState::Connected);
        info!("Connected to P2PQuake feed ({:?})", self.config.environment);

        let handler = Arc::clone(&self.handler);
        let codes = self.config.codes.clone();
        let state = Arc::clone(&self.state);
        let last_reason = Arc::clone(&self.last_reason);

        tokio::spawn(async move {
            let reason = stream::run_session(ws, handler, codes, close_rx).await;
            if reason.is_requested() {
                info!("Feed session ended: {:?}", reason);
            } else {
                warn!("Feed session ended: {:?}", reason);
            }
            *last_reason.lock().unwrap_or_else(PoisonError::into_inner) = Some(reason);
            state.send_replace(ConnectionState::Disconnected);
        });

        Ok(())
    }

    /// Initiate closing the connection. Does not wait for teardown.
    pub fn disconnect(&self) {
        let close_tx = self
            .close_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match close_tx {
            Some(tx) => {
                info!("Disconnecting from P2PQuake feed");
                let _ = tx.send(());
            }
            None => debug!("disconnect() called with no live session"),
        }
    }

    /// Wait until the client is disconnected and report why.
    pub async fn closed(&self) -> DisconnectReason {
        let mut rx = self.state.subscribe();
        let _ = rx
            .wait_for(|state| *state == ConnectionState::Disconnected)
            .await;
        self.last_reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or(DisconnectReason::Requested)
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Check if the client is connected.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Get the configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Get the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

struct ConnectingGuard<'a> {
    state: &'a watch::Sender<ConnectionState>,
    armed: bool,
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_replace(ConnectionState::Disconnected);
        }
    }
}

impl<H> fmt::Debug for FeedClient<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedClient")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
