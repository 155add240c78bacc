//! Configuration types for quake-feed.

use std::time::Duration;

use crate::types::EventCode;

/// Production WebSocket endpoint.
pub const PRODUCTION_ENDPOINT: &str = "wss://api.p2pquake.net/v2/ws";

/// Sandbox WebSocket endpoint (replays sample data).
pub const SANDBOX_ENDPOINT: &str = "wss://api-realtime-sandbox.p2pquake.net/v2/ws";

/// Default timeout for the WebSocket handshake.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which P2PQuake deployment to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live data.
    #[default]
    Production,
    /// Sample data for development.
    Sandbox,
}

impl Environment {
    /// Select the environment from a sandbox flag.
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Self::Sandbox
        } else {
            Self::Production
        }
    }
}

/// Configuration for connecting to the P2PQuake feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Deployment to connect to.
    pub environment: Environment,
    /// Event categories to dispatch. Frames for other codes are ignored.
    pub codes: Vec<EventCode>,
    /// Handshake timeout.
    pub connect_timeout: Duration,
    /// Explicit endpoint, overriding the environment (local test servers).
    endpoint_override: Option<String>,
}

impl FeedConfig {
    /// Create a configuration subscribed to every supported category.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            codes: EventCode::ALL.to_vec(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            endpoint_override: None,
        }
    }

    /// Production configuration.
    pub fn production() -> Self {
        Self::new(Environment::Production)
    }

    /// Sandbox configuration.
    pub fn sandbox() -> Self {
        Self::new(Environment::Sandbox)
    }

    /// Restrict dispatch to the given categories.
    pub fn with_codes(mut self, codes: impl IntoIterator<Item = EventCode>) -> Self {
        self.codes = codes.into_iter().collect();
        self
    }

    /// Set the handshake timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Point the client at an explicit WebSocket URL.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint_override = Some(url.into());
        self
    }

    /// Get the WebSocket URL this configuration connects to.
    pub fn endpoint(&self) -> &str {
        if let Some(url) = &self.endpoint_override {
            return url;
        }
        match self.environment {
            Environment::Production => PRODUCTION_ENDPOINT,
            Environment::Sandbox => SANDBOX_ENDPOINT,
        }
    }

    /// Check whether frames of this category are dispatched.
    pub fn is_subscribed(&self, code: EventCode) -> bool {
        self.codes.contains(&code)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::production()
    }
}
