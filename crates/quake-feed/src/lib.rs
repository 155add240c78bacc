//! P2PQuake real-time feed client library.
//!
//! This crate provides a Rust client for the P2PQuake JSON API v2 WebSocket
//! feed. It supports:
//!
//! - Selecting the sandbox or production endpoint
//! - Decoding earthquake (551), tsunami (552) and early-warning (556) frames
//! - Dispatching each frame to a handler wired in at construction time
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use quake_feed::{
//!     EewEvent, FeedClient, FeedConfig, FeedHandler, HandlerError, QuakeEvent, TsunamiEvent,
//! };
//!
//! struct PrintHandler;
//!
//! #[async_trait]
//! impl FeedHandler for PrintHandler {
//!     async fn on_quake(&self, event: QuakeEvent) -> Result<(), HandlerError> {
//!         println!("quake: max scale {}", event.earthquake.max_scale);
//!         Ok(())
//!     }
//!
//!     async fn on_tsunami(&self, event: TsunamiEvent) -> Result<(), HandlerError> {
//!         println!("tsunami: {} areas", event.areas.len());
//!         Ok(())
//!     }
//!
//!     async fn on_eew(&self, event: EewEvent) -> Result<(), HandlerError> {
//!         println!("eew serial {}", event.issue.serial);
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<(), quake_feed::FeedError> {
//! let client = FeedClient::new(FeedConfig::sandbox(), PrintHandler);
//! client.connect().await?;
//! let reason = client.closed().await;
//! println!("feed closed: {:?}", reason);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod stream;
pub mod types;

pub use client::{ConnectionState, DisconnectReason, FeedClient, FeedHandler};
pub use config::{Environment, FeedConfig, PRODUCTION_ENDPOINT, SANDBOX_ENDPOINT};
pub use error::{FeedError, HandlerError};
pub use stream::ReconnectConfig;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
