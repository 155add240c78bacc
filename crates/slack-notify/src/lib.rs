//! Slack delivery for quake alerts.
//!
//! This crate provides:
//!
//! - Block Kit document types ([`Document`], [`Block`]) built by formatters
//! - A `chat.postMessage` client that classifies Slack's failure reasons
//!
//! # Example
//!
//! ```no_run
//! use slack_notify::{Block, Document, SlackClient, SlackConfig};
//!
//! # async fn example() -> Result<(), slack_notify::SlackError> {
//! let config = SlackConfig::new("xoxb-token", "C0123456789");
//! let client = SlackClient::new(config)?;
//!
//! let document = Document::new("Earthquake Information")
//!     .with_block(Block::header("Earthquake Information"))
//!     .with_block(Block::divider());
//! let posted = client.post_document(&document).await?;
//! println!("Posted at ts={}", posted.ts);
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use blocks::{Accessory, Block, BlockKind, Document, Text};
pub use client::SlackClient;
pub use config::{SlackConfig, DEFAULT_API_BASE};
pub use error::SlackError;
pub use types::{AuthInfo, PostedMessage};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
