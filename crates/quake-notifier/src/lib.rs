//! Quake alert pipeline: P2PQuake feed in, Slack documents out.
//!
//! - [`intensity`] maps seismic intensity ordinals to labels, colours and
//!   notification thresholds.
//! - [`formatting`] builds one Block Kit [`Document`](slack_notify::Document)
//!   per event.
//! - [`QuakeNotifier`] is the feed handler that filters, formats and sends.
//! - [`runner::run`] owns the connection lifecycle, reconnects and shutdown.

pub mod config;
pub mod error;
pub mod formatting;
pub mod intensity;
pub mod notifier;
pub mod runner;
pub mod sender;

pub use config::NotifierConfig;
pub use error::NotifierError;
pub use formatting::Formatter;
pub use notifier::{NotifyOutcome, QuakeNotifier};
pub use sender::{LoggingSender, NotificationSender, SlackSender};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
