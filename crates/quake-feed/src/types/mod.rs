//! Types for the P2PQuake feed.

pub mod eew;
pub mod frame;
pub mod quake;
pub mod scale;
pub mod tsunami;

pub use eew::*;
pub use frame::*;
pub use quake::*;
pub use scale::*;
pub use tsunami::*;
