//! Frame decoding and category dispatch tags.

use std::fmt;

use serde::Deserialize;

use super::eew::EewEvent;
use super::quake::QuakeEvent;
use super::tsunami::TsunamiEvent;

/// The event categories this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    /// Earthquake information (551).
    Quake,
    /// Tsunami forecast (552).
    Tsunami,
    /// Earthquake early warning (556).
    Eew,
}

impl EventCode {
    /// Every supported category.
    pub const ALL: [EventCode; 3] = [EventCode::Quake, EventCode::Tsunami, EventCode::Eew];

    /// Map a wire code to a category.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            551 => Some(Self::Quake),
            552 => Some(Self::Tsunami),
            556 => Some(Self::Eew),
            _ => None,
        }
    }

    /// Wire code.
    pub fn code(self) -> u32 {
        match self {
            Self::Quake => 551,
            Self::Tsunami => 552,
            Self::Eew => 556,
        }
    }

    /// Short name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quake => "quake",
            Self::Tsunami => "tsunami",
            Self::Eew => "eew",
        }
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.as_str(), self.code())
    }
}

/// A decoded feed event.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Quake(QuakeEvent),
    Tsunami(TsunamiEvent),
    Eew(EewEvent),
}

#[derive(Debug, Deserialize)]
struct FrameHeader {
    #[serde(default)]
    code: Option<u32>,
}

impl FeedEvent {
    /// Decode a text frame.
    ///
    /// Returns `Ok(None)` for frames without a code or with a code this crate
    /// does not handle.
    pub fn parse(text: &str) -> Result<Option<Self>, serde_json::Error> {
        let header: FrameHeader = serde_json::from_str(text)?;
        let Some(code) = header.code.and_then(EventCode::from_code) else {
            return Ok(None);
        };

        let event = match code {
            EventCode::Quake => Self::Quake(serde_json::from_str(text)?),
            EventCode::Tsunami => Self::Tsunami(serde_json::from_str(text)?),
            EventCode::Eew => Self::Eew(serde_json::from_str(text)?),
        };
        Ok(Some(event))
    }

    /// Category of this event.
    pub fn code(&self) -> EventCode {
        match self {
            Self::Quake(_) => EventCode::Quake,
            Self::Tsunami(_) => EventCode::Tsunami,
            Self::Eew(_) => EventCode::Eew,
        }
    }

    /// Identifying fields, for log context.
    pub fn describe(&self) -> String {
        match self {
            Self::Quake(event) => event.describe(),
            Self::Tsunami(event) => event.describe(),
            Self::Eew(event) => event.describe(),
        }
    }
}
