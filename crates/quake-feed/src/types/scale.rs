//! Seismic intensity ordinal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw seismic intensity ordinal as carried on the wire.
///
/// The scale is not contiguous: `45` (5-) and `50` (5+) are distinct steps
/// between `40` (4) and `55` (6-). Comparisons always use the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scale(pub i32);

impl Scale {
    /// Not reported.
    pub const UNKNOWN: Scale = Scale(-1);
    /// No predicted shaking (early-warning areas without an upper bound).
    pub const NONE: Scale = Scale(0);
    pub const ONE: Scale = Scale(10);
    pub const TWO: Scale = Scale(20);
    pub const THREE: Scale = Scale(30);
    pub const FOUR: Scale = Scale(40);
    pub const FIVE_WEAK: Scale = Scale(45);
    /// 5- or higher, estimated (observation points whose reading is incomplete).
    pub const FIVE_WEAK_ESTIMATED: Scale = Scale(46);
    pub const FIVE_STRONG: Scale = Scale(50);
    pub const SIX_WEAK: Scale = Scale(55);
    pub const SIX_STRONG: Scale = Scale(60);
    pub const SEVEN: Scale = Scale(70);
    /// Invalid reading.
    pub const ABNORMAL: Scale = Scale(99);

    /// Raw ordinal value.
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Whether this is one of the defined intensity steps (1 through 7,
    /// including the estimated 5-).
    pub fn is_known(self) -> bool {
        matches!(self.0, 10 | 20 | 30 | 40 | 45 | 46 | 50 | 55 | 60 | 70)
    }

    /// Whether this is the unknown or abnormal sentinel.
    pub fn is_sentinel(self) -> bool {
        self == Self::UNKNOWN || self == Self::ABNORMAL
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
