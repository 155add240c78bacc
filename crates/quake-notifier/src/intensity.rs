//! Seismic intensity classification.
//!
//! Pure mappings between raw intensity ordinals and display labels, colours
//! and notification thresholds. Filtering and grouping compare raw ordinals;
//! labels are for display only.

use quake_feed::Scale;

use crate::error::NotifierError;

/// Canonical threshold tokens, weakest first.
pub const THRESHOLD_TOKENS: [&str; 9] = ["1", "2", "3", "4", "5-", "5+", "6-", "6+", "7"];

/// Display label for an intensity. Values outside the known set read "Unknown".
pub fn to_label(scale: Scale) -> &'static str {
    match scale {
        Scale::ONE => "1",
        Scale::TWO => "2",
        Scale::THREE => "3",
        Scale::FOUR => "4",
        Scale::FIVE_WEAK => "5-",
        Scale::FIVE_WEAK_ESTIMATED => "5- or higher (estimated)",
        Scale::FIVE_STRONG => "5+",
        Scale::SIX_WEAK => "6-",
        Scale::SIX_STRONG => "6+",
        Scale::SEVEN => "7",
        Scale::ABNORMAL => "Abnormal",
        _ => "Unknown",
    }
}

/// Parse a threshold token such as `3`, `5-` or `6強`.
pub fn parse_threshold(token: &str) -> Result<Scale, NotifierError> {
    let trimmed = token.trim();
    let normalized = trimmed.strip_prefix("震度").unwrap_or(trimmed);

    let scale = match normalized {
        "1" => Scale::ONE,
        "2" => Scale::TWO,
        "3" => Scale::THREE,
        "4" => Scale::FOUR,
        "5-" | "5弱" => Scale::FIVE_WEAK,
        "5+" | "5強" => Scale::FIVE_STRONG,
        "6-" | "6弱" => Scale::SIX_WEAK,
        "6+" | "6強" => Scale::SIX_STRONG,
        "7" => Scale::SEVEN,
        _ => {
            return Err(NotifierError::InvalidConfigValue {
                name: "MIN_INTENSITY".to_string(),
                value: token.to_string(),
                allowed: THRESHOLD_TOKENS.join(", "),
            })
        }
    };
    Ok(scale)
}

/// Whether an observed intensity reaches the notification threshold.
///
/// Unknown and abnormal readings never qualify, whatever the threshold.
pub fn is_notify_worthy(scale: Scale, threshold: Scale) -> bool {
    !scale.is_sentinel() && scale >= threshold
}

/// Presentation colour band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityColor {
    Low,
    Moderate,
    High,
    Severe,
}

impl SeverityColor {
    /// Attachment bar colour.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Low => "#3498db",
            Self::Moderate => "#f1c40f",
            Self::High => "#e67e22",
            Self::Severe => "#e74c3c",
        }
    }
}

/// Colour band for an intensity. Sentinels get the low band.
pub fn color_for(scale: Scale) -> SeverityColor {
    if scale.is_sentinel() || scale <= Scale::THREE {
        SeverityColor::Low
    } else if scale < Scale::FIVE_WEAK {
        SeverityColor::Moderate
    } else if scale <= Scale::FIVE_STRONG {
        SeverityColor::High
    } else {
        SeverityColor::Severe
    }
}
