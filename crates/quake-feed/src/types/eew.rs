//! Earthquake early warning (code 556).

use serde::{Deserialize, Serialize};

use super::quake::Hypocenter;
use super::scale::Scale;

/// An earthquake early warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewEvent {
    /// Feed-assigned record ID.
    #[serde(default, rename = "_id")]
    pub id: String,

    /// Time the record was received by the feed.
    #[serde(default)]
    pub time: String,

    /// Training/test message.
    #[serde(default)]
    pub test: bool,

    /// Whether this warning cancels the previous issue.
    #[serde(default)]
    pub cancelled: bool,

    /// Issue metadata.
    #[serde(default)]
    pub issue: EewIssue,

    /// Origin earthquake, if estimated.
    #[serde(default)]
    pub earthquake: Option<EewEarthquake>,

    /// Predicted-impact areas, in the order reported.
    #[serde(default)]
    pub areas: Vec<EewArea>,
}

/// Issue metadata for an early warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewIssue {
    #[serde(default)]
    pub time: String,

    /// Identifier shared by every issue of the same earthquake.
    #[serde(default)]
    pub event_id: String,

    /// Issue serial number.
    #[serde(default)]
    pub serial: String,
}

/// Estimated origin earthquake.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewEarthquake {
    #[serde(default)]
    pub origin_time: String,

    #[serde(default)]
    pub arrival_time: String,

    #[serde(default)]
    pub condition: Option<String>,

    #[serde(default)]
    pub hypocenter: Option<Hypocenter>,
}

/// A predicted-impact area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewArea {
    #[serde(default)]
    pub pref: String,

    #[serde(default)]
    pub name: String,

    /// Lower bound of the predicted intensity.
    #[serde(default)]
    pub scale_from: Scale,

    /// Upper bound of the predicted intensity. `99` means "`scale_from` or
    /// above".
    #[serde(default)]
    pub scale_to: Scale,

    #[serde(default)]
    pub kind_code: Option<String>,

    /// Predicted arrival time, absent once shaking has arrived.
    #[serde(default)]
    pub arrival_time: Option<String>,
}

impl EewArea {
    /// Whether the prediction is "`scale_from` or above" (`scaleTo` of 99).
    pub fn is_open_ended(&self) -> bool {
        self.scale_to == Scale::ABNORMAL && !self.scale_from.is_sentinel()
    }

    /// Upper bound of the predicted range. An open-ended range is bounded by
    /// its lower end.
    pub fn upper_bound(&self) -> Scale {
        if self.scale_to.is_sentinel() {
            self.scale_from
        } else {
            self.scale_to
        }
    }
}

impl EewEvent {
    /// Identifying fields for log context.
    pub fn describe(&self) -> String {
        format!(
            "id={} event_id={} serial={} cancelled={} test={}",
            self.id, self.issue.event_id, self.issue.serial, self.cancelled, self.test
        )
    }

    /// Maximum predicted intensity over every area's upper bound.
    ///
    /// Bounds that stay unknown are skipped; an event without usable bounds
    /// yields [`Scale::NONE`].
    pub fn max_predicted_scale(&self) -> Scale {
        self.areas
            .iter()
            .map(EewArea::upper_bound)
            .filter(|scale| !scale.is_sentinel())
            .max()
            .unwrap_or(Scale::NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(from: i32, to: i32) -> EewArea {
        EewArea {
            name: "area".to_string(),
            scale_from: Scale(from),
            scale_to: Scale(to),
            ..Default::default()
        }
    }

    #[test]
    fn test_deserialize_warning() {
        let json = r#"{
            "code": 556,
            "time": "2024/01/01 16:10:12",
            "test": false,
            "cancelled": false,
            "issue": {"time": "2024/01/01 16:10:10", "eventId": "20240101161006", "serial": "3"},
            "earthquake": {
                "originTime": "2024/01/01 16:10:06",
                "arrivalTime": "2024/01/01 16:10:09",
                "hypocenter": {"name": "石川県能登地方", "reduceName": "石川県", "depth": 10, "magnitude": 7.4}
            },
            "areas": [{"pref": "石川県", "name": "石川県能登", "scaleFrom": 60, "scaleTo": 70, "kindCode": "19", "arrivalTime": null}]
        }"#;
        let event: EewEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.issue.serial, "3");
        assert_eq!(event.areas[0].scale_to, Scale::SEVEN);
        assert!(event.areas[0].arrival_time.is_none());
        assert_eq!(event.max_predicted_scale(), Scale::SEVEN);
    }

    #[test]
    fn test_max_predicted_defaults_to_none() {
        assert_eq!(EewEvent::default().max_predicted_scale(), Scale::NONE);
    }

    #[test]
    fn test_max_predicted_skips_unknown_bounds() {
        let event = EewEvent {
            areas: vec![area(40, 45), area(-1, -1), area(-1, 99)],
            ..Default::default()
        };
        assert_eq!(event.max_predicted_scale(), Scale::FIVE_WEAK);
    }

    #[test]
    fn test_open_ended_area_counts_its_lower_bound() {
        let open = area(55, 99);
        assert!(open.is_open_ended());
        assert_eq!(open.upper_bound(), Scale::SIX_WEAK);
        assert!(!area(40, 45).is_open_ended());
        assert!(!area(-1, 99).is_open_ended());

        let event = EewEvent {
            areas: vec![area(40, 45), open],
            ..Default::default()
        };
        assert_eq!(event.max_predicted_scale(), Scale::SIX_WEAK);
    }
}
