//! Earthquake information (code 551).

use serde::{Deserialize, Serialize};

use super::scale::Scale;

/// An earthquake information report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuakeEvent {
    /// Feed-assigned record ID.
    #[serde(default, rename = "_id")]
    pub id: String,

    /// Time the record was received by the feed.
    #[serde(default)]
    pub time: String,

    /// Issue metadata.
    #[serde(default)]
    pub issue: QuakeIssue,

    /// Earthquake details.
    #[serde(default)]
    pub earthquake: Earthquake,

    /// Observation points, in the order reported.
    #[serde(default)]
    pub points: Vec<ObservationPoint>,
}

/// Issue metadata for an earthquake report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuakeIssue {
    /// Issuing agency.
    #[serde(default)]
    pub source: Option<String>,

    /// Issue time.
    #[serde(default)]
    pub time: String,

    /// Report type (ScalePrompt, Destination, ScaleAndDestination, DetailScale, Foreign, Other).
    #[serde(default)]
    pub r#type: String,

    /// Correction marker, if this report corrects an earlier one.
    #[serde(default)]
    pub correct: Option<String>,
}

/// Earthquake details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earthquake {
    /// Occurrence time.
    #[serde(default)]
    pub time: String,

    /// Hypocenter, if determined.
    #[serde(default)]
    pub hypocenter: Option<Hypocenter>,

    /// Maximum observed intensity.
    #[serde(default)]
    pub max_scale: Scale,

    /// Domestic tsunami risk.
    #[serde(default)]
    pub domestic_tsunami: DomesticTsunami,

    /// Foreign tsunami risk, as reported.
    #[serde(default)]
    pub foreign_tsunami: Option<String>,
}

/// Hypocenter information shared by earthquake and early-warning reports.
///
/// `depth` and `magnitude` use `-1` for an explicitly unknown value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hypocenter {
    /// Region name. Empty means not determined.
    #[serde(default)]
    pub name: Option<String>,

    /// Abbreviated region name (early warnings only).
    #[serde(default)]
    pub reduce_name: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Depth in km.
    #[serde(default)]
    pub depth: Option<i32>,

    #[serde(default)]
    pub magnitude: Option<f64>,
}

impl QuakeEvent {
    /// Identifying fields for log context.
    pub fn describe(&self) -> String {
        format!(
            "id={} time={} max_scale={}",
            self.id, self.earthquake.time, self.earthquake.max_scale
        )
    }
}

impl Hypocenter {
    /// Region name, if present and non-empty.
    pub fn place(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

/// Domestic tsunami risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DomesticTsunami {
    None,
    Checking,
    NonEffective,
    Watch,
    Warning,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A single observation point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPoint {
    /// Prefecture.
    #[serde(default)]
    pub pref: String,

    /// Place name.
    #[serde(default)]
    pub addr: String,

    /// Whether this is an area rather than a station.
    #[serde(default)]
    pub is_area: bool,

    /// Observed intensity.
    #[serde(default)]
    pub scale: Scale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_report() {
        let json = r#"{
            "_id": "abc",
            "code": 551,
            "time": "2024/01/01 16:10:30.123",
            "issue": {"source": "気象庁", "time": "2024/01/01 16:10:00", "type": "DetailScale", "correct": "None"},
            "earthquake": {
                "time": "2024/01/01 16:10:00",
                "hypocenter": {"name": "石川県能登地方", "latitude": 37.5, "longitude": 137.2, "depth": 10, "magnitude": 7.6},
                "maxScale": 70,
                "domesticTsunami": "Warning",
                "foreignTsunami": "Unknown"
            },
            "points": [{"pref": "石川県", "addr": "志賀町", "isArea": false, "scale": 70}]
        }"#;
        let event: QuakeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "abc");
        assert_eq!(event.earthquake.max_scale, Scale::SEVEN);
        assert_eq!(event.earthquake.domestic_tsunami, DomesticTsunami::Warning);
        let hypocenter = event.earthquake.hypocenter.unwrap();
        assert_eq!(hypocenter.place(), Some("石川県能登地方"));
        assert_eq!(hypocenter.depth, Some(10));
        assert_eq!(event.points.len(), 1);
        assert_eq!(event.points[0].scale, Scale::SEVEN);
    }

    #[test]
    fn test_deserialize_minimal_report() {
        let event: QuakeEvent = serde_json::from_str(r#"{"code": 551}"#).unwrap();
        assert!(event.earthquake.hypocenter.is_none());
        assert_eq!(event.earthquake.max_scale, Scale::UNKNOWN);
        assert_eq!(event.earthquake.domestic_tsunami, DomesticTsunami::Unknown);
        assert!(event.points.is_empty());
    }

    #[test]
    fn test_unrecognised_tsunami_category() {
        let tsunami: DomesticTsunami = serde_json::from_str(r#""Something""#).unwrap();
        assert_eq!(tsunami, DomesticTsunami::Unknown);

        let tsunami: DomesticTsunami = serde_json::from_str(r#""Checking""#).unwrap();
        assert_eq!(tsunami, DomesticTsunami::Checking);
        let tsunami: DomesticTsunami = serde_json::from_str(r#""Warning""#).unwrap();
        assert_eq!(tsunami, DomesticTsunami::Warning);
    }

    #[test]
    fn test_describe_without_id() {
        let event: QuakeEvent = serde_json::from_str(
            r#"{"code": 551, "earthquake": {"time": "2024/01/01 16:10:00", "maxScale": 45}}"#,
        )
        .unwrap();
        let description = event.describe();
        assert!(description.contains("time=2024/01/01 16:10:00"));
        assert!(description.contains("max_scale=45"));
    }

    #[test]
    fn test_empty_place_is_absent() {
        let hypocenter = Hypocenter {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(hypocenter.place(), None);
    }
}
