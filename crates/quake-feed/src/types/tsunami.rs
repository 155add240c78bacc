//! Tsunami forecast (code 552).

use serde::{Deserialize, Serialize};

/// A tsunami forecast report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsunamiEvent {
    /// Feed-assigned record ID.
    #[serde(default, rename = "_id")]
    pub id: String,

    /// Time the record was received by the feed.
    #[serde(default)]
    pub time: String,

    /// Whether this report cancels earlier forecasts.
    #[serde(default)]
    pub cancelled: bool,

    /// Issue metadata.
    #[serde(default)]
    pub issue: TsunamiIssue,

    /// Forecast areas, in the order reported.
    #[serde(default)]
    pub areas: Vec<TsunamiArea>,
}

/// Issue metadata for a tsunami report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsunamiIssue {
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub r#type: String,
}

/// A single forecast area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsunamiArea {
    /// Severity grade.
    #[serde(default)]
    pub grade: TsunamiGrade,

    /// Whether the tsunami is expected immediately.
    #[serde(default)]
    pub immediate: bool,

    /// Forecast area name.
    #[serde(default)]
    pub name: String,
}

/// Severity grade of a forecast area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TsunamiGrade {
    MajorWarning,
    Warning,
    Watch,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TsunamiGrade {
    /// Grades from most to least severe.
    pub const BY_SEVERITY: [TsunamiGrade; 4] = [
        TsunamiGrade::MajorWarning,
        TsunamiGrade::Warning,
        TsunamiGrade::Watch,
        TsunamiGrade::Unknown,
    ];
}

impl TsunamiEvent {
    /// Identifying fields for log context.
    pub fn describe(&self) -> String {
        format!(
            "id={} time={} cancelled={} areas={}",
            self.id,
            self.issue.time,
            self.cancelled,
            self.areas.len()
        )
    }

    /// The most severe grade among the forecast areas.
    pub fn highest_grade(&self) -> Option<TsunamiGrade> {
        TsunamiGrade::BY_SEVERITY
            .into_iter()
            .find(|grade| self.areas.iter().any(|area| area.grade == *grade))
    }
}
