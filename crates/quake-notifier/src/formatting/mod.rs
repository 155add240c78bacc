//! Block Kit document builders, one per event category.
//!
//! Every builder emits blocks in the same order: header, summary or alert
//! line, divider, key facts, divider, category detail, divider, footer.
//! Builders never fail; absent optional fields are left out.

mod eew;
mod quake;
mod tsunami;

use chrono::NaiveDateTime;
use quake_feed::Hypocenter;
use slack_notify::{Accessory, Block, Text};

pub use eew::EewVariant;

/// Observation points listed per intensity group before truncating.
pub const MAX_POINTS_PER_GROUP: usize = 10;

/// Predicted-impact areas listed before truncating.
pub const MAX_EEW_AREAS: usize = 15;

/// Lines per section in long lists (Slack caps section text length).
const LINES_PER_SECTION: usize = 25;

const FEED_TIME_FORMATS: [&str; 3] = ["%Y/%m/%d %H:%M:%S%.f", "%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M"];

/// Builds notification documents.
#[derive(Debug, Clone)]
pub struct Formatter {
    image_base_url: String,
}

impl Formatter {
    /// Create a formatter that serves accessory images from `image_base_url`.
    pub fn new(image_base_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn image(&self, file: &str, alt_text: impl Into<String>) -> Accessory {
        Accessory::image(format!("{}/{}", self.image_base_url, file), alt_text)
    }
}

/// Parse a feed timestamp (JST).
fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    FEED_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
}

/// Full timestamp for display. Unparseable input is shown as-is.
fn display_time(raw: &str) -> String {
    match parse_time(raw) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S JST").to_string(),
        None => raw.to_string(),
    }
}

/// Time of day for display.
fn display_clock(raw: &str) -> String {
    match parse_time(raw) {
        Some(time) => time.format("%H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

fn field(label: &str, value: impl AsRef<str>) -> Text {
    Text::mrkdwn(format!("*{}*\n{}", label, value.as_ref()))
}

fn magnitude_text(magnitude: f64) -> String {
    if magnitude < 0.0 {
        "Unknown".to_string()
    } else {
        format!("M{:.1}", magnitude)
    }
}

fn depth_text(depth: i32) -> String {
    match depth {
        d if d < 0 => "Unknown".to_string(),
        0 => "Very shallow".to_string(),
        d => format!("{} km", d),
    }
}

/// Hypocenter key facts. Absent fields and empty names are omitted; the
/// feed's explicit unknown magnitude/depth is shown as "Unknown".
fn hypocenter_fields(hypocenter: Option<&Hypocenter>) -> Vec<Text> {
    let Some(hypocenter) = hypocenter else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    if let Some(place) = hypocenter.place() {
        fields.push(field("Hypocenter", place));
    }
    if let Some(magnitude) = hypocenter.magnitude {
        fields.push(field("Magnitude", magnitude_text(magnitude)));
    }
    if let Some(depth) = hypocenter.depth {
        fields.push(field("Depth", depth_text(depth)));
    }
    fields
}

/// Short hypocenter description for summaries, e.g. `Noto, Ishikawa (M7.6)`.
fn hypocenter_summary(hypocenter: Option<&Hypocenter>) -> Option<String> {
    let hypocenter = hypocenter?;
    let place = hypocenter.place()?;
    match hypocenter.magnitude {
        Some(magnitude) if magnitude >= 0.0 => {
            Some(format!("{} ({})", place, magnitude_text(magnitude)))
        }
        _ => Some(place.to_string()),
    }
}

/// Join up to `cap` items, appending `+N more` for the rest.
fn join_truncated(items: &[&str], cap: usize, separator: &str) -> String {
    let shown = items[..items.len().min(cap)].join(separator);
    match items.len().saturating_sub(cap) {
        0 => shown,
        rest => format!("{} (+{} more)", shown, rest),
    }
}

/// Split a titled list into sections that stay within Slack's text limits.
fn list_sections(title: &str, lines: &[String]) -> Vec<Block> {
    if lines.is_empty() {
        return vec![Block::section(format!("*{}*", title))];
    }
    lines
        .chunks(LINES_PER_SECTION)
        .enumerate()
        .map(|(index, chunk)| {
            let body = chunk.join("\n");
            if index == 0 {
                Block::section(format!("*{}*\n{}", title, body))
            } else {
                Block::section(body)
            }
        })
        .collect()
}
