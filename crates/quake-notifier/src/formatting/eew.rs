//! Earthquake early warning documents.

use quake_feed::{EewArea, EewEvent, Scale};
use slack_notify::{Block, Document};

use super::{
    display_clock, display_time, field, hypocenter_fields, hypocenter_summary, join_truncated,
    Formatter, MAX_EEW_AREAS,
};
use crate::intensity::{color_for, to_label, SeverityColor};

/// Presentation state of an early warning. Exactly one applies per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EewVariant {
    Cancelled,
    Training,
    Warning,
    Forecast,
}

impl EewVariant {
    /// Classify an early warning. Cancellation wins over the training flag,
    /// which wins over predicted severity.
    pub fn of(event: &EewEvent) -> Self {
        if event.cancelled {
            Self::Cancelled
        } else if event.test {
            Self::Training
        } else if event.max_predicted_scale() >= Scale::FIVE_STRONG {
            Self::Warning
        } else {
            Self::Forecast
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Cancelled => "Earthquake Early Warning (Cancelled)",
            Self::Training => "Earthquake Early Warning (Training)",
            Self::Warning => "Earthquake Early Warning (Warning)",
            Self::Forecast => "Earthquake Early Warning (Forecast)",
        }
    }

    fn image(self) -> &'static str {
        match self {
            Self::Cancelled => "eew_cancelled.png",
            Self::Training => "eew_test.png",
            Self::Warning => "eew_warning.png",
            Self::Forecast => "eew_forecast.png",
        }
    }

    fn alert(self) -> &'static str {
        match self {
            Self::Cancelled => "The earthquake early warning has been cancelled.",
            Self::Training => {
                "This is a training early warning. No earthquake is occurring."
            }
            Self::Warning => {
                ":rotating_light: *Strong shaking is expected.* Protect yourself immediately."
            }
            Self::Forecast => "An earthquake has been detected. Shaking may be felt shortly.",
        }
    }
}

/// `5-` when both bounds agree, `5- or above` for open-ended predictions,
/// `5- ~ 6-` otherwise.
fn intensity_range(area: &EewArea) -> String {
    let (from, to) = (area.scale_from, area.scale_to);
    if area.is_open_ended() {
        format!("{} or above", to_label(from))
    } else if from == to {
        to_label(to).to_string()
    } else {
        format!("{} ~ {}", to_label(from), to_label(to))
    }
}

fn area_line(area: &EewArea) -> String {
    let mut line = format!("{}: {}", area.name, intensity_range(area));
    if let Some(arrival) = area.arrival_time.as_deref().filter(|time| !time.is_empty()) {
        line.push_str(&format!(" (arrival {})", display_clock(arrival)));
    }
    line
}

impl Formatter {
    /// Build the document for an early warning. Cancelled warnings carry no
    /// area list.
    pub fn eew(&self, event: &EewEvent) -> Document {
        let variant = EewVariant::of(event);
        let max_predicted = event.max_predicted_scale();
        let hypocenter = event
            .earthquake
            .as_ref()
            .and_then(|earthquake| earthquake.hypocenter.as_ref());

        let mut alert = variant.alert().to_string();
        if let Some(place) = hypocenter_summary(hypocenter) {
            alert.push_str(&format!("\nEpicenter: *{}*", place));
        }

        let mut facts = vec![field("Issue", format!("#{}", event.issue.serial))];
        if let Some(earthquake) = &event.earthquake {
            if !earthquake.origin_time.is_empty() {
                facts.push(field("Origin time", display_time(&earthquake.origin_time)));
            }
        }
        facts.extend(hypocenter_fields(hypocenter));
        facts.push(field("Max predicted intensity", to_label(max_predicted)));

        let color = match variant {
            EewVariant::Cancelled | EewVariant::Training => SeverityColor::Low,
            EewVariant::Warning | EewVariant::Forecast => color_for(max_predicted),
        };

        let fallback = format!(
            "{} #{}: max predicted intensity {}",
            variant.title(),
            event.issue.serial,
            to_label(max_predicted)
        );

        let mut document = Document::new(fallback).with_color(color.hex());
        document.push(Block::header(variant.title()));
        document.push(
            Block::section(alert).with_accessory(self.image(variant.image(), variant.title())),
        );
        document.push(Block::divider());
        document.push(Block::fields(facts));
        if variant != EewVariant::Cancelled {
            document.push(Block::divider());
            document.push(area_block(event));
        }
        document.push(Block::divider());
        document.push(Block::context(format!(
            "Event {} | Issued {}",
            event.issue.event_id,
            display_time(&event.issue.time)
        )));
        document
    }
}

fn area_block(event: &EewEvent) -> Block {
    if event.areas.is_empty() {
        return Block::section("*Predicted areas*\n_No areas listed._");
    }
    let lines: Vec<String> = event.areas.iter().map(area_line).collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    Block::section(format!(
        "*Predicted areas*\n{}",
        join_truncated(&lines, MAX_EEW_AREAS, "\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use quake_feed::{EewEarthquake, Hypocenter};
    use slack_notify::BlockKind;

    fn area(name: &str, from: Scale, to: Scale) -> EewArea {
        EewArea {
            name: name.to_string(),
            scale_from: from,
            scale_to: to,
            ..Default::default()
        }
    }

    fn formatter() -> Formatter {
        Formatter::new("https://img.example")
    }

    #[test]
    fn test_variant_priority() {
        let strong = vec![area("Noto", Scale::SIX_WEAK, Scale::SEVEN)];
        let mut event = EewEvent {
            areas: strong,
            ..Default::default()
        };
        assert_eq!(EewVariant::of(&event), EewVariant::Warning);

        event.test = true;
        assert_eq!(EewVariant::of(&event), EewVariant::Training);

        event.cancelled = true;
        assert_eq!(EewVariant::of(&event), EewVariant::Cancelled);

        let weak = EewEvent {
            areas: vec![area("Noto", Scale::FOUR, Scale::FIVE_WEAK)],
            ..Default::default()
        };
        assert_eq!(EewVariant::of(&weak), EewVariant::Forecast);
        assert_eq!(EewVariant::of(&EewEvent::default()), EewVariant::Forecast);
    }

    #[test]
    fn test_intensity_range() {
        assert_eq!(
            intensity_range(&area("A", Scale::FIVE_WEAK, Scale::FIVE_WEAK)),
            "5-"
        );
        assert_eq!(
            intensity_range(&area("A", Scale::FIVE_WEAK, Scale::SIX_WEAK)),
            "5- ~ 6-"
        );
        assert_eq!(
            intensity_range(&area("A", Scale::SIX_WEAK, Scale::ABNORMAL)),
            "6- or above"
        );
    }

    #[test]
    fn test_open_ended_area_selects_warning() {
        let event = EewEvent {
            areas: vec![area("Noto", Scale::SIX_WEAK, Scale::ABNORMAL)],
            ..Default::default()
        };
        assert_eq!(event.max_predicted_scale(), Scale::SIX_WEAK);
        assert_eq!(EewVariant::of(&event), EewVariant::Warning);

        let document = formatter().eew(&event);
        assert_eq!(document.blocks[0].plain_text(), "Earthquake Early Warning (Warning)");
        assert!(document.contains_text("Noto: 6- or above"));
        assert!(!document.contains_text("Abnormal"));
        assert!(document.contains_text("*Max predicted intensity*\n6-"));
    }

    #[test]
    fn test_area_list_truncates_after_fifteen() {
        let areas = (1..=16)
            .map(|i| area(&format!("Area{}", i), Scale::FOUR, Scale::FOUR))
            .collect();
        let event = EewEvent {
            areas,
            ..Default::default()
        };
        let document = formatter().eew(&event);
        let list = document.blocks[5].plain_text();
        assert!(list.contains("Area15: 4"));
        assert!(!list.contains("Area16"));
        assert!(list.ends_with("(+1 more)"));
    }

    #[test]
    fn test_cancelled_omits_area_block() {
        let areas = (1..=20)
            .map(|i| area(&format!("Area{}", i), Scale::FOUR, Scale::FIVE_STRONG))
            .collect();
        let event = EewEvent {
            cancelled: true,
            areas,
            ..Default::default()
        };
        let document = formatter().eew(&event);
        assert!(!document.contains_text("Predicted areas"));
        assert_eq!(
            document.kinds(),
            vec![
                BlockKind::Header,
                BlockKind::Section,
                BlockKind::Divider,
                BlockKind::Fields,
                BlockKind::Divider,
                BlockKind::Context,
            ]
        );
        assert_eq!(document.blocks[0].plain_text(), "Earthquake Early Warning (Cancelled)");
    }

    #[test]
    fn test_training_text_and_image() {
        let event = EewEvent {
            test: true,
            ..Default::default()
        };
        let document = formatter().eew(&event);
        assert_eq!(document.blocks[0].plain_text(), "Earthquake Early Warning (Training)");
        assert!(document.contains_text("training early warning"));
        let accessory = document.blocks[1].accessory().unwrap();
        let slack_notify::Accessory::Image { image_url, .. } = accessory;
        assert_eq!(image_url, "https://img.example/eew_test.png");
    }

    #[test]
    fn test_structure_is_stable_across_optional_fields() {
        let earthquakes = [
            None,
            Some(EewEarthquake::default()),
            Some(EewEarthquake {
                origin_time: "2024/01/01 16:10:06".to_string(),
                hypocenter: Some(Hypocenter {
                    name: Some("Noto".to_string()),
                    magnitude: Some(7.4),
                    depth: Some(10),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        ];
        for earthquake in earthquakes {
            let event = EewEvent {
                earthquake,
                areas: vec![EewArea {
                    name: "Noto".to_string(),
                    scale_from: Scale::SIX_WEAK,
                    scale_to: Scale::SEVEN,
                    arrival_time: Some("2024/01/01 16:10:20".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            };
            let document = formatter().eew(&event);
            assert_eq!(
                document.kinds(),
                vec![
                    BlockKind::Header,
                    BlockKind::Section,
                    BlockKind::Divider,
                    BlockKind::Fields,
                    BlockKind::Divider,
                    BlockKind::Section,
                    BlockKind::Divider,
                    BlockKind::Context,
                ]
            );
            assert!(document.contains_text("Noto: 6- ~ 7 (arrival 16:10:20)"));
            assert_eq!(document.color.as_deref(), Some("#e74c3c"));
        }
    }
}
