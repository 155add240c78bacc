//! Tsunami forecast documents.

use quake_feed::{TsunamiEvent, TsunamiGrade};
use slack_notify::{Block, Document};

use super::{display_time, field, list_sections, Formatter};
use crate::intensity::SeverityColor;

pub(super) const TSUNAMI_TITLE: &str = "Tsunami Information";

pub(super) const CANCELLED_NOTICE: &str = ":information_source: *This information has been cancelled.*";

fn grade_label(grade: TsunamiGrade) -> &'static str {
    match grade {
        TsunamiGrade::MajorWarning => "Major Tsunami Warning",
        TsunamiGrade::Warning => "Tsunami Warning",
        TsunamiGrade::Watch => "Tsunami Advisory",
        TsunamiGrade::Unknown => "Unknown",
    }
}

fn grade_image(grade: Option<TsunamiGrade>, cancelled: bool) -> &'static str {
    if cancelled {
        return "tsunami_cancelled.png";
    }
    match grade {
        Some(TsunamiGrade::MajorWarning) => "tsunami_major_warning.png",
        Some(TsunamiGrade::Warning) => "tsunami_warning.png",
        Some(TsunamiGrade::Watch) => "tsunami_watch.png",
        Some(TsunamiGrade::Unknown) | None => "tsunami_unknown.png",
    }
}

fn grade_color(grade: Option<TsunamiGrade>, cancelled: bool) -> SeverityColor {
    if cancelled {
        return SeverityColor::Low;
    }
    match grade {
        Some(TsunamiGrade::MajorWarning) => SeverityColor::Severe,
        Some(TsunamiGrade::Warning) => SeverityColor::High,
        Some(TsunamiGrade::Watch) => SeverityColor::Moderate,
        Some(TsunamiGrade::Unknown) | None => SeverityColor::Low,
    }
}

impl Formatter {
    /// Build the document for a tsunami forecast. Cancelled forecasts keep
    /// every block and gain a cancellation notice after the header.
    pub fn tsunami(&self, event: &TsunamiEvent) -> Document {
        let highest = event.highest_grade();
        let highest_label = highest.map(grade_label).unwrap_or("None");

        let summary = if event.cancelled {
            "The tsunami forecast below is no longer in effect.".to_string()
        } else if event.areas.is_empty() {
            "A tsunami forecast was issued with no affected areas.".to_string()
        } else {
            format!(
                "*{}* issued for {} area(s).",
                highest_label,
                event.areas.len()
            )
        };

        let fallback = if event.cancelled {
            format!("{} (cancelled)", TSUNAMI_TITLE)
        } else {
            format!("{}: {}", TSUNAMI_TITLE, highest_label)
        };

        let mut document = Document::new(fallback)
            .with_color(grade_color(highest, event.cancelled).hex());
        document.push(Block::header(TSUNAMI_TITLE));
        if event.cancelled {
            document.push(Block::section(CANCELLED_NOTICE));
        }
        document.push(
            Block::section(summary).with_accessory(
                self.image(grade_image(highest, event.cancelled), highest_label),
            ),
        );
        document.push(Block::divider());
        document.push(Block::fields(vec![
            field("Issued", display_time(&event.issue.time)),
            field("Areas", event.areas.len().to_string()),
            field("Highest grade", highest_label),
        ]));
        document.push(Block::divider());
        for block in area_blocks(event) {
            document.push(block);
        }
        document.push(Block::divider());
        document.push(Block::context(format!(
            "Source: {}",
            event.issue.source.as_deref().unwrap_or("JMA")
        )));
        document
    }
}

/// Areas grouped by grade, most severe first.
fn area_blocks(event: &TsunamiEvent) -> Vec<Block> {
    if event.areas.is_empty() {
        return vec![Block::section("_No forecast areas reported._")];
    }

    TsunamiGrade::BY_SEVERITY
        .into_iter()
        .flat_map(|grade| {
            let lines: Vec<String> = event
                .areas
                .iter()
                .filter(|area| area.grade == grade)
                .map(|area| {
                    if area.immediate {
                        format!("• {} (arriving imminently)", area.name)
                    } else {
                        format!("• {}", area.name)
                    }
                })
                .collect();
            if lines.is_empty() {
                Vec::new()
            } else {
                list_sections(grade_label(grade), &lines)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use quake_feed::TsunamiArea;
    use slack_notify::BlockKind;

    fn area(name: &str, grade: TsunamiGrade, immediate: bool) -> TsunamiArea {
        TsunamiArea {
            grade,
            immediate,
            name: name.to_string(),
        }
    }

    fn formatter() -> Formatter {
        Formatter::new("https://img.example")
    }

    #[test]
    fn test_areas_grouped_by_severity() {
        let event = TsunamiEvent {
            areas: vec![
                area("Hokkaido", TsunamiGrade::Watch, false),
                area("Noto", TsunamiGrade::MajorWarning, true),
                area("Niigata", TsunamiGrade::Warning, false),
            ],
            ..Default::default()
        };
        let document = formatter().tsunami(&event);
        assert_eq!(
            document.kinds(),
            vec![
                BlockKind::Header,
                BlockKind::Section,
                BlockKind::Divider,
                BlockKind::Fields,
                BlockKind::Divider,
                BlockKind::Section,
                BlockKind::Section,
                BlockKind::Section,
                BlockKind::Divider,
                BlockKind::Context,
            ]
        );
        assert_eq!(
            document.blocks[5].plain_text(),
            "*Major Tsunami Warning*\n• Noto (arriving imminently)"
        );
        assert_eq!(document.blocks[6].plain_text(), "*Tsunami Warning*\n• Niigata");
        assert_eq!(document.blocks[7].plain_text(), "*Tsunami Advisory*\n• Hokkaido");
        assert_eq!(document.color.as_deref(), Some("#e74c3c"));
        assert!(document.fallback_text.contains("Major Tsunami Warning"));
    }

    #[test]
    fn test_cancelled_notice_follows_header() {
        let event = TsunamiEvent {
            cancelled: true,
            areas: vec![area("Noto", TsunamiGrade::Warning, false)],
            ..Default::default()
        };
        let document = formatter().tsunami(&event);
        assert_eq!(document.blocks[0].plain_text(), "Tsunami Information");
        assert!(document.blocks[1].plain_text().contains("has been cancelled"));
        assert!(document.contains_text("• Noto"));
        assert_eq!(document.color.as_deref(), Some("#3498db"));

        let accessory = document.blocks[2].accessory().unwrap();
        let slack_notify::Accessory::Image { image_url, .. } = accessory;
        assert!(image_url.ends_with("tsunami_cancelled.png"));
    }

    #[test]
    fn test_no_areas() {
        let document = formatter().tsunami(&TsunamiEvent::default());
        assert!(document.contains_text("No forecast areas reported"));
        assert!(document.contains_text("*Highest grade*\nNone"));
        assert_eq!(document.kinds().len(), 8);
    }
}
