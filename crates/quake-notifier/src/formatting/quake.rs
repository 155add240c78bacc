//! Earthquake information documents.

use std::collections::BTreeMap;

use quake_feed::{DomesticTsunami, QuakeEvent, Scale};
use slack_notify::{Block, Document};

use super::{
    display_time, field, hypocenter_fields, hypocenter_summary, join_truncated, Formatter,
    MAX_POINTS_PER_GROUP,
};
use crate::intensity::{color_for, to_label};

pub(super) const QUAKE_TITLE: &str = "Earthquake Information";

fn tsunami_text(tsunami: DomesticTsunami) -> &'static str {
    match tsunami {
        DomesticTsunami::None => "No tsunami expected",
        DomesticTsunami::Unknown => "Unknown",
        DomesticTsunami::Checking => "Under investigation",
        DomesticTsunami::NonEffective => "Slight sea-level change possible, no damage expected",
        DomesticTsunami::Watch => "Tsunami advisory in effect",
        DomesticTsunami::Warning => "Tsunami warning in effect",
    }
}

fn scale_image(scale: Scale) -> String {
    if scale.is_known() {
        format!("scale_{}.png", scale.raw())
    } else {
        "scale_unknown.png".to_string()
    }
}

impl Formatter {
    /// Build the document for an earthquake report.
    pub fn quake(&self, event: &QuakeEvent) -> Document {
        let earthquake = &event.earthquake;
        let hypocenter = earthquake.hypocenter.as_ref();
        let max_label = to_label(earthquake.max_scale);
        let place = hypocenter_summary(hypocenter);

        let mut summary = format!(
            "An earthquake with a maximum seismic intensity of *{}* occurred",
            max_label
        );
        if let Some(place) = &place {
            summary.push_str(&format!(" near *{}*", place));
        }
        summary.push_str(&format!(
            ".\nTsunami: {}",
            tsunami_text(earthquake.domestic_tsunami)
        ));

        let fallback = match &place {
            Some(place) => format!("{}: max intensity {}, {}", QUAKE_TITLE, max_label, place),
            None => format!("{}: max intensity {}", QUAKE_TITLE, max_label),
        };

        let mut facts = vec![field("Occurred", display_time(&earthquake.time))];
        facts.push(field("Max intensity", max_label));
        facts.extend(hypocenter_fields(hypocenter));
        facts.push(field("Tsunami", tsunami_text(earthquake.domestic_tsunami)));

        let mut document = Document::new(fallback).with_color(color_for(earthquake.max_scale).hex());
        document.push(Block::header(QUAKE_TITLE));
        document.push(
            Block::section(summary)
                .with_accessory(self.image(&scale_image(earthquake.max_scale), max_label)),
        );
        document.push(Block::divider());
        document.push(Block::fields(facts));
        document.push(Block::divider());
        for block in observation_blocks(event) {
            document.push(block);
        }
        document.push(Block::divider());
        document.push(Block::context(quake_footer(event)));
        document
    }
}

/// One section per observed intensity, strongest first.
fn observation_blocks(event: &QuakeEvent) -> Vec<Block> {
    if event.points.is_empty() {
        return vec![Block::section("_No observation points reported._")];
    }

    let mut groups: BTreeMap<Scale, Vec<&str>> = BTreeMap::new();
    for point in &event.points {
        let name = if point.addr.is_empty() {
            point.pref.as_str()
        } else {
            point.addr.as_str()
        };
        groups.entry(point.scale).or_default().push(name);
    }

    groups
        .iter()
        .rev()
        .map(|(scale, names)| {
            Block::section(format!(
                "*Intensity {}*\n{}",
                to_label(*scale),
                join_truncated(names, MAX_POINTS_PER_GROUP, ", ")
            ))
        })
        .collect()
}

fn quake_footer(event: &QuakeEvent) -> String {
    let source = event.issue.source.as_deref().unwrap_or("JMA");
    let mut footer = format!("Source: {}", source);
    if !event.issue.time.is_empty() {
        footer.push_str(&format!(" | Issued {}", display_time(&event.issue.time)));
    }
    if !event.issue.r#type.is_empty() {
        footer.push_str(&format!(" | {}", event.issue.r#type));
    }
    footer
}
