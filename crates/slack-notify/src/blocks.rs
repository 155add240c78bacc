//! Block Kit document model.
//!
//! A [`Document`] is the complete notification for one event: the ordered
//! blocks, a flat fallback summary for clients that cannot render blocks, and
//! an optional severity colour shown as the attachment bar.

use serde::{Deserialize, Serialize};

/// A text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

impl Text {
    /// Plain text with emoji shortcodes enabled.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText {
            text: text.into(),
            emoji: true,
        }
    }

    /// Markdown-formatted text.
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    /// The raw text content.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PlainText { text, .. } | Self::Mrkdwn { text } => text,
        }
    }
}

/// A section accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Image { image_url: String, alt_text: String },
}

impl Accessory {
    pub fn image(image_url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self::Image {
            image_url: image_url.into(),
            alt_text: alt_text.into(),
        }
    }
}

/// A layout block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: Text,
    },
    Section {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<Text>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        fields: Vec<Text>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
    Divider,
    Context {
        elements: Vec<Text>,
    },
}

/// Block type without content, for structural comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Section,
    Fields,
    Divider,
    Context,
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header {
            text: Text::plain(text),
        }
    }

    /// A section holding one markdown paragraph.
    pub fn section(text: impl Into<String>) -> Self {
        Self::Section {
            text: Some(Text::mrkdwn(text)),
            fields: Vec::new(),
            accessory: None,
        }
    }

    /// A section holding only key/value fields.
    pub fn fields(fields: Vec<Text>) -> Self {
        Self::Section {
            text: None,
            fields,
            accessory: None,
        }
    }

    pub fn divider() -> Self {
        Self::Divider
    }

    pub fn context(text: impl Into<String>) -> Self {
        Self::Context {
            elements: vec![Text::mrkdwn(text)],
        }
    }

    /// Attach an accessory to a section. Other block types are returned unchanged.
    pub fn with_accessory(self, accessory: Accessory) -> Self {
        match self {
            Self::Section { text, fields, .. } => Self::Section {
                text,
                fields,
                accessory: Some(accessory),
            },
            other => other,
        }
    }

    /// Structural kind. A section with fields and no text is a field group.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Header { .. } => BlockKind::Header,
            Self::Section {
                text: None, fields, ..
            } if !fields.is_empty() => BlockKind::Fields,
            Self::Section { .. } => BlockKind::Section,
            Self::Divider => BlockKind::Divider,
            Self::Context { .. } => BlockKind::Context,
        }
    }

    /// All text carried by the block, joined by newlines.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Header { text } => text.as_str().to_string(),
            Self::Section { text, fields, .. } => text
                .iter()
                .chain(fields.iter())
                .map(Text::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Divider => String::new(),
            Self::Context { elements } => elements
                .iter()
                .map(Text::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn accessory(&self) -> Option<&Accessory> {
        match self {
            Self::Section { accessory, .. } => accessory.as_ref(),
            _ => None,
        }
    }
}

/// A complete notification for one event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Flat summary for notifications and clients without block support.
    pub fallback_text: String,
    /// Attachment bar colour (`#rrggbb`).
    pub color: Option<String>,
    /// Ordered blocks.
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(fallback_text: impl Into<String>) -> Self {
        Self {
            fallback_text: fallback_text.into(),
            color: None,
            blocks: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Block kinds in order.
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(Block::kind).collect()
    }

    /// Whether any block contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.blocks.iter().any(|block| block.plain_text().contains(needle))
    }
}
