//! Web API request and response types.

use serde::{Deserialize, Serialize};

use crate::blocks::{Block, Document};

/// `chat.postMessage` request body.
#[derive(Debug, Serialize)]
pub(crate) struct PostMessageRequest<'a> {
    pub channel: &'a str,
    /// Fallback text shown in notifications.
    pub text: &'a str,
    #[serde(skip_serializing_if = "no_blocks")]
    pub blocks: &'a [Block],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment<'a>>,
    pub unfurl_links: bool,
}

fn no_blocks(blocks: &&[Block]) -> bool {
    blocks.is_empty()
}

/// A coloured attachment wrapping the document's blocks.
#[derive(Debug, Serialize)]
pub(crate) struct Attachment<'a> {
    pub color: &'a str,
    pub fallback: &'a str,
    pub blocks: &'a [Block],
}

impl<'a> PostMessageRequest<'a> {
    /// Build the request for a document.
    ///
    /// Coloured documents put their blocks inside a single attachment so the
    /// colour bar is shown; uncoloured ones post blocks at the top level.
    pub fn for_document(channel: &'a str, document: &'a Document) -> Self {
        match document.color.as_deref() {
            Some(color) => Self {
                channel,
                text: &document.fallback_text,
                blocks: &[],
                attachments: vec![Attachment {
                    color,
                    fallback: &document.fallback_text,
                    blocks: &document.blocks,
                }],
                unfurl_links: false,
            },
            None => Self {
                channel,
                text: &document.fallback_text,
                blocks: &document.blocks,
                attachments: Vec::new(),
                unfurl_links: false,
            },
        }
    }
}

/// Result of a successful `chat.postMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostedMessage {
    /// Channel the message was posted to.
    #[serde(default)]
    pub channel: String,
    /// Message timestamp (Slack's message ID).
    #[serde(default)]
    pub ts: String,
}

/// Result of a successful `auth.test`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthInfo {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// Common envelope of every Web API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}
