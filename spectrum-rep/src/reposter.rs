//! Reposting of deleted messages
//!
//! The assistant echoes a deleted message back into its channel as an embed.
//! The embed's `author` block is the provenance the resolver later reads to
//! credit reactions on the repost to the original author.

use crate::resolver::Provenance;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spectrum_common::{time, IdentityId, Member};

/// Embed accent colour for reposts
pub const REPOST_COLOUR: u32 = 0xffff00;

/// A message the platform reported as deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedMessage {
    pub author: Member,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Embed to post in place of a deleted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repost {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub author: Provenance,
}

impl Repost {
    /// Platform embed object
    pub fn to_embed(&self) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "color": self.colour,
            "author": {
                "name": self.author.name,
                "icon_url": self.author.icon_url,
            },
        })
    }
}

/// Build the repost for a deleted message, or `None` for the assistant's own messages
pub fn compose_repost(
    message: &DeletedMessage,
    bot_id: Option<&IdentityId>,
    tz: Tz,
) -> Option<Repost> {
    if bot_id == Some(&message.author.id) {
        return None;
    }

    Some(Repost {
        title: time::format_local(message.timestamp, tz),
        description: message.content.clone(),
        colour: REPOST_COLOUR,
        author: Provenance {
            name: message.author.display_name.clone(),
            icon_url: message.author.avatar_url.clone(),
        },
    })
}
