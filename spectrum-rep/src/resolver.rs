//! Content author resolution
//!
//! When a message is deleted the assistant reposts it under its own account
//! with an embed whose `author` block carries the original display name and
//! avatar. Reactions on such a repost belong to the original author, so the
//! resolver looks the provenance up in the hosting context and lets a match
//! supersede the displayed author.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use spectrum_common::{IdentityId, Member};
use tracing::debug;

/// Identity lookups supplied by the chat platform
pub trait HostingContext: Send + Sync {
    /// Exact match on display name AND avatar reference
    fn find_by_display_name_and_avatar(&self, name: &str, avatar_url: &str) -> Option<IdentityId>;

    fn find_by_id(&self, id: &IdentityId) -> Option<Member>;
}

/// A reacted-to message as delivered by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Author the platform displays for the message
    pub author: IdentityId,

    /// Raw embed objects attached to the message
    #[serde(default)]
    pub embeds: Vec<Value>,
}

impl ContentItem {
    pub fn plain(author: impl Into<IdentityId>) -> Self {
        Self {
            author: author.into(),
            embeds: Vec::new(),
        }
    }
}

/// Original-author metadata carried by a reposted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub name: String,
    pub icon_url: String,
}

/// Displayed versus attributed author for one reaction event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAttribution {
    pub displayed_author: IdentityId,
    pub true_author: IdentityId,
}

impl ContentAttribution {
    pub fn is_repost(&self) -> bool {
        self.displayed_author != self.true_author
    }
}

/// Pull `{author: {name, icon_url}}` out of an embed
///
/// Returns `None` for embeds of any other shape.
pub fn try_extract_provenance(embed: &Value) -> Option<Provenance> {
    let author = embed.get("author")?;
    let name = author.get("name")?.as_str()?;
    let icon_url = author.get("icon_url")?.as_str()?;
    Some(Provenance {
        name: name.to_string(),
        icon_url: icon_url.to_string(),
    })
}

/// Determines which identity a reaction should be credited to
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl IdentityResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the identity that receives the reaction's effect
    pub fn resolve(&self, content: &ContentItem, ctx: &dyn HostingContext) -> IdentityId {
        self.attribute(content, ctx).true_author
    }

    /// Resolve and keep both the displayed and the attributed author
    ///
    /// Every embed is inspected; the last one that resolves to a known member wins.
    pub fn attribute(&self, content: &ContentItem, ctx: &dyn HostingContext) -> ContentAttribution {
        let mut true_author = content.author.clone();

        for embed in &content.embeds {
            let Some(provenance) = try_extract_provenance(embed) else {
                continue;
            };
            match ctx.find_by_display_name_and_avatar(&provenance.name, &provenance.icon_url) {
                Some(found) => true_author = found,
                None => debug!(name = %provenance.name, "Provenance has no matching member"),
            }
        }

        ContentAttribution {
            displayed_author: content.author.clone(),
            true_author,
        }
    }
}
