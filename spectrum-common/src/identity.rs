//! Participant identity types
//!
//! Identities are opaque platform ids (chat snowflakes). They are wrapped in
//! [`IdentityId`] so a score table key can never be confused with a display
//! name or avatar reference, which are also plain strings on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniquely addressable participant in the hosting chat context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for IdentityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Roster entry for one participant as seen by the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: IdentityId,
    pub display_name: String,
    /// Avatar reference (URL) as rendered by the platform
    pub avatar_url: String,
}

impl Member {
    pub fn new(
        id: impl Into<IdentityId>,
        display_name: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_url: avatar_url.into(),
        }
    }
}
