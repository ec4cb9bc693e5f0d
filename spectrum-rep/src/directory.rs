//! In-memory member roster
//!
//! The chat adapter pushes member updates here; the resolver and the spectrum
//! export read from it. Members keep the position they were first seen at, so
//! lookups that several members satisfy always return the earliest one.

use crate::resolver::HostingContext;
use spectrum_common::{IdentityId, Member};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Roster {
    members: Vec<Member>,
    index: HashMap<IdentityId, usize>,
}

/// Member roster keyed by identity, in roster order
#[derive(Debug, Default)]
pub struct MemberDirectory {
    roster: RwLock<Roster>,
}

impl MemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member, or replace it in place if already known
    pub fn upsert(&self, member: Member) {
        let mut roster = self.roster.write().unwrap_or_else(|e| e.into_inner());
        match roster.index.get(&member.id).copied() {
            Some(pos) => roster.members[pos] = member,
            None => {
                let pos = roster.members.len();
                roster.index.insert(member.id.clone(), pos);
                roster.members.push(member);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.roster.read().unwrap_or_else(|e| e.into_inner()).members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HostingContext for MemberDirectory {
    fn find_by_display_name_and_avatar(&self, name: &str, avatar_url: &str) -> Option<IdentityId> {
        let roster = self.roster.read().unwrap_or_else(|e| e.into_inner());
        roster
            .members
            .iter()
            .find(|m| m.display_name == name && m.avatar_url == avatar_url)
            .map(|m| m.id.clone())
    }

    fn find_by_id(&self, id: &IdentityId) -> Option<Member> {
        let roster = self.roster.read().unwrap_or_else(|e| e.into_inner());
        let pos = *roster.index.get(id)?;
        roster.members.get(pos).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_display_name() {
        let dir = MemberDirectory::new();
        dir.upsert(Member::new("1", "old", "a.png"));
        dir.upsert(Member::new("1", "new", "a.png"));

        assert_eq!(dir.len(), 1);
        assert_eq!(dir.find_by_id(&IdentityId::new("1")).unwrap().display_name, "new");
        assert!(dir.find_by_display_name_and_avatar("old", "a.png").is_none());
    }

    #[test]
    fn test_lookup_requires_both_fields() {
        let dir = MemberDirectory::new();
        dir.upsert(Member::new("1", "raines", "r.png"));

        assert_eq!(
            dir.find_by_display_name_and_avatar("raines", "r.png"),
            Some(IdentityId::new("1"))
        );
        assert!(dir.find_by_display_name_and_avatar("raines", "x.png").is_none());
        assert!(dir.find_by_display_name_and_avatar("Raines", "r.png").is_none());
    }

    #[test]
    fn test_shared_name_and_avatar_resolves_to_first_seen() {
        let dir = MemberDirectory::new();
        dir.upsert(Member::new("9", "anon", "https://cdn/default.png"));
        dir.upsert(Member::new("1", "anon", "https://cdn/default.png"));
        dir.upsert(Member::new("5", "anon", "https://cdn/default.png"));
        // refreshing a later member does not move it ahead
        dir.upsert(Member::new("1", "anon", "https://cdn/default.png"));

        for _ in 0..10 {
            assert_eq!(
                dir.find_by_display_name_and_avatar("anon", "https://cdn/default.png"),
                Some(IdentityId::new("9"))
            );
        }
        assert_eq!(dir.len(), 3);
    }
}
