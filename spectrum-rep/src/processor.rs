//! Reaction event processing
//!
//! Each event walks RECEIVED → RESOLVED → GUARD_CHECKED → APPLIED, or stops
//! at SUPPRESSED when a guard rule fails. Suppressed events never touch the
//! store. An event that passes the guard creates the target's entry even
//! when its emoji turns out not to be one of the four scored symbols.
//!
//! Self-reaction overrides differ by direction: the add set and the remove
//! set are configured independently and are not expected to match.

use crate::resolver::{ContentItem, HostingContext, IdentityResolver};
use crate::store::{ReactionDirection, ReputationStore};
use serde::{Deserialize, Serialize};
use spectrum_common::config::ReputationSettings;
use spectrum_common::{IdentityId, ScoreField, ScoreVector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Reaction symbol as delivered by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    /// String form of the emoji (the unicode character for standard emoji)
    pub symbol: String,

    /// Name of a server-specific custom emoji
    #[serde(default)]
    pub custom_name: Option<String>,
}

impl Emoji {
    pub fn unicode(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            custom_name: None,
        }
    }

    pub fn custom(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            custom_name: Some(name.into()),
        }
    }

    fn matches(&self, token: &str) -> bool {
        self.symbol == token || self.custom_name.as_deref() == Some(token)
    }
}

/// Why an event was dropped before reaching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// Reactor reacted to their own content without an override
    SelfReaction,
    /// Content is attributed to the assistant itself
    BotContent,
}

/// Result of processing one reaction event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReactionOutcome {
    Applied {
        target: IdentityId,
        field: ScoreField,
        scores: ScoreVector,
    },
    /// Guard passed but the emoji is not scored; the entry was still created
    Unrecognized { target: IdentityId },
    Suppressed {
        target: IdentityId,
        reason: SuppressReason,
    },
}

/// Guard and category rules for reaction events
#[derive(Debug, Clone)]
pub struct ReactionPolicy {
    bot_id: Option<IdentityId>,
    add_overrides: HashSet<IdentityId>,
    remove_overrides: HashSet<IdentityId>,
    categories: Vec<(String, ScoreField)>,
}

impl ReactionPolicy {
    pub fn from_settings(settings: &ReputationSettings) -> Self {
        let emoji = &settings.emoji;
        Self {
            bot_id: settings.bot_id.clone(),
            add_overrides: settings.add_overrides.iter().cloned().collect(),
            remove_overrides: settings.remove_overrides.iter().cloned().collect(),
            categories: vec![
                (emoji.autism.clone(), ScoreField::Autism),
                (emoji.normie.clone(), ScoreField::Normie),
                (emoji.nice.clone(), ScoreField::Nice),
                (emoji.toxic.clone(), ScoreField::Toxic),
            ],
        }
    }

    /// Score field for an emoji; first configured match wins
    pub fn category_for(&self, emoji: &Emoji) -> Option<ScoreField> {
        self.categories
            .iter()
            .find(|(token, _)| emoji.matches(token))
            .map(|(_, field)| *field)
    }

    fn guard(
        &self,
        direction: ReactionDirection,
        reactor: &IdentityId,
        target: &IdentityId,
    ) -> Option<SuppressReason> {
        if self.bot_id.as_ref() == Some(target) {
            return Some(SuppressReason::BotContent);
        }
        if reactor == target {
            let overrides = match direction {
                ReactionDirection::Add => &self.add_overrides,
                ReactionDirection::Remove => &self.remove_overrides,
            };
            if !overrides.contains(reactor) {
                return Some(SuppressReason::SelfReaction);
            }
        }
        None
    }
}

/// Resolver → guard → store pipeline for reaction events
pub struct ReactionProcessor {
    store: Arc<ReputationStore>,
    resolver: IdentityResolver,
    policy: ReactionPolicy,
}

impl ReactionProcessor {
    pub fn new(store: Arc<ReputationStore>, policy: ReactionPolicy) -> Self {
        Self {
            store,
            resolver: IdentityResolver::new(),
            policy,
        }
    }

    pub fn store(&self) -> &Arc<ReputationStore> {
        &self.store
    }

    pub fn policy(&self) -> &ReactionPolicy {
        &self.policy
    }

    pub async fn on_reaction_add(
        &self,
        reactor: &IdentityId,
        content: &ContentItem,
        emoji: &Emoji,
        ctx: &dyn HostingContext,
    ) -> ReactionOutcome {
        self.process(ReactionDirection::Add, reactor, content, emoji, ctx)
            .await
    }

    pub async fn on_reaction_remove(
        &self,
        reactor: &IdentityId,
        content: &ContentItem,
        emoji: &Emoji,
        ctx: &dyn HostingContext,
    ) -> ReactionOutcome {
        self.process(ReactionDirection::Remove, reactor, content, emoji, ctx)
            .await
    }

    /// Single mutation entry point for score vectors
    pub async fn process(
        &self,
        direction: ReactionDirection,
        reactor: &IdentityId,
        content: &ContentItem,
        emoji: &Emoji,
        ctx: &dyn HostingContext,
    ) -> ReactionOutcome {
        let target = self.resolver.resolve(content, ctx);

        if let Some(reason) = self.policy.guard(direction, reactor, &target) {
            debug!(%reactor, %target, ?direction, ?reason, "Reaction suppressed");
            return ReactionOutcome::Suppressed { target, reason };
        }

        let Some(field) = self.policy.category_for(emoji) else {
            self.store.get(&target).await;
            debug!(%target, symbol = %emoji.symbol, "Unscored emoji");
            return ReactionOutcome::Unrecognized { target };
        };

        let scores = self.store.adjust(&target, field, direction).await;
        debug!(%reactor, %target, %field, ?direction, "Reaction applied");
        ReactionOutcome::Applied {
            target,
            field,
            scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemberDirectory;
    use crate::persistence::PersistHandle;
    use serde_json::json;
    use spectrum_common::Member;

    const JOHNY: &str = "214037134477230080";
    const MATT: &str = "168722115447488512";
    const BOT: &str = "999";

    fn id(s: &str) -> IdentityId {
        IdentityId::new(s)
    }

    fn processor() -> ReactionProcessor {
        let settings = ReputationSettings {
            bot_id: Some(id(BOT)),
            ..ReputationSettings::default()
        };
        ReactionProcessor::new(
            Arc::new(ReputationStore::new(PersistHandle::disabled())),
            ReactionPolicy::from_settings(&settings),
        )
    }

    fn heart() -> Emoji {
        Emoji::unicode("❤")
    }

    #[test]
    fn test_category_matching() {
        let policy = ReactionPolicy::from_settings(&ReputationSettings::default());
        assert_eq!(policy.category_for(&Emoji::unicode("🅱")), Some(ScoreField::Autism));
        assert_eq!(
            policy.category_for(&Emoji::custom("reee", "<:reee:4242>")),
            Some(ScoreField::Normie)
        );
        assert_eq!(policy.category_for(&heart()), Some(ScoreField::Nice));
        assert_eq!(
            policy.category_for(&Emoji::custom("pech", "<:pech:1>")),
            Some(ScoreField::Toxic)
        );
        assert_eq!(policy.category_for(&Emoji::unicode("👍")), None);
        // custom emoji are matched by name, not by rendered form
        assert_eq!(policy.category_for(&Emoji::custom("other", "<:other:7>")), None);
    }

    #[tokio::test]
    async fn test_add_from_other_member_applies() {
        let p = processor();
        let dir = MemberDirectory::new();
        let outcome = p
            .on_reaction_add(&id("r"), &ContentItem::plain("u"), &Emoji::unicode("🅱"), &dir)
            .await;

        assert_eq!(
            outcome,
            ReactionOutcome::Applied {
                target: id("u"),
                field: ScoreField::Autism,
                scores: ScoreVector::new(3, 2, 2, 2),
            }
        );
    }

    #[tokio::test]
    async fn test_self_add_suppressed_without_override() {
        let p = processor();
        let dir = MemberDirectory::new();
        let outcome = p
            .on_reaction_add(&id("u"), &ContentItem::plain("u"), &heart(), &dir)
            .await;

        assert_eq!(
            outcome,
            ReactionOutcome::Suppressed {
                target: id("u"),
                reason: SuppressReason::SelfReaction
            }
        );
        // suppressed events never create the entry
        assert_eq!(p.store().peek(&id("u")).await, None);
    }

    #[tokio::test]
    async fn test_self_add_allowed_for_both_add_overrides() {
        let p = processor();
        let dir = MemberDirectory::new();
        for who in [JOHNY, MATT] {
            let outcome = p
                .on_reaction_add(&id(who), &ContentItem::plain(who), &heart(), &dir)
                .await;
            assert!(matches!(outcome, ReactionOutcome::Applied { .. }), "{}", who);
        }
    }

    #[tokio::test]
    async fn test_self_remove_override_set_is_smaller() {
        let p = processor();
        let dir = MemberDirectory::new();

        let johny = p
            .on_reaction_remove(&id(JOHNY), &ContentItem::plain(JOHNY), &heart(), &dir)
            .await;
        assert!(matches!(johny, ReactionOutcome::Applied { .. }));

        let matt = p
            .on_reaction_remove(&id(MATT), &ContentItem::plain(MATT), &heart(), &dir)
            .await;
        assert_eq!(
            matt,
            ReactionOutcome::Suppressed {
                target: id(MATT),
                reason: SuppressReason::SelfReaction
            }
        );
    }

    #[tokio::test]
    async fn test_bot_content_always_suppressed() {
        let p = processor();
        let dir = MemberDirectory::new();
        // even an override identity cannot score the bot
        let outcome = p
            .on_reaction_add(&id(JOHNY), &ContentItem::plain(BOT), &heart(), &dir)
            .await;
        assert_eq!(
            outcome,
            ReactionOutcome::Suppressed {
                target: id(BOT),
                reason: SuppressReason::BotContent
            }
        );
        assert!(p.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_unrecognized_emoji_creates_entry_only() {
        let p = processor();
        let dir = MemberDirectory::new();
        let outcome = p
            .on_reaction_add(&id("r"), &ContentItem::plain("u"), &Emoji::unicode("👍"), &dir)
            .await;

        assert_eq!(outcome, ReactionOutcome::Unrecognized { target: id("u") });
        assert_eq!(p.store().peek(&id("u")).await, Some(ScoreVector::prior()));
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_vector() {
        let p = processor();
        let dir = MemberDirectory::new();
        let content = ContentItem::plain("u");
        let toxic = Emoji::custom("pech", "<:pech:1>");

        p.on_reaction_add(&id("r"), &content, &toxic, &dir).await;
        let outcome = p.on_reaction_remove(&id("r"), &content, &toxic, &dir).await;

        assert!(matches!(
            outcome,
            ReactionOutcome::Applied { scores, .. } if scores == ScoreVector::prior()
        ));
    }

    #[tokio::test]
    async fn test_repost_reaction_credits_original_author() {
        let p = processor();
        let dir = MemberDirectory::new();
        dir.upsert(Member::new("u", "raines", "https://cdn/raines.png"));

        let repost = ContentItem {
            author: id(BOT),
            embeds: vec![json!({"author": {"name": "raines", "icon_url": "https://cdn/raines.png"}})],
        };
        let outcome = p.on_reaction_add(&id("r"), &repost, &heart(), &dir).await;

        assert!(matches!(outcome, ReactionOutcome::Applied { ref target, .. } if target == &id("u")));
        assert_eq!(p.store().peek(&id(BOT)).await, None);
    }

    #[tokio::test]
    async fn test_original_author_reacting_to_own_repost_is_self_reaction() {
        let p = processor();
        let dir = MemberDirectory::new();
        dir.upsert(Member::new("u", "raines", "https://cdn/raines.png"));

        let repost = ContentItem {
            author: id(BOT),
            embeds: vec![json!({"author": {"name": "raines", "icon_url": "https://cdn/raines.png"}})],
        };
        let outcome = p.on_reaction_add(&id("u"), &repost, &heart(), &dir).await;

        assert!(matches!(
            outcome,
            ReactionOutcome::Suppressed { reason: SuppressReason::SelfReaction, .. }
        ));
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = ReactionOutcome::Suppressed {
            target: id("u"),
            reason: SuppressReason::BotContent,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["outcome"], "suppressed");
        assert_eq!(value["reason"], "bot_content");
        assert_eq!(value["target"], "u");
    }
}
