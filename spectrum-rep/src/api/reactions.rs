//! Reaction event ingestion
//!
//! Both routes are refused until `reputation.bot_id` is configured: without
//! it, reactions on the assistant's own posts would be scored against it.

use axum::{extract::State, Json};
use serde::Deserialize;
use spectrum_common::IdentityId;

use super::ApiError;
use crate::processor::{Emoji, ReactionOutcome};
use crate::resolver::ContentItem;
use crate::store::ReactionDirection;
use crate::AppState;

/// Reaction event as forwarded by the chat adapter
#[derive(Debug, Deserialize)]
pub struct ReactionEvent {
    pub reactor: IdentityId,
    pub content: ContentItem,
    pub emoji: Emoji,
}

/// POST /api/reactions/add
pub async fn reaction_add(
    State(state): State<AppState>,
    Json(event): Json<ReactionEvent>,
) -> Result<Json<ReactionOutcome>, ApiError> {
    ingest(&state, ReactionDirection::Add, event).await
}

/// POST /api/reactions/remove
pub async fn reaction_remove(
    State(state): State<AppState>,
    Json(event): Json<ReactionEvent>,
) -> Result<Json<ReactionOutcome>, ApiError> {
    ingest(&state, ReactionDirection::Remove, event).await
}

async fn ingest(
    state: &AppState,
    direction: ReactionDirection,
    event: ReactionEvent,
) -> Result<Json<ReactionOutcome>, ApiError> {
    if state.bot_id.is_none() {
        return Err(ApiError::Unavailable(
            "reputation.bot_id is not configured".to_string(),
        ));
    }

    let outcome = state
        .processor
        .process(
            direction,
            &event.reactor,
            &event.content,
            &event.emoji,
            state.directory.as_ref(),
        )
        .await;
    Ok(Json(outcome))
}
