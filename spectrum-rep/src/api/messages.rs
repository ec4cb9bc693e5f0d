//! Deleted message reposting

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::reposter::{compose_repost, DeletedMessage};
use crate::AppState;

/// POST /api/messages/deleted
///
/// Returns the embed to post, or 204 when nothing should be reposted.
pub async fn message_deleted(
    State(state): State<AppState>,
    Json(message): Json<DeletedMessage>,
) -> Response {
    match compose_repost(&message, state.bot_id.as_ref(), state.repost_timezone) {
        Some(repost) => Json(repost.to_embed()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
