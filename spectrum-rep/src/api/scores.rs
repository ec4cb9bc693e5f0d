//! Administrative score queries

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use spectrum_common::{IdentityId, ScoreVector};
use tracing::info;

use super::ApiError;
use crate::report::CheckReport;
use crate::resolver::HostingContext;
use crate::AppState;

/// GET /api/scores/:id
///
/// Unseen identities are created at the prior. The assistant cannot be checked.
pub async fn check_identity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CheckReport>, ApiError> {
    let id = IdentityId::new(id);
    if state.bot_id.as_ref() == Some(&id) {
        return Err(ApiError::Conflict("Leave me out of this".to_string()));
    }

    let scores = state.store.get(&id).await;
    let display_name = state
        .directory
        .find_by_id(&id)
        .map(|m| m.display_name)
        .unwrap_or_else(|| id.to_string());

    Ok(Json(CheckReport::new(id, display_name, scores)))
}

/// Response for a removed identity
#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub identity: IdentityId,
    pub scores: ScoreVector,
}

/// DELETE /api/scores/:id
///
/// Drops the in-memory entry only.
pub async fn remove_identity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let id = IdentityId::new(id);
    match state.store.remove(&id).await {
        Some(scores) => {
            info!(identity = %id, "Removed from spectrum");
            Ok(Json(RemovedResponse {
                identity: id,
                scores,
            }))
        }
        None => Err(ApiError::NotFound(format!("{} is not tracked", id))),
    }
}
