//! Member roster updates

use axum::{extract::State, Json};
use serde::Serialize;
use spectrum_common::Member;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub updated: usize,
    pub total: usize,
}

/// PUT /api/members
pub async fn upsert_members(
    State(state): State<AppState>,
    Json(members): Json<Vec<Member>>,
) -> Json<MembersResponse> {
    let updated = members.len();
    for member in members {
        state.directory.upsert(member);
    }
    Json(MembersResponse {
        updated,
        total: state.directory.len(),
    })
}
