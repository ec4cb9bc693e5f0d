//! HTTP API handlers for spectrum-rep
//!
//! The chat adapter forwards platform events here; administrative queries
//! share the same surface.

pub mod health;
pub mod members;
pub mod messages;
pub mod reactions;
pub mod scores;
pub mod spectrum;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub use health::health_routes;
pub use members::upsert_members;
pub use messages::message_deleted;
pub use reactions::{reaction_add, reaction_remove};
pub use scores::{check_identity, remove_identity};
pub use spectrum::get_spectrum;

/// API errors
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Conflict(String),
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
