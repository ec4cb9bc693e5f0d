//! # Spectrum Reputation Engine (spectrum-rep)
//!
//! Turns reaction events on chat messages into per-identity score vectors,
//! derives percentage metrics from them and exports the population as 2-D
//! spectrum coordinates.
//!
//! **Pipeline:** reaction event → [`resolver`] (who really wrote this?) →
//! [`processor`] guard rules → [`store`] adjustment → [`persistence`]
//! write-through. [`snapshot`] periodically writes the whole table as a
//! fallback copy.

use axum::Router;
use chrono_tz::Tz;
use spectrum_common::config::ReputationSettings;
use spectrum_common::db::init_database;
use spectrum_common::{time, IdentityId};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod config;
pub mod directory;
pub mod error;
pub mod metrics;
pub mod persistence;
pub mod processor;
pub mod report;
pub mod reposter;
pub mod resolver;
pub mod snapshot;
pub mod spectrum;
pub mod store;

pub use error::{Error, Result};
pub use store::ReputationStore;

use directory::MemberDirectory;
use persistence::{spawn_persistence_worker, PersistHandle, PersistStats, SqliteScoreStore};
use processor::{ReactionPolicy, ReactionProcessor};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReputationStore>,
    pub processor: Arc<ReactionProcessor>,
    pub directory: Arc<MemberDirectory>,
    pub bot_id: Option<IdentityId>,
    pub repost_timezone: Tz,
}

impl AppState {
    /// Create new application state around an existing store
    ///
    /// An unknown `repost_timezone` falls back to UTC.
    pub fn new(
        store: Arc<ReputationStore>,
        directory: Arc<MemberDirectory>,
        settings: &ReputationSettings,
    ) -> Self {
        let processor = ReactionProcessor::new(store.clone(), ReactionPolicy::from_settings(settings));
        Self {
            store,
            processor: Arc::new(processor),
            directory,
            bot_id: settings.bot_id.clone(),
            repost_timezone: time::parse_timezone(&settings.repost_timezone).unwrap_or_else(|e| {
                warn!("{} (repost titles use UTC)", e);
                Tz::UTC
            }),
        }
    }
}

/// Score store plus whatever durable backing could be opened
pub struct Backend {
    pub store: Arc<ReputationStore>,
    /// `None` when the database could not be opened
    pub pool: Option<SqlitePool>,
    /// Finishes once every store handle is dropped and the queue is drained
    pub persist_worker: Option<JoinHandle<PersistStats>>,
}

/// Open the database and warm-start the store
///
/// A database that cannot be opened is not fatal: the store runs in memory
/// only, warm-started from the snapshot blob.
pub async fn open_backend(db_path: &Path, snapshot_path: &Path, persist_timeout: Duration) -> Backend {
    let pool = match init_database(db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(
                "Could not open database {}: {} (scores will not be persisted)",
                db_path.display(),
                e
            );
            let store = ReputationStore::warm_start(None, snapshot_path, PersistHandle::disabled()).await;
            return Backend {
                store: Arc::new(store),
                pool: None,
                persist_worker: None,
            };
        }
    };

    let durable = Arc::new(SqliteScoreStore::new(pool.clone()));
    let (persist, worker) = spawn_persistence_worker(durable.clone(), persist_timeout);
    let store = ReputationStore::warm_start(Some(durable.as_ref()), snapshot_path, persist).await;

    Backend {
        store: Arc::new(store),
        pool: Some(pool),
        persist_worker: Some(worker),
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let api = Router::new()
        .route("/api/reactions/add", post(api::reaction_add))
        .route("/api/reactions/remove", post(api::reaction_remove))
        .route(
            "/api/scores/:id",
            get(api::check_identity).delete(api::remove_identity),
        )
        .route("/api/spectrum", get(api::get_spectrum))
        .route("/api/members", put(api::upsert_members))
        .route("/api/messages/deleted", post(api::message_deleted));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
