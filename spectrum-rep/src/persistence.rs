//! Durable write-through
//!
//! The store never awaits the database while holding its table lock. Each
//! mutation enqueues the identity's current vector on an unbounded channel;
//! a single worker task drains it in order, bounding every durable call with
//! a timeout. Failures are logged and dropped: the in-memory table stays
//! authoritative for the lifetime of the process.

use crate::error::{Error, Result};
use async_trait::async_trait;
use spectrum_common::{db, IdentityId, ScoreVector};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Keyed upsert + full scan over the durable backing store
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn put(&self, id: &IdentityId, scores: &ScoreVector) -> Result<()>;

    /// Every stored vector, used for warm start
    async fn scan_all(&self) -> Result<Vec<(IdentityId, ScoreVector)>>;
}

/// SQLite-backed durable store
#[derive(Clone)]
pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DurableStore for SqliteScoreStore {
    async fn put(&self, id: &IdentityId, scores: &ScoreVector) -> Result<()> {
        db::upsert_score(&self.pool, id, scores).await?;
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<(IdentityId, ScoreVector)>> {
        Ok(db::load_all_scores(&self.pool).await?)
    }
}

/// One queued durable write
#[derive(Debug, Clone)]
struct PersistRequest {
    id: IdentityId,
    scores: ScoreVector,
}

/// Sending side of the persistence queue
///
/// A disabled handle drops every request; used when durability is off.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    tx: Option<mpsc::UnboundedSender<PersistRequest>>,
}

impl PersistHandle {
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue a write; never blocks
    pub fn enqueue(&self, id: IdentityId, scores: ScoreVector) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(PersistRequest { id, scores }).is_err() {
            warn!("Persistence worker stopped; durable write dropped");
        }
    }
}

/// Totals reported by the worker when its queue closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub written: u64,
    pub failed: u64,
}

/// Start the worker that drains the persistence queue
///
/// The worker exits once every [`PersistHandle`] clone has been dropped and
/// the queue is empty.
pub fn spawn_persistence_worker(
    durable: Arc<dyn DurableStore>,
    timeout: Duration,
) -> (PersistHandle, JoinHandle<PersistStats>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<PersistRequest>();

    let worker = tokio::spawn(async move {
        let mut stats = PersistStats::default();
        info!("Persistence worker started ({}ms write timeout)", timeout.as_millis());

        while let Some(request) = rx.recv().await {
            match write_bounded(durable.as_ref(), &request, timeout).await {
                Ok(()) => {
                    stats.written += 1;
                    debug!(identity = %request.id, "Persisted score vector");
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!(identity = %request.id, "Failed to persist score vector: {}", e);
                }
            }
        }

        info!(
            "Persistence worker stopped ({} written, {} failed)",
            stats.written, stats.failed
        );
        stats
    });

    (PersistHandle { tx: Some(tx) }, worker)
}

async fn write_bounded(
    durable: &dyn DurableStore,
    request: &PersistRequest,
    timeout: Duration,
) -> Result<()> {
    match tokio::time::timeout(timeout, durable.put(&request.id, &request.scores)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(format!(
            "durable write for {} exceeded {}ms",
            request.id,
            timeout.as_millis()
        ))),
    }
}
