//! Periodic full-table snapshot
//!
//! A safety net under the per-mutation write-through: every interval the
//! whole table is copied and written as one JSON blob. Failures are logged
//! and the loop carries on until cancelled.

use crate::error::Result;
use crate::store::ReputationStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spectrum_common::{time, IdentityId, ScoreVector};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Serialized form of the whole score table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub scores: BTreeMap<IdentityId, ScoreVector>,
}

impl Snapshot {
    pub fn new(entries: &[(IdentityId, ScoreVector)]) -> Self {
        Self {
            taken_at: time::now(),
            scores: entries.iter().cloned().collect(),
        }
    }

    pub fn into_entries(self) -> Vec<(IdentityId, ScoreVector)> {
        self.scores.into_iter().collect()
    }
}

/// Write a snapshot atomically (temp file, then rename)
pub async fn save_snapshot(path: &Path, entries: &[(IdentityId, ScoreVector)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(&Snapshot::new(entries))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

pub async fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Background sweep writing the table to a blob on a fixed interval
pub struct SnapshotScheduler {
    store: Arc<ReputationStore>,
    path: PathBuf,
    every: Duration,
}

impl SnapshotScheduler {
    pub fn new(store: Arc<ReputationStore>, path: PathBuf, every: Duration) -> Self {
        Self { store, path, every }
    }

    /// Copy the table and write it out once
    pub async fn sweep(&self) -> Result<usize> {
        let entries = self.store.snapshot().await;
        save_snapshot(&self.path, &entries).await?;
        Ok(entries.len())
    }

    /// Run the sweep loop until `cancel` fires
    ///
    /// The first sweep happens immediately.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            "Snapshot scheduler started ({}s interval, {})",
            self.every.as_secs(),
            self.path.display()
        );

        let mut timer = interval(self.every);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = timer.tick() => {
                    match self.sweep().await {
                        Ok(count) => debug!("Snapshot written ({} identities)", count),
                        Err(e) => warn!("Could not save snapshot: {}", e),
                    }
                }
            }
        }

        info!("Snapshot scheduler stopped");
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistHandle;
    use tempfile::TempDir;

    fn store_with(entries: Vec<(IdentityId, ScoreVector)>) -> Arc<ReputationStore> {
        Arc::new(ReputationStore::with_entries(entries, PersistHandle::disabled()))
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("karma.json");
        let entries = vec![
            (IdentityId::new("a"), ScoreVector::new(3, 2, 2, 2)),
            (IdentityId::new("b"), ScoreVector::new(2, 2, -1, 5)),
        ];

        save_snapshot(&path, &entries).await.unwrap();
        let loaded = load_snapshot(&path).await.unwrap().into_entries();

        assert_eq!(loaded, entries);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_missing_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_snapshot(&dir.path().join("absent.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_corrupt_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("karma.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            load_snapshot(&path).await,
            Err(crate::Error::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_sweep_writes_current_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("karma.json");
        let store = store_with(vec![(IdentityId::new("a"), ScoreVector::prior())]);
        let scheduler = SnapshotScheduler::new(store.clone(), path.clone(), Duration::from_secs(600));

        assert_eq!(scheduler.sweep().await.unwrap(), 1);
        store.get(&IdentityId::new("b")).await;
        assert_eq!(scheduler.sweep().await.unwrap(), 2);

        let snap = load_snapshot(&path).await.unwrap();
        assert_eq!(snap.scores.len(), 2);
    }

    #[tokio::test]
    async fn test_sweep_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // parent "directory" is a regular file, so the write must fail
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let scheduler = SnapshotScheduler::new(
            store_with(Vec::new()),
            blocker.join("karma.json"),
            Duration::from_secs(600),
        );
        assert!(scheduler.sweep().await.is_err());
    }

    #[tokio::test]
    async fn test_run_sweeps_immediately_and_stops_on_cancel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("karma.json");
        let scheduler = SnapshotScheduler::new(
            store_with(vec![(IdentityId::new("a"), ScoreVector::prior())]),
            path.clone(),
            Duration::from_secs(600),
        );

        let cancel = CancellationToken::new();
        let handle = scheduler.spawn(cancel.clone());

        for _ in 0..100 {
            if path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(path.exists(), "first sweep should run without waiting an interval");

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler should stop after cancel")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_keeps_going_after_failures() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let scheduler = SnapshotScheduler::new(
            store_with(Vec::new()),
            blocker.join("karma.json"),
            Duration::from_millis(10),
        );

        let cancel = CancellationToken::new();
        let handle = scheduler.spawn(cancel.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!handle.is_finished());
        cancel.cancel();
        handle.await.unwrap();
    }
}
