//! Authoritative in-memory score table
//!
//! One async mutex guards the whole table, so every adjustment is a
//! serialized read-modify-write no matter how many requests are in flight.
//! Durable writes are queued on the [`PersistHandle`] while the lock is held,
//! which keeps per-identity write order intact without awaiting the database.

use crate::persistence::{DurableStore, PersistHandle};
use crate::snapshot;
use spectrum_common::{IdentityId, ScoreField, ScoreVector};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Direction of a reaction event and its counter delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionDirection {
    Add,
    Remove,
}

impl ReactionDirection {
    pub fn delta(&self) -> i64 {
        match self {
            ReactionDirection::Add => 1,
            ReactionDirection::Remove => -1,
        }
    }
}

/// Identity → score vector table with write-through persistence
#[derive(Debug)]
pub struct ReputationStore {
    table: Mutex<HashMap<IdentityId, ScoreVector>>,
    persist: PersistHandle,
}

impl ReputationStore {
    pub fn new(persist: PersistHandle) -> Self {
        Self::with_entries(Vec::new(), persist)
    }

    /// Start from previously stored vectors (entries are not re-persisted)
    pub fn with_entries(entries: Vec<(IdentityId, ScoreVector)>, persist: PersistHandle) -> Self {
        Self {
            table: Mutex::new(entries.into_iter().collect()),
            persist,
        }
    }

    /// Populate from the durable store, falling back to the snapshot blob
    ///
    /// `durable` is `None` when the database could not be opened. No source
    /// failing is fatal; the store then starts empty.
    pub async fn warm_start(
        durable: Option<&dyn DurableStore>,
        snapshot_path: &Path,
        persist: PersistHandle,
    ) -> Self {
        match durable {
            Some(durable) => match durable.scan_all().await {
                Ok(entries) => {
                    info!("Loaded {} score vectors from database", entries.len());
                    return Self::with_entries(entries, persist);
                }
                Err(e) => warn!("Could not scan durable store: {} (trying snapshot)", e),
            },
            None => info!("No durable store available (trying snapshot)"),
        }

        match snapshot::load_snapshot(snapshot_path).await {
            Ok(snap) => {
                let entries = snap.into_entries();
                info!(
                    "Loaded {} score vectors from snapshot {}",
                    entries.len(),
                    snapshot_path.display()
                );
                Self::with_entries(entries, persist)
            }
            Err(e) => {
                warn!("Could not load snapshot: {} (starting empty)", e);
                Self::new(persist)
            }
        }
    }

    /// Current vector, creating it at the prior if unseen
    ///
    /// A newly created vector is queued for durable creation.
    pub async fn get(&self, id: &IdentityId) -> ScoreVector {
        let mut table = self.table.lock().await;
        *self.entry(&mut table, id)
    }

    /// Current vector without creating one
    pub async fn peek(&self, id: &IdentityId) -> Option<ScoreVector> {
        self.table.lock().await.get(id).copied()
    }

    /// Apply a +1/-1 delta to one counter and queue the write-through
    ///
    /// Only the reaction processor mutates counters.
    pub(crate) async fn adjust(
        &self,
        id: &IdentityId,
        field: ScoreField,
        direction: ReactionDirection,
    ) -> ScoreVector {
        let mut table = self.table.lock().await;
        let scores = self.entry(&mut table, id);
        scores.apply(field, direction.delta());
        let updated = *scores;
        self.write_through(id, updated);
        updated
    }

    /// Drop the in-memory entry; the durable row is left untouched
    pub async fn remove(&self, id: &IdentityId) -> Option<ScoreVector> {
        self.table.lock().await.remove(id)
    }

    /// Queue a durable write of the identity's current vector, if tracked
    pub async fn persist(&self, id: &IdentityId) {
        let table = self.table.lock().await;
        if let Some(scores) = table.get(id) {
            self.write_through(id, *scores);
        }
    }

    /// Consistent copy of the whole table, ordered by identity
    pub async fn snapshot(&self) -> Vec<(IdentityId, ScoreVector)> {
        let mut entries: Vec<_> = {
            let table = self.table.lock().await;
            table.iter().map(|(id, s)| (id.clone(), *s)).collect()
        };
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn entry<'a>(
        &self,
        table: &'a mut HashMap<IdentityId, ScoreVector>,
        id: &IdentityId,
    ) -> &'a mut ScoreVector {
        table.entry(id.clone()).or_insert_with(|| {
            self.write_through(id, ScoreVector::prior());
            ScoreVector::prior()
        })
    }

    /// Every durable write leaves the store through here, under the table lock
    fn write_through(&self, id: &IdentityId, scores: ScoreVector) {
        self.persist.enqueue(id.clone(), scores);
    }
}
