use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bson::oid::ObjectId;
use futures::future::join_all;
use rosterline_db::models::TeamMetric;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::dao::base::ErrorCategory;

use super::outcome::{Stage, StageFailure};
use super::store::DashboardStore;

/// Running totals of snapshot writes, shared by every writer clone.
#[derive(Debug, Default)]
pub struct WriteStats {
    persisted: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteStatsSnapshot {
    pub persisted: u64,
    pub failed: u64,
}

impl WriteStats {
    pub fn snapshot(&self) -> WriteStatsSnapshot {
        WriteStatsSnapshot {
            persisted: self.persisted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Persists metric snapshots in background tasks.
///
/// The caller gets its data back immediately; each write reports through its
/// own `PendingWrite` and through the shared `WriteStats`.
#[derive(Clone)]
pub struct SnapshotWriter {
    store: Arc<dyn DashboardStore>,
    stats: Arc<WriteStats>,
}

impl SnapshotWriter {
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        Self {
            store,
            stats: Arc::new(WriteStats::default()),
        }
    }

    pub fn stats(&self) -> WriteStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn persist(&self, metric: TeamMetric) -> PendingWrite {
        let store = Arc::clone(&self.store);
        let stats = Arc::clone(&self.stats);
        let team_id = metric.team_id;

        let handle = tokio::spawn(async move {
            match store.save_team_metric(&metric).await {
                Ok(()) => {
                    stats.persisted.fetch_add(1, Ordering::Relaxed);
                    debug!(%team_id, "Team metric persisted");
                    Ok(())
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    error!(%team_id, category = %e.category(), error = %e, "Team metric write failed");
                    Err(StageFailure::from_dao(Stage::SnapshotWrite, &e).for_team(team_id.to_hex()))
                }
            }
        });

        PendingWrite { team_id, handle }
    }
}

/// Acknowledgement handle for one background snapshot write.
///
/// Dropping it detaches the write; it still runs and is still counted.
pub struct PendingWrite {
    pub team_id: ObjectId,
    handle: JoinHandle<Result<(), StageFailure>>,
}

impl PendingWrite {
    pub async fn acknowledged(self) -> Result<(), StageFailure> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_error) => Err(StageFailure::new(
                Stage::SnapshotWrite,
                ErrorCategory::Unknown,
                join_error.to_string(),
            )
            .for_team(self.team_id.to_hex())),
        }
    }
}

/// The pending writes of one metrics pass.
#[derive(Default)]
pub struct WriteAcks(Vec<PendingWrite>);

impl WriteAcks {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Waits for every write and returns the ones that failed.
    pub async fn failures(self) -> Vec<StageFailure> {
        join_all(self.0.into_iter().map(PendingWrite::acknowledged))
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect()
    }
}

impl FromIterator<PendingWrite> for WriteAcks {
    fn from_iter<I: IntoIterator<Item = PendingWrite>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
