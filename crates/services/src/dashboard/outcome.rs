use serde::Serialize;
use tracing::warn;

use crate::dao::base::{DaoError, ErrorCategory};

/// The part of the aggregation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Dashboard,
    TeamScan,
    Events,
    Messages,
    Activities,
    Metrics,
    SnapshotWrite,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Dashboard => "dashboard",
            Stage::TeamScan => "team_scan",
            Stage::Events => "events",
            Stage::Messages => "messages",
            Stage::Activities => "activities",
            Stage::Metrics => "metrics",
            Stage::SnapshotWrite => "snapshot_write",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub category: ErrorCategory,
    pub message: String,
    /// Index of the failed batch, for batched stages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<usize>,
    /// Hex id of the team the failure concerns, for per-team stages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl StageFailure {
    pub fn new(stage: Stage, category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            stage,
            category,
            message: message.into(),
            chunk: None,
            team_id: None,
        }
    }

    pub fn from_dao(stage: Stage, error: &DaoError) -> Self {
        Self::new(stage, error.category(), error.to_string())
    }

    pub fn in_chunk(mut self, chunk: usize) -> Self {
        self.chunk = Some(chunk);
        self
    }

    pub fn for_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Emits the failure as a structured warning.
    pub fn log(&self) {
        warn!(
            stage = self.stage.as_str(),
            category = %self.category,
            chunk = ?self.chunk,
            team_id = ?self.team_id,
            error = %self.message,
            "Dashboard stage degraded"
        );
    }
}

/// Result of one fetch that may have partially degraded.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Complete(T),
    Partial { data: T, failures: Vec<StageFailure> },
    Failed(StageFailure),
}

impl<T> FetchOutcome<T> {
    /// `Complete` when `failures` is empty, `Partial` otherwise.
    pub fn from_parts(data: T, failures: Vec<StageFailure>) -> Self {
        if failures.is_empty() {
            FetchOutcome::Complete(data)
        } else {
            FetchOutcome::Partial { data, failures }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, FetchOutcome::Complete(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchOutcome::Complete(data) | FetchOutcome::Partial { data, .. } => Some(data),
            FetchOutcome::Failed(_) => None,
        }
    }

    pub fn failures(&self) -> &[StageFailure] {
        match self {
            FetchOutcome::Complete(_) => &[],
            FetchOutcome::Partial { failures, .. } => failures,
            FetchOutcome::Failed(failure) => std::slice::from_ref(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Complete(data) => FetchOutcome::Complete(f(data)),
            FetchOutcome::Partial { data, failures } => FetchOutcome::Partial {
                data: f(data),
                failures,
            },
            FetchOutcome::Failed(failure) => FetchOutcome::Failed(failure),
        }
    }

    /// Splits into whatever data survived and every recorded failure.
    pub fn into_parts(self) -> (Option<T>, Vec<StageFailure>) {
        match self {
            FetchOutcome::Complete(data) => (Some(data), Vec::new()),
            FetchOutcome::Partial { data, failures } => (Some(data), failures),
            FetchOutcome::Failed(failure) => (None, vec![failure]),
        }
    }
}

impl<T: Default> FetchOutcome<T> {
    pub fn into_data_or_default(self) -> T {
        self.into_parts().0.unwrap_or_default()
    }

    /// Like `into_parts`, with a failed fetch degraded to `T::default()`.
    pub fn degrade(self) -> (T, Vec<StageFailure>) {
        let (data, failures) = self.into_parts();
        (data.unwrap_or_default(), failures)
    }
}
