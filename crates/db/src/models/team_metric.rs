use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Recomputed per-team snapshot, keyed by team id. Overwritten on every
/// metrics pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMetric {
    #[serde(rename = "_id")]
    pub team_id: ObjectId,
    pub team_name: String,
    pub active_athletes: u32,
    pub attendance_rate: f64,
    pub awards_given: u64,
    pub performance_score: u32,
    pub computed_at: DateTime,
}

impl TeamMetric {
    pub const COLLECTION: &'static str = "team_metrics";
}
