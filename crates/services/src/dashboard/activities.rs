use std::cmp::Reverse;

use bson::oid::ObjectId;
use tracing::debug;

use super::batch::fan_out;
use super::outcome::{FetchOutcome, Stage};
use super::store::DashboardStore;
use super::view::DashboardActivity;

/// Recent activity across `team_ids`, newest first.
///
/// Each batch contributes at most `per_batch_limit` rows; the merged list is
/// not cut again.
pub async fn fetch_activity_feed(
    store: &dyn DashboardStore,
    team_ids: &[ObjectId],
    per_batch_limit: u32,
    batch_size: usize,
) -> FetchOutcome<Vec<DashboardActivity>> {
    let outcome = fan_out(Stage::Activities, team_ids, batch_size, |chunk| async move {
        store
            .find_recent_activities(&chunk, per_batch_limit as i64)
            .await
    })
    .await;

    outcome.map(|mut activities| {
        activities.sort_by_key(|a| Reverse(a.created_at));
        debug!(count = activities.len(), "Fetched activities");
        activities.into_iter().map(DashboardActivity::from).collect()
    })
}
