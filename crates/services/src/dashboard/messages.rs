use std::cmp::Reverse;

use bson::oid::ObjectId;
use tracing::debug;

use super::batch::fan_out;
use super::outcome::{FetchOutcome, Stage};
use super::store::DashboardStore;
use super::view::DashboardMessage;

/// The `limit` newest messages across all of `team_ids`.
///
/// Each batch is capped at `limit` too, so the merged rows are re-sorted and
/// cut again; a per-batch cap alone says nothing about global recency.
pub async fn fetch_messages(
    store: &dyn DashboardStore,
    team_ids: &[ObjectId],
    limit: u32,
    batch_size: usize,
    viewer: &ObjectId,
) -> FetchOutcome<Vec<DashboardMessage>> {
    let outcome = fan_out(Stage::Messages, team_ids, batch_size, |chunk| async move {
        store.find_recent_messages(&chunk, limit as i64).await
    })
    .await;

    outcome.map(|mut messages| {
        messages.sort_by_key(|m| Reverse(m.created_at));
        messages.truncate(limit as usize);
        let messages: Vec<DashboardMessage> = messages
            .into_iter()
            .map(|m| DashboardMessage::from_message(m, viewer))
            .collect();
        debug!(
            count = messages.len(),
            unread = messages.iter().filter(|m| m.unread).count(),
            "Fetched messages"
        );
        messages
    })
}
