use bson::oid::ObjectId;
use tracing::{debug, warn};

use super::batch::fan_out;
use super::clock::TimeWindow;
use super::outcome::{FetchOutcome, Stage};
use super::store::DashboardStore;
use super::view::DashboardSession;

/// Events of `team_ids` starting inside `window`, earliest first.
pub async fn fetch_sessions(
    store: &dyn DashboardStore,
    team_ids: &[ObjectId],
    window: TimeWindow,
    batch_size: usize,
    viewer: &ObjectId,
) -> FetchOutcome<Vec<DashboardSession>> {
    let (from, until) = window.bson_bounds();
    let outcome = fan_out(Stage::Events, team_ids, batch_size, |chunk| async move {
        store.find_events_starting_between(&chunk, from, until).await
    })
    .await;

    outcome.map(|events| {
        let mut sessions: Vec<DashboardSession> = events
            .into_iter()
            .filter(|event| {
                let valid = event.start_time <= event.end_time;
                if !valid {
                    warn!(event_id = ?event.id, "Skipping event that ends before it starts");
                }
                valid
            })
            .map(|event| DashboardSession::from_event(event, viewer))
            .collect();
        sessions.sort_by_key(|s| s.start_time);
        debug!(count = sessions.len(), "Fetched sessions");
        sessions
    })
}
