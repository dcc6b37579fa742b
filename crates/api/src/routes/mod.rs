pub mod activity;
pub mod dashboard;
pub mod health;

use rosterline_services::dashboard::FetchOutcome;

/// `complete`, `partial` or `failed`, as reported to clients.
pub(crate) fn outcome_status<T>(outcome: &FetchOutcome<T>) -> &'static str {
    match outcome {
        FetchOutcome::Complete(_) => "complete",
        FetchOutcome::Partial { .. } => "partial",
        FetchOutcome::Failed(_) => "failed",
    }
}
