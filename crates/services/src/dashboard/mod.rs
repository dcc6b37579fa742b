pub mod activities;
pub mod batch;
pub mod clock;
pub mod events;
pub mod memory;
pub mod messages;
pub mod metrics;
pub mod outcome;
pub mod resolver;
pub mod snapshot;
pub mod store;
pub mod view;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bson::oid::ObjectId;
use futures::FutureExt;
use futures::future::join_all;
use rosterline_config::DashboardSettings;
use rosterline_db::models::{Activity, TeamMetric, User};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::dao::base::{DaoError, ErrorCategory};

pub use clock::{Clock, FixedClock, SystemClock, TimeWindow};
pub use memory::MemoryStore;
pub use metrics::MetricsOverview;
pub use outcome::{FetchOutcome, Stage, StageFailure};
pub use snapshot::{PendingWrite, SnapshotWriter, WriteAcks, WriteStatsSnapshot};
pub use store::{DashboardStore, MongoStore};
pub use view::{
    DashboardActivity, DashboardData, DashboardMessage, DashboardSession, DashboardTeam,
    PendingRequest,
};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Validation: {0}")]
    Validation(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Store(#[from] DaoError),
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::Validation(_) => ErrorCategory::InvalidArgument,
            DashboardError::Forbidden(_) => ErrorCategory::PermissionDenied,
            DashboardError::Store(e) => e.category(),
        }
    }
}

/// Input for a new activity-feed entry. Every field may be absent so the
/// service, not the deserializer, reports what is missing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewActivity {
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    #[serde(skip)]
    pub created_by: Option<ObjectId>,
}

/// Team metrics plus an acknowledgement handle per persisted snapshot.
pub struct MetricsReport {
    pub outcome: FetchOutcome<Vec<TeamMetric>>,
    pub writes: WriteAcks,
}

/// Entry points for the dashboard widgets. Every call takes the viewer
/// explicitly; nothing is read from ambient session state.
pub struct DashboardService {
    store: Arc<dyn DashboardStore>,
    settings: DashboardSettings,
    clock: Arc<dyn Clock>,
    writer: SnapshotWriter,
}

impl DashboardService {
    pub fn new(
        store: Arc<dyn DashboardStore>,
        settings: DashboardSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let writer = SnapshotWriter::new(Arc::clone(&store));
        Self {
            store,
            settings,
            clock,
            writer,
        }
    }

    pub fn write_stats(&self) -> WriteStatsSnapshot {
        self.writer.stats()
    }

    pub async fn load_user(&self, user_id: ObjectId) -> Result<User, DashboardError> {
        Ok(self.store.find_user(user_id).await?)
    }

    /// Whether `user` belongs to `team_id`, either through their own team
    /// list or the team's roster. An unknown team is not an error.
    pub async fn is_team_member(
        &self,
        user: &User,
        team_id: ObjectId,
    ) -> Result<bool, DashboardError> {
        if user.teams.contains(&team_id) {
            return Ok(true);
        }
        let Some(user_id) = user.id else {
            return Ok(false);
        };
        match self.store.find_team(team_id).await {
            Ok(team) => Ok(team.has_member(&user_id)),
            Err(DaoError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Sessions, messages, activities, teams and pending requests for `user`.
    ///
    /// Stage failures degrade that stage to empty and are reported alongside
    /// the data. A panic anywhere inside yields `Failed`, whose default data
    /// is the all-empty dashboard.
    pub async fn fetch_dashboard_data(&self, user: &User) -> FetchOutcome<DashboardData> {
        match AssertUnwindSafe(self.aggregate(user)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(user_id = ?user.id, "Dashboard aggregation panicked");
                FetchOutcome::Failed(StageFailure::new(
                    Stage::Dashboard,
                    ErrorCategory::Unknown,
                    "dashboard aggregation aborted",
                ))
            }
        }
    }

    async fn aggregate(&self, user: &User) -> FetchOutcome<DashboardData> {
        let Some(viewer) = user.id else {
            warn!(email = %user.email, "Dashboard requested for a user without id");
            return FetchOutcome::Complete(DashboardData::default());
        };
        let mut failures = Vec::new();

        let resolution = match self.store.scan_teams().await {
            Ok(documents) => resolver::resolve_teams(user, documents),
            Err(e) => {
                let failure = StageFailure::from_dao(Stage::TeamScan, &e);
                failure.log();
                failures.push(failure);
                resolver::TeamResolution::default()
            }
        };

        let resolved_ids = resolution.team_ids();
        let team_ids = batch::dedupe_ids(user.teams.iter().chain(resolved_ids.iter()));
        let batch_size = self.settings.query_batch_size;
        let window = TimeWindow::upcoming_days(self.clock.as_ref(), self.settings.schedule_window_days);

        let (sessions, messages, activities) = tokio::join!(
            events::fetch_sessions(self.store.as_ref(), &team_ids, window, batch_size, &viewer),
            messages::fetch_messages(
                self.store.as_ref(),
                &team_ids,
                self.settings.message_limit,
                batch_size,
                &viewer,
            ),
            activities::fetch_activity_feed(
                self.store.as_ref(),
                &team_ids,
                self.settings.activity_limit,
                batch_size,
            ),
        );

        let (sessions, mut stage_failures) = sessions.degrade();
        failures.append(&mut stage_failures);
        let (messages, mut stage_failures) = messages.degrade();
        failures.append(&mut stage_failures);
        let (activities, mut stage_failures) = activities.degrade();
        failures.append(&mut stage_failures);

        let data = DashboardData {
            sessions,
            messages,
            activities,
            teams: resolution.teams.iter().map(DashboardTeam::from).collect(),
            pending_requests: resolution.pending_requests,
        };

        info!(
            user_id = %viewer,
            teams = data.teams.len(),
            sessions = data.sessions.len(),
            messages = data.messages.len(),
            activities = data.activities.len(),
            degraded_stages = failures.len(),
            "Dashboard aggregated"
        );
        FetchOutcome::from_parts(data, failures)
    }

    /// Recomputes and persists a metric snapshot for each of `user`'s teams.
    ///
    /// A team whose inputs cannot be read is left out; the rest still come
    /// back. Writes run in the background and are acknowledged through the
    /// report.
    pub async fn fetch_team_metrics(&self, user: &User) -> MetricsReport {
        let team_ids = batch::dedupe_ids(&user.teams);
        if team_ids.is_empty() {
            return MetricsReport {
                outcome: FetchOutcome::Complete(Vec::new()),
                writes: WriteAcks::default(),
            };
        }

        let window = TimeWindow::trailing_days(self.clock.as_ref(), self.settings.metrics_lookback_days);
        let computed_at = self.clock.now();

        let results = join_all(
            team_ids
                .iter()
                .map(|team_id| self.compute_metric(*team_id, window, computed_at)),
        )
        .await;

        let mut metrics = Vec::new();
        let mut failures = Vec::new();
        for (team_id, result) in team_ids.iter().zip(results) {
            match result {
                Ok(metric) => metrics.push(metric),
                Err(e) => {
                    let failure = StageFailure::from_dao(Stage::Metrics, &e).for_team(team_id.to_hex());
                    failure.log();
                    failures.push(failure);
                }
            }
        }

        let writes: WriteAcks = metrics
            .iter()
            .map(|metric| self.writer.persist(metric.clone()))
            .collect();

        let outcome = if metrics.is_empty() && !failures.is_empty() {
            FetchOutcome::Failed(failures.swap_remove(0))
        } else {
            FetchOutcome::from_parts(metrics, failures)
        };
        MetricsReport { outcome, writes }
    }

    async fn compute_metric(
        &self,
        team_id: ObjectId,
        window: TimeWindow,
        computed_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<TeamMetric, DaoError> {
        let (from, until) = window.bson_bounds();
        let ids = [team_id];
        let (team, events, awards) = tokio::join!(
            self.store.find_team(team_id),
            self.store.find_events_starting_between(&ids, from, until),
            self.store.count_awards(team_id),
        );
        let team = team?;
        let metric = metrics::compute_team_metric(
            team_id,
            &team,
            &events?,
            awards?,
            &window,
            computed_at,
        );
        debug!(
            %team_id,
            score = metric.performance_score,
            attendance = metric.attendance_rate,
            "Computed team metric"
        );
        Ok(metric)
    }

    /// Recent activity for `team_ids`, newest first. Read-only.
    pub async fn fetch_activities(&self, team_ids: &[ObjectId]) -> FetchOutcome<Vec<DashboardActivity>> {
        if team_ids.is_empty() {
            return FetchOutcome::Complete(Vec::new());
        }
        activities::fetch_activity_feed(
            self.store.as_ref(),
            team_ids,
            self.settings.activity_limit,
            self.settings.query_batch_size,
        )
        .await
    }

    /// Validates and stores a feed entry, back-filling the team name when it
    /// is not given. Returns the new entry's id.
    pub async fn create_activity(&self, data: NewActivity) -> Result<ObjectId, DashboardError> {
        let team_id = validate_activity(&data)?;
        self.write_activity(data, team_id).await
    }

    /// Like [`create_activity`](Self::create_activity), on behalf of
    /// `author`, who must belong to the target team. Field validation runs
    /// before the membership check.
    pub async fn create_team_activity(
        &self,
        author: &User,
        mut data: NewActivity,
    ) -> Result<ObjectId, DashboardError> {
        data.created_by = author.id;
        let team_id = validate_activity(&data)?;
        if !self.is_team_member(author, team_id).await? {
            warn!(user_id = ?author.id, %team_id, "Activity rejected for non-member");
            return Err(DashboardError::Forbidden(format!(
                "Not a member of team {team_id}"
            )));
        }
        self.write_activity(data, team_id).await
    }

    async fn write_activity(
        &self,
        data: NewActivity,
        team_id: ObjectId,
    ) -> Result<ObjectId, DashboardError> {
        let team_name = match data.team_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => match self.store.find_team(team_id).await {
                Ok(team) => Some(team.name),
                Err(e) => {
                    warn!(%team_id, category = %e.category(), error = %e, "Team name lookup failed");
                    None
                }
            },
        };

        let activity = Activity {
            id: None,
            activity_type: required(&data.activity_type, "type")?.to_string(),
            title: required(&data.title, "title")?.to_string(),
            description: required(&data.description, "description")?.to_string(),
            team_id,
            team_name,
            created_by: data.created_by,
            created_at: bson::DateTime::from_chrono(self.clock.now()),
        };

        let id = self.store.insert_activity(&activity).await?;
        info!(%id, %team_id, activity_type = %activity.activity_type, "Activity created");
        Ok(id)
    }
}

/// Checks required fields and lengths, returning the parsed team id.
fn validate_activity(data: &NewActivity) -> Result<ObjectId, DashboardError> {
    required(&data.activity_type, "type")?;
    required(&data.title, "title")?;
    required(&data.description, "description")?;
    let team_id = required(&data.team_id, "team_id")?;
    let team_id = ObjectId::parse_str(team_id)
        .map_err(|_| DashboardError::Validation(format!("Invalid team_id: {team_id}")))?;
    data.validate()
        .map_err(|e| DashboardError::Validation(e.to_string()))?;
    Ok(team_id)
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, DashboardError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DashboardError::Validation(format!(
            "Missing required field: {field}"
        ))),
    }
}
