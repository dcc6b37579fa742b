use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use rosterline_db::models::TeamMetric;
use rosterline_services::dashboard::{
    DashboardData, MetricsOverview, StageFailure, WriteStatsSnapshot,
};
use serde::Serialize;
use tracing::{debug, warn};

use super::outcome_status;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub data: DashboardData,
    pub unread_count: usize,
    pub failures: Vec<StageFailure>,
}

#[derive(Debug, Serialize)]
pub struct TeamMetricResponse {
    pub team_id: String,
    pub team_name: String,
    pub active_athletes: u32,
    pub attendance_rate: f64,
    pub awards_given: u64,
    pub performance_score: u32,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub status: &'static str,
    pub metrics: Vec<TeamMetricResponse>,
    pub overview: MetricsOverview,
    pub failures: Vec<StageFailure>,
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let user = state.dashboard.load_user(auth.user_id).await?;
    let outcome = state.dashboard.fetch_dashboard_data(&user).await;

    let status = outcome_status(&outcome);
    let (data, failures) = outcome.degrade();

    Ok(Json(DashboardResponse {
        status,
        unread_count: data.unread_count(),
        data,
        failures,
    }))
}

pub async fn metrics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MetricsResponse>, ApiError> {
    let user = state.dashboard.load_user(auth.user_id).await?;
    let report = state.dashboard.fetch_team_metrics(&user).await;

    let writes = report.writes;
    if !writes.is_empty() {
        let user_id = auth.user_id;
        tokio::spawn(async move {
            let expected = writes.len();
            let failures = writes.failures().await;
            if failures.is_empty() {
                debug!(%user_id, writes = expected, "Metric snapshots acknowledged");
            } else {
                warn!(
                    %user_id,
                    writes = expected,
                    failed = failures.len(),
                    "Some metric snapshots were not persisted"
                );
            }
        });
    }

    let status = outcome_status(&report.outcome);
    let (metrics, failures) = report.outcome.degrade();

    Ok(Json(MetricsResponse {
        status,
        overview: MetricsOverview::from_metrics(&metrics),
        metrics: metrics.into_iter().map(to_response).collect(),
        failures,
    }))
}

pub async fn write_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Json<WriteStatsSnapshot> {
    Json(state.dashboard.write_stats())
}

fn to_response(metric: TeamMetric) -> TeamMetricResponse {
    TeamMetricResponse {
        team_id: metric.team_id.to_hex(),
        team_name: metric.team_name,
        active_athletes: metric.active_athletes,
        attendance_rate: metric.attendance_rate,
        awards_given: metric.awards_given,
        performance_score: metric.performance_score,
        computed_at: metric.computed_at.to_chrono(),
    }
}
