use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use rosterline_services::dashboard::{DashboardActivity, NewActivity, StageFailure};
use serde::{Deserialize, Serialize};

use super::outcome_status;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Comma-separated team ids.
    #[serde(default)]
    pub team_ids: String,
}

#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub status: &'static str,
    pub items: Vec<DashboardActivity>,
    pub failures: Vec<StageFailure>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ActivityQuery>,
) -> Result<Json<ActivityListResponse>, ApiError> {
    let team_ids = parse_team_ids(&params.team_ids)?;
    let user = state.dashboard.load_user(auth.user_id).await?;
    for team_id in &team_ids {
        if !state.dashboard.is_team_member(&user, *team_id).await? {
            return Err(ApiError::Forbidden(format!("Not a member of team {team_id}")));
        }
    }

    let outcome = state.dashboard.fetch_activities(&team_ids).await;

    let status = outcome_status(&outcome);
    let (items, failures) = outcome.degrade();

    Ok(Json(ActivityListResponse {
        status,
        items,
        failures,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<NewActivity>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let user = state.dashboard.load_user(auth.user_id).await?;
    let id = state.dashboard.create_team_activity(&user, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id.to_hex() })),
    ))
}

fn parse_team_ids(raw: &str) -> Result<Vec<ObjectId>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            ObjectId::parse_str(s)
                .map_err(|_| ApiError::BadRequest(format!("Invalid team id: {s}")))
        })
        .collect()
}
