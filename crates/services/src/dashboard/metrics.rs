use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use rosterline_db::models::{Event, Team, TeamMetric};
use serde::Serialize;

use super::clock::TimeWindow;

const ATTENDANCE_WEIGHT: f64 = 0.5;
const AWARDS_WEIGHT: f64 = 0.3;
const ROSTER_WEIGHT: f64 = 0.2;
/// Score points per award per athlete, before capping.
const AWARDS_PER_ATHLETE_SCALE: f64 = 20.0;
/// Score points per rostered athlete, before capping.
const ROSTER_SCALE: f64 = 5.0;
const TERM_CAP: f64 = 100.0;

/// Average of going ÷ roster size × 100 over the practices and games in
/// `events` that start inside `window`.
///
/// Not capped: coaches and parents may RSVP too, so a single event can go
/// past 100. Zero when the roster is empty or no event qualifies.
pub fn attendance_rate(events: &[Event], active_athletes: u32, window: &TimeWindow) -> f64 {
    if active_athletes == 0 {
        return 0.0;
    }

    let rates: Vec<f64> = events
        .iter()
        .filter(|e| e.counts_for_attendance())
        .filter(|e| window.contains(e.start_time.to_chrono()))
        .map(|e| e.going_count() as f64 / active_athletes as f64 * 100.0)
        .collect();

    if rates.is_empty() {
        return 0.0;
    }
    rates.iter().sum::<f64>() / rates.len() as f64
}

/// Weighted blend of attendance, awards per athlete and roster size, each
/// term capped at 100 before weighting. Always in `0..=100`.
pub fn performance_score(attendance_rate: f64, awards_given: u64, active_athletes: u32) -> u32 {
    let attendance_term = attendance_rate.clamp(0.0, TERM_CAP);
    let awards_term = if active_athletes == 0 {
        0.0
    } else {
        (awards_given as f64 / active_athletes as f64 * AWARDS_PER_ATHLETE_SCALE).min(TERM_CAP)
    };
    let roster_term = (active_athletes as f64 * ROSTER_SCALE).min(TERM_CAP);

    let score = ATTENDANCE_WEIGHT * attendance_term
        + AWARDS_WEIGHT * awards_term
        + ROSTER_WEIGHT * roster_term;
    score.round().clamp(0.0, TERM_CAP) as u32
}

/// Builds the snapshot for one team from its raw records.
pub fn compute_team_metric(
    team_id: ObjectId,
    team: &Team,
    recent_events: &[Event],
    awards_given: u64,
    window: &TimeWindow,
    computed_at: DateTime<Utc>,
) -> TeamMetric {
    let active_athletes = u32::try_from(team.players.len()).unwrap_or(u32::MAX);
    let attendance_rate = attendance_rate(recent_events, active_athletes, window);

    TeamMetric {
        team_id,
        team_name: team.name.clone(),
        active_athletes,
        attendance_rate,
        awards_given,
        performance_score: performance_score(attendance_rate, awards_given, active_athletes),
        computed_at: bson::DateTime::from_chrono(computed_at),
    }
}

/// Totals and per-team averages across a set of team snapshots.
///
/// Averages weight every team equally, regardless of roster size, and are
/// rounded to one decimal for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsOverview {
    pub team_count: usize,
    pub total_athletes: u64,
    pub total_awards: u64,
    pub average_attendance_rate: f64,
    pub average_performance_score: f64,
}

impl MetricsOverview {
    pub fn from_metrics(metrics: &[TeamMetric]) -> Self {
        if metrics.is_empty() {
            return Self::default();
        }
        let count = metrics.len() as f64;
        let attendance: f64 = metrics.iter().map(|m| m.attendance_rate).sum();
        let score: f64 = metrics.iter().map(|m| m.performance_score as f64).sum();

        Self {
            team_count: metrics.len(),
            total_athletes: metrics.iter().map(|m| m.active_athletes as u64).sum(),
            total_awards: metrics.iter().map(|m| m.awards_given).sum(),
            average_attendance_rate: (attendance / count * 10.0).round() / 10.0,
            average_performance_score: (score / count * 10.0).round() / 10.0,
        }
    }
}
