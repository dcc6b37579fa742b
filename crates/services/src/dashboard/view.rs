use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use rosterline_db::models::{Activity, Event, EventType, Message, RsvpStatus, Team};
use serde::{Deserialize, Serialize};

/// Everything the dashboard widgets render, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub sessions: Vec<DashboardSession>,
    pub messages: Vec<DashboardMessage>,
    pub activities: Vec<DashboardActivity>,
    pub teams: Vec<DashboardTeam>,
    pub pending_requests: Vec<PendingRequest>,
}

impl DashboardData {
    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| m.unread).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSession {
    pub id: String,
    pub team_id: String,
    pub title: String,
    pub event_type: EventType,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub going_count: usize,
    pub my_rsvp: Option<RsvpStatus>,
}

impl DashboardSession {
    pub fn from_event(event: Event, viewer: &ObjectId) -> Self {
        Self {
            id: hex_or_empty(event.id),
            team_id: event.team_id.to_hex(),
            going_count: event.going_count(),
            my_rsvp: event.rsvp_of(viewer),
            title: event.title,
            event_type: event.event_type,
            location: event.location,
            start_time: event.start_time.to_chrono(),
            end_time: event.end_time.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMessage {
    pub id: String,
    pub team_id: String,
    pub sender_id: String,
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub unread: bool,
}

impl DashboardMessage {
    pub fn from_message(message: Message, viewer: &ObjectId) -> Self {
        Self {
            unread: message.is_unread_for(viewer),
            id: hex_or_empty(message.id),
            team_id: message.team_id.to_hex(),
            sender_id: message.sender_id.to_hex(),
            sender_name: message.sender_name,
            content: message.content,
            created_at: message.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub title: String,
    pub description: String,
    pub team_id: String,
    pub team_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Activity> for DashboardActivity {
    fn from(activity: Activity) -> Self {
        Self {
            id: hex_or_empty(activity.id),
            activity_type: activity.activity_type,
            title: activity.title,
            description: activity.description,
            team_id: activity.team_id.to_hex(),
            team_name: activity.team_name,
            created_at: activity.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardTeam {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub player_count: usize,
    pub coach_count: usize,
}

impl From<&Team> for DashboardTeam {
    fn from(team: &Team) -> Self {
        Self {
            id: hex_or_empty(team.id),
            name: team.name.clone(),
            location: team.location.clone(),
            player_count: team.players.len(),
            coach_count: team.coaches.len(),
        }
    }
}

/// A join request from the viewer still awaiting a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub team_id: String,
    pub team_name: String,
    pub requested_at: DateTime<Utc>,
}

fn hex_or_empty(id: Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}
