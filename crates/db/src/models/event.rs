use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub team_id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub event_type: EventType,
    pub location: Option<String>,
    pub start_time: DateTime,
    pub end_time: DateTime,
    #[serde(default)]
    pub rsvps: Vec<Rsvp>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Practice,
    Game,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rsvp {
    pub user_id: ObjectId,
    pub status: RsvpStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Going,
    Maybe,
    NotGoing,
}

impl Event {
    pub const COLLECTION: &'static str = "events";

    /// Practices and games count toward attendance; everything else does not.
    pub fn counts_for_attendance(&self) -> bool {
        matches!(self.event_type, EventType::Practice | EventType::Game)
    }

    pub fn going_count(&self) -> usize {
        self.rsvps
            .iter()
            .filter(|r| r.status == RsvpStatus::Going)
            .count()
    }

    pub fn rsvp_of(&self, user_id: &ObjectId) -> Option<RsvpStatus> {
        self.rsvps
            .iter()
            .find(|r| r.user_id == *user_id)
            .map(|r| r.status)
    }
}
