use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub location: Option<String>,
    pub league_id: Option<ObjectId>,
    #[serde(default)]
    pub players: Vec<ObjectId>,
    #[serde(default)]
    pub coaches: Vec<ObjectId>,
    #[serde(default)]
    pub parents: Vec<ObjectId>,
    #[serde(default)]
    pub join_requests: Vec<JoinRequest>,
    pub created_at: Option<DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub user_id: ObjectId,
    #[serde(default)]
    pub status: JoinRequestStatus,
    pub requested_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestStatus {
    #[default]
    Pending,
    Approved,
    Declined,
}

impl Team {
    pub const COLLECTION: &'static str = "teams";

    /// Roster containment across players, coaches and parents.
    pub fn has_member(&self, user_id: &ObjectId) -> bool {
        self.players.contains(user_id)
            || self.coaches.contains(user_id)
            || self.parents.contains(user_id)
    }

    pub fn pending_request_for(&self, user_id: &ObjectId) -> Option<&JoinRequest> {
        self.join_requests
            .iter()
            .find(|r| r.user_id == *user_id && r.status == JoinRequestStatus::Pending)
    }
}
