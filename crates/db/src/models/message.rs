use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub team_id: ObjectId,
    pub sender_id: ObjectId,
    pub sender_name: Option<String>,
    pub content: String,
    #[serde(default)]
    pub read_by: Vec<ObjectId>,
    pub created_at: DateTime,
}

impl Message {
    pub const COLLECTION: &'static str = "messages";

    /// Unread for `user_id` unless they sent it or already read it.
    pub fn is_unread_for(&self, user_id: &ObjectId) -> bool {
        self.sender_id != *user_id && !self.read_by.contains(user_id)
    }
}
