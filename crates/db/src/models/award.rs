use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Award {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub team_id: ObjectId,
    pub recipient_id: ObjectId,
    pub title: String,
    pub awarded_at: DateTime,
}

impl Award {
    pub const COLLECTION: &'static str = "awards";
}
