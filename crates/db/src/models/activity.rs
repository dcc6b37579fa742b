use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Denormalized feed entry shown on team dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub title: String,
    pub description: String,
    pub team_id: ObjectId,
    pub team_name: Option<String>,
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
}

impl Activity {
    pub const COLLECTION: &'static str = "activities";
}
