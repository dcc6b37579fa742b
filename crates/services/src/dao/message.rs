use bson::{doc, oid::ObjectId};
use mongodb::Database;
use rosterline_db::models::Message;

use super::base::{BaseDao, DaoResult};

pub struct MessageDao {
    pub base: BaseDao<Message>,
}

impl MessageDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Message::COLLECTION),
        }
    }

    pub async fn find_recent_for_teams(
        &self,
        team_ids: &[ObjectId],
        limit: i64,
    ) -> DaoResult<Vec<Message>> {
        self.base
            .find_limited(
                doc! { "team_id": { "$in": team_ids.to_vec() } },
                Some(doc! { "created_at": -1 }),
                Some(limit),
            )
            .await
    }
}
