use bson::{doc, oid::ObjectId};
use mongodb::Database;
use rosterline_db::models::Activity;

use super::base::{BaseDao, DaoResult};

pub struct ActivityDao {
    pub base: BaseDao<Activity>,
}

impl ActivityDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Activity::COLLECTION),
        }
    }

    pub async fn find_recent_for_teams(
        &self,
        team_ids: &[ObjectId],
        limit: i64,
    ) -> DaoResult<Vec<Activity>> {
        self.base
            .find_limited(
                doc! { "team_id": { "$in": team_ids.to_vec() } },
                Some(doc! { "created_at": -1 }),
                Some(limit),
            )
            .await
    }

    pub async fn create(&self, activity: &Activity) -> DaoResult<ObjectId> {
        self.base.insert_one(activity).await
    }
}
