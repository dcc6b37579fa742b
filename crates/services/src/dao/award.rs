use bson::{doc, oid::ObjectId};
use mongodb::Database;
use rosterline_db::models::Award;

use super::base::{BaseDao, DaoResult};

pub struct AwardDao {
    pub base: BaseDao<Award>,
}

impl AwardDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Award::COLLECTION),
        }
    }

    pub async fn count_for_team(&self, team_id: ObjectId) -> DaoResult<u64> {
        self.base.count(doc! { "team_id": team_id }).await
    }
}
