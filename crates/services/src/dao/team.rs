use bson::{oid::ObjectId, Document};
use mongodb::Database;
use rosterline_db::models::Team;

use super::base::{BaseDao, DaoResult};

pub struct TeamDao {
    pub base: BaseDao<Team>,
    /// Untyped view of the same collection, so one malformed team does not
    /// fail a whole scan.
    pub raw: BaseDao<Document>,
}

impl TeamDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Team::COLLECTION),
            raw: BaseDao::new(db, Team::COLLECTION),
        }
    }

    pub async fn scan_raw(&self) -> DaoResult<Vec<Document>> {
        self.raw.find_many(Document::new(), None).await
    }

    pub async fn find_by_id(&self, team_id: ObjectId) -> DaoResult<Team> {
        self.base.find_by_id(team_id).await
    }
}
