use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use rosterline_db::models::Event;

use super::base::{BaseDao, DaoResult};

pub struct EventDao {
    pub base: BaseDao<Event>,
}

impl EventDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Event::COLLECTION),
        }
    }

    /// Events of `team_ids` whose start falls in `[from, until)`, earliest first.
    pub async fn find_starting_between(
        &self,
        team_ids: &[ObjectId],
        from: DateTime,
        until: DateTime,
    ) -> DaoResult<Vec<Event>> {
        self.base
            .find_many(
                doc! {
                    "team_id": { "$in": team_ids.to_vec() },
                    "start_time": { "$gte": from, "$lt": until },
                },
                Some(doc! { "start_time": 1 }),
            )
            .await
    }
}
