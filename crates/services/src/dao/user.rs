use bson::oid::ObjectId;
use mongodb::Database;
use rosterline_db::models::User;

use super::base::{BaseDao, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn find_by_id(&self, user_id: ObjectId) -> DaoResult<User> {
        self.base.find_by_id(user_id).await
    }
}
