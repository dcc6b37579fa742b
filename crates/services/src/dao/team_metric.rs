use bson::doc;
use mongodb::Database;
use rosterline_db::models::TeamMetric;

use super::base::{BaseDao, DaoResult};

pub struct TeamMetricDao {
    pub base: BaseDao<TeamMetric>,
}

impl TeamMetricDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, TeamMetric::COLLECTION),
        }
    }

    pub async fn save(&self, metric: &TeamMetric) -> DaoResult<()> {
        self.base
            .upsert(doc! { "_id": metric.team_id }, metric)
            .await
    }
}
