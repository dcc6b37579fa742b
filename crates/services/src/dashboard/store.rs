use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime, Document};
use mongodb::Database;
use rosterline_db::models::{Activity, Event, Message, Team, TeamMetric, User};

use crate::dao::{
    activity::ActivityDao, award::AwardDao, base::DaoResult, event::EventDao,
    message::MessageDao, team::TeamDao, team_metric::TeamMetricDao, user::UserDao,
};

/// Every read and write the dashboard flow issues against the document store.
///
/// Batched methods take at most `dashboard.query_batch_size` team ids; the
/// callers chunk larger lists.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn find_user(&self, user_id: ObjectId) -> DaoResult<User>;

    /// Every team document, undecoded.
    async fn scan_teams(&self) -> DaoResult<Vec<Document>>;

    async fn find_team(&self, team_id: ObjectId) -> DaoResult<Team>;

    /// Events of `team_ids` starting in `[from, until)`.
    async fn find_events_starting_between(
        &self,
        team_ids: &[ObjectId],
        from: DateTime,
        until: DateTime,
    ) -> DaoResult<Vec<Event>>;

    /// The `limit` newest messages across `team_ids`.
    async fn find_recent_messages(
        &self,
        team_ids: &[ObjectId],
        limit: i64,
    ) -> DaoResult<Vec<Message>>;

    /// The `limit` newest activities across `team_ids`.
    async fn find_recent_activities(
        &self,
        team_ids: &[ObjectId],
        limit: i64,
    ) -> DaoResult<Vec<Activity>>;

    async fn insert_activity(&self, activity: &Activity) -> DaoResult<ObjectId>;

    async fn count_awards(&self, team_id: ObjectId) -> DaoResult<u64>;

    async fn save_team_metric(&self, metric: &TeamMetric) -> DaoResult<()>;
}

/// MongoDB-backed store, one DAO per collection.
pub struct MongoStore {
    pub users: UserDao,
    pub teams: TeamDao,
    pub events: EventDao,
    pub messages: MessageDao,
    pub activities: ActivityDao,
    pub awards: AwardDao,
    pub metrics: TeamMetricDao,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self {
            users: UserDao::new(db),
            teams: TeamDao::new(db),
            events: EventDao::new(db),
            messages: MessageDao::new(db),
            activities: ActivityDao::new(db),
            awards: AwardDao::new(db),
            metrics: TeamMetricDao::new(db),
        }
    }
}

#[async_trait]
impl DashboardStore for MongoStore {
    async fn find_user(&self, user_id: ObjectId) -> DaoResult<User> {
        self.users.find_by_id(user_id).await
    }

    async fn scan_teams(&self) -> DaoResult<Vec<Document>> {
        self.teams.scan_raw().await
    }

    async fn find_team(&self, team_id: ObjectId) -> DaoResult<Team> {
        self.teams.find_by_id(team_id).await
    }

    async fn find_events_starting_between(
        &self,
        team_ids: &[ObjectId],
        from: DateTime,
        until: DateTime,
    ) -> DaoResult<Vec<Event>> {
        self.events.find_starting_between(team_ids, from, until).await
    }

    async fn find_recent_messages(
        &self,
        team_ids: &[ObjectId],
        limit: i64,
    ) -> DaoResult<Vec<Message>> {
        self.messages.find_recent_for_teams(team_ids, limit).await
    }

    async fn find_recent_activities(
        &self,
        team_ids: &[ObjectId],
        limit: i64,
    ) -> DaoResult<Vec<Activity>> {
        self.activities.find_recent_for_teams(team_ids, limit).await
    }

    async fn insert_activity(&self, activity: &Activity) -> DaoResult<ObjectId> {
        self.activities.create(activity).await
    }

    async fn count_awards(&self, team_id: ObjectId) -> DaoResult<u64> {
        self.awards.count_for_team(team_id).await
    }

    async fn save_team_metric(&self, metric: &TeamMetric) -> DaoResult<()> {
        self.metrics.save(metric).await
    }
}
