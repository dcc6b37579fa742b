use std::cmp::Reverse;

use async_trait::async_trait;
use bson::{oid::ObjectId, DateTime, Document};
use dashmap::DashMap;
use parking_lot::RwLock;
use rosterline_db::models::{Activity, Award, Event, Message, Team, TeamMetric, User};

use crate::dao::base::{DaoError, DaoResult};

use super::store::DashboardStore;

/// Values a hosted document store accepts in one membership filter.
pub const DEFAULT_IN_FILTER_LIMIT: usize = 10;

/// In-process store with the same query semantics as `MongoStore`.
///
/// Rejects membership filters longer than its limit, like the hosted store
/// it stands in for, and counts queries per collection.
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    teams: RwLock<Vec<Document>>,
    events: RwLock<Vec<Event>>,
    messages: RwLock<Vec<Message>>,
    activities: RwLock<Vec<Activity>>,
    awards: RwLock<Vec<Award>>,
    metrics: DashMap<ObjectId, TeamMetric>,
    queries: DashMap<&'static str, usize>,
    in_filter_limit: Option<usize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            teams: RwLock::new(Vec::new()),
            events: RwLock::new(Vec::new()),
            messages: RwLock::new(Vec::new()),
            activities: RwLock::new(Vec::new()),
            awards: RwLock::new(Vec::new()),
            metrics: DashMap::new(),
            queries: DashMap::new(),
            in_filter_limit: Some(DEFAULT_IN_FILTER_LIMIT),
        }
    }

    pub fn with_in_filter_limit(mut self, limit: Option<usize>) -> Self {
        self.in_filter_limit = limit;
        self
    }

    pub fn insert_user(&self, mut user: User) -> ObjectId {
        let id = *user.id.get_or_insert_with(ObjectId::new);
        self.users.write().push(user);
        id
    }

    pub fn insert_team(&self, team: &Team) -> DaoResult<ObjectId> {
        let mut document = bson::to_document(team)?;
        let id = team.id.unwrap_or_else(ObjectId::new);
        document.insert("_id", id);
        self.teams.write().push(document);
        Ok(id)
    }

    /// Stores a team document as-is, without checking its shape.
    pub fn insert_raw_team(&self, document: Document) {
        self.teams.write().push(document);
    }

    pub fn insert_event(&self, mut event: Event) -> ObjectId {
        let id = *event.id.get_or_insert_with(ObjectId::new);
        self.events.write().push(event);
        id
    }

    pub fn insert_message(&self, mut message: Message) -> ObjectId {
        let id = *message.id.get_or_insert_with(ObjectId::new);
        self.messages.write().push(message);
        id
    }

    pub fn insert_award(&self, mut award: Award) -> ObjectId {
        let id = *award.id.get_or_insert_with(ObjectId::new);
        self.awards.write().push(award);
        id
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.activities.read().clone()
    }

    pub fn team_metric(&self, team_id: &ObjectId) -> Option<TeamMetric> {
        self.metrics.get(team_id).map(|m| m.clone())
    }

    /// Reads and writes issued so far against `collection`.
    pub fn query_count(&self, collection: &str) -> usize {
        self.queries.get(collection).map(|c| *c).unwrap_or(0)
    }

    fn record_query(&self, collection: &'static str) {
        *self.queries.entry(collection).or_insert(0) += 1;
    }

    fn check_in_filter(&self, team_ids: &[ObjectId]) -> DaoResult<()> {
        match self.in_filter_limit {
            Some(limit) if team_ids.len() > limit => Err(DaoError::Validation(format!(
                "'in' filters support up to {limit} values, got {}",
                team_ids.len()
            ))),
            _ => Ok(()),
        }
    }
}

fn newest_first<T: Clone>(
    rows: &[T],
    keep: impl Fn(&T) -> bool,
    created_at: impl Fn(&T) -> DateTime,
    limit: i64,
) -> Vec<T> {
    let mut matched: Vec<T> = rows.iter().filter(|r| keep(r)).cloned().collect();
    matched.sort_by_key(|r| Reverse(created_at(r)));
    matched.truncate(usize::try_from(limit).unwrap_or(0));
    matched
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn find_user(&self, user_id: ObjectId) -> DaoResult<User> {
        self.record_query(User::COLLECTION);
        self.users
            .read()
            .iter()
            .find(|u| u.id == Some(user_id))
            .cloned()
            .ok_or(DaoError::NotFound)
    }

    async fn scan_teams(&self) -> DaoResult<Vec<Document>> {
        self.record_query(Team::COLLECTION);
        Ok(self.teams.read().clone())
    }

    async fn find_team(&self, team_id: ObjectId) -> DaoResult<Team> {
        self.record_query(Team::COLLECTION);
        let document = self
            .teams
            .read()
            .iter()
            .find(|d| d.get_object_id("_id").ok() == Some(team_id))
            .cloned()
            .ok_or(DaoError::NotFound)?;
        Ok(bson::from_document(document)?)
    }

    async fn find_events_starting_between(
        &self,
        team_ids: &[ObjectId],
        from: DateTime,
        until: DateTime,
    ) -> DaoResult<Vec<Event>> {
        self.record_query(Event::COLLECTION);
        self.check_in_filter(team_ids)?;
        let mut events: Vec<Event> = self
            .events
            .read()
            .iter()
            .filter(|e| team_ids.contains(&e.team_id))
            .filter(|e| e.start_time >= from && e.start_time < until)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }

    async fn find_recent_messages(
        &self,
        team_ids: &[ObjectId],
        limit: i64,
    ) -> DaoResult<Vec<Message>> {
        self.record_query(Message::COLLECTION);
        self.check_in_filter(team_ids)?;
        Ok(newest_first(
            &self.messages.read(),
            |m| team_ids.contains(&m.team_id),
            |m| m.created_at,
            limit,
        ))
    }

    async fn find_recent_activities(
        &self,
        team_ids: &[ObjectId],
        limit: i64,
    ) -> DaoResult<Vec<Activity>> {
        self.record_query(Activity::COLLECTION);
        self.check_in_filter(team_ids)?;
        Ok(newest_first(
            &self.activities.read(),
            |a| team_ids.contains(&a.team_id),
            |a| a.created_at,
            limit,
        ))
    }

    async fn insert_activity(&self, activity: &Activity) -> DaoResult<ObjectId> {
        self.record_query(Activity::COLLECTION);
        let mut stored = activity.clone();
        let id = *stored.id.get_or_insert_with(ObjectId::new);
        self.activities.write().push(stored);
        Ok(id)
    }

    async fn count_awards(&self, team_id: ObjectId) -> DaoResult<u64> {
        self.record_query(Award::COLLECTION);
        Ok(self
            .awards
            .read()
            .iter()
            .filter(|a| a.team_id == team_id)
            .count() as u64)
    }

    async fn save_team_metric(&self, metric: &TeamMetric) -> DaoResult<()> {
        self.record_query(TeamMetric::COLLECTION);
        self.metrics.insert(metric.team_id, metric.clone());
        Ok(())
    }
}
