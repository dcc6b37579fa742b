use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Validation: {0}")]
    Validation(String),
}

pub type DaoResult<T> = Result<T, DaoError>;

/// Coarse classification of store failures, used when logging degraded
/// stages and when reporting them to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    PermissionDenied,
    NotFound,
    InvalidArgument,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::PermissionDenied => "permission_denied",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::InvalidArgument => "invalid_argument",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DaoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DaoError::NotFound => ErrorCategory::NotFound,
            DaoError::Forbidden(_) => ErrorCategory::PermissionDenied,
            DaoError::Validation(_) | DaoError::DuplicateKey(_) => ErrorCategory::InvalidArgument,
            DaoError::BsonSer(_) | DaoError::BsonDe(_) => ErrorCategory::InvalidArgument,
            DaoError::Mongo(e) => match server_code(e) {
                // Unauthorized, AuthenticationFailed
                Some(13) | Some(18) => ErrorCategory::PermissionDenied,
                // NamespaceNotFound
                Some(26) => ErrorCategory::NotFound,
                // BadValue, FailedToParse, DuplicateKey
                Some(2) | Some(9) | Some(11000) => ErrorCategory::InvalidArgument,
                _ => ErrorCategory::Unknown,
            },
        }
    }
}

fn server_code(error: &mongodb::error::Error) -> Option<i32> {
    match *error.kind {
        mongodb::error::ErrorKind::Command(ref command) => Some(command.code),
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
            ref write_error,
        )) => Some(write_error.code),
        _ => None,
    }
}

pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> DaoResult<Vec<T>> {
        self.find_limited(filter, sort, None).await
    }

    /// `find_many` with an optional server-side limit.
    pub async fn find_limited(
        &self,
        filter: Document,
        sort: Option<Document>,
        limit: Option<i64>,
    ) -> DaoResult<Vec<T>> {
        let mut action = self.collection.find(filter);
        if let Some(sort) = sort {
            action = action.sort(sort);
        }
        if let Some(limit) = limit {
            action = action.limit(limit);
        }

        let mut cursor = action.await?;
        let mut results = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            results.push(doc);
        }
        Ok(results)
    }

    pub async fn insert_one(&self, doc: &T) -> DaoResult<ObjectId> {
        let result = self.collection.insert_one(doc).await.map_err(|e| {
            if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
                ref write_error,
            )) = *e.kind
            {
                if write_error.code == 11000 {
                    return DaoError::DuplicateKey(write_error.message.clone());
                }
            }
            DaoError::Mongo(e)
        })?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DaoError::Validation("inserted_id is not an ObjectId".to_string()))?;
        debug!(?id, "Inserted document");
        Ok(id)
    }

    /// Replaces the document matching `filter`, inserting it when absent.
    pub async fn upsert(&self, filter: Document, replacement: &T) -> DaoResult<()> {
        let result = self
            .collection
            .replace_one(filter, replacement)
            .upsert(true)
            .await?;
        debug!(
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "Upserted document"
        );
        Ok(())
    }

    pub async fn count(&self, filter: Document) -> DaoResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }
}
