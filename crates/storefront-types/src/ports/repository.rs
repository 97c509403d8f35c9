use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Id;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Id },
}

/// A record kept in one repository collection.
///
/// `Draft` is what callers hand to `create` (no id, no timestamps) and
/// `Patch` is merged over an existing record by `update`.
pub trait Record: Clone + Send + Sync + 'static {
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    /// Collection name used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> Id;

    fn from_draft(id: Id, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

/// CRUD surface over one collection of records.
///
/// Identifiers are assigned as `max(existing, 0) + 1`, so `get_all` order
/// (ascending id) is also insertion order. Every method returns owned
/// copies; callers never hold a reference into the store.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync + 'static {
    async fn get_all(&self) -> Result<Vec<T>, RepoError>;
    async fn get_by_id(&self, id: Id) -> Result<T, RepoError>;
    async fn create(&self, draft: T::Draft) -> Result<T, RepoError>;
    async fn update(&self, id: Id, patch: T::Patch) -> Result<T, RepoError>;
    async fn delete(&self, id: Id) -> Result<T, RepoError>;
}

/// Next identifier for a collection holding `ids`.
pub fn next_id(ids: impl IntoIterator<Item = Id>) -> Id {
    ids.into_iter().max().unwrap_or(0) + 1
}
