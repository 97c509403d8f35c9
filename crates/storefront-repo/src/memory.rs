use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use storefront_types::domain::Id;
use storefront_types::ports::repository::{next_id, Record, RepoError, Repository};

use crate::latency::Latency;

/// One collection held in process memory.
///
/// The latency wait happens before the map is touched and nothing awaits
/// afterwards, so a call dropped mid-delay leaves the collection unchanged.
#[derive(Clone)]
pub struct InMemoryRepo<T: Record> {
    map: Arc<DashMap<Id, T>>,
    latency: Latency,
}

impl<T: Record> InMemoryRepo<T> {
    pub fn new() -> Self {
        Self::with_latency(Latency::none())
    }

    pub fn with_latency(latency: Latency) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            latency,
        }
    }

    /// Collection pre-filled with `records`, keyed by their own ids.
    pub fn seeded(records: impl IntoIterator<Item = T>, latency: Latency) -> Self {
        let repo = Self::with_latency(latency);
        for record in records {
            repo.map.insert(record.id(), record);
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn not_found(id: Id) -> RepoError {
        RepoError::NotFound { kind: T::KIND, id }
    }
}

impl<T: Record> Default for InMemoryRepo<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepo<T> {
    async fn get_all(&self) -> Result<Vec<T>, RepoError> {
        self.latency.wait().await;
        let mut all: Vec<T> = self.map.iter().map(|kv| kv.value().clone()).collect();
        all.sort_by_key(|r| r.id());
        Ok(all)
    }

    async fn get_by_id(&self, id: Id) -> Result<T, RepoError> {
        self.latency.wait().await;
        self.map
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, draft: T::Draft) -> Result<T, RepoError> {
        self.latency.wait().await;
        // A concurrent create may claim the same id between the scan and the
        // entry lock; the vacant check makes the loser rescan.
        loop {
            let id = next_id(self.map.iter().map(|kv| *kv.key()));
            if let Entry::Vacant(slot) = self.map.entry(id) {
                let record = T::from_draft(id, draft, Utc::now());
                slot.insert(record.clone());
                return Ok(record);
            }
        }
    }

    async fn update(&self, id: Id, patch: T::Patch) -> Result<T, RepoError> {
        self.latency.wait().await;
        match self.map.get_mut(&id) {
            Some(mut entry) => {
                entry.apply_patch(patch, Utc::now());
                Ok(entry.value().clone())
            }
            None => Err(Self::not_found(id)),
        }
    }

    async fn delete(&self, id: Id) -> Result<T, RepoError> {
        self.latency.wait().await;
        self.map
            .remove(&id)
            .map(|(_, record)| record)
            .ok_or_else(|| Self::not_found(id))
    }
}
