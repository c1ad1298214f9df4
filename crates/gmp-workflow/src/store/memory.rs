use super::{check_version, not_found, ConcurrencyMode, RecordStore};
use crate::error::StoreError;
use async_trait::async_trait;
use gmp_types::{PlantId, RecordId, WorkflowRecord};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Process-local store, keyed by record id
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    records: RwLock<BTreeMap<RecordId, R>>,
    mode: ConcurrencyMode,
}

impl<R: WorkflowRecord> InMemoryRecordStore<R> {
    /// Empty store with optimistic versioning
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(ConcurrencyMode::Optimistic)
    }

    /// Empty store with an explicit concurrency mode
    #[must_use]
    pub fn with_mode(mode: ConcurrencyMode) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            mode,
        }
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<R: WorkflowRecord> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: WorkflowRecord> RecordStore<R> for InMemoryRecordStore<R> {
    async fn get(&self, id: &RecordId) -> Result<R, StoreError> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(R::record_type(), id))
    }

    async fn save(&self, mut record: R) -> Result<R, StoreError> {
        let mut guard = self.records.write();
        let id = record.id().clone();
        let stored = guard.get(&id).map(|r| r.meta().version);
        check_version(self.mode, R::record_type(), &id, record.meta().version, stored)?;

        record.meta_mut().version = stored.unwrap_or(0) + 1;
        debug!(
            record_type = %R::record_type(),
            record_id = %id,
            version = record.meta().version,
            "record saved"
        );
        guard.insert(id, record.clone());
        Ok(record)
    }

    async fn list_by_plant(&self, plant: &PlantId) -> Result<Vec<R>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| r.plant_id() == plant)
            .cloned()
            .collect())
    }
}
