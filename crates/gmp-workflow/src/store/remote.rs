use super::{not_found, ConcurrencyMode, RecordStore};
use crate::error::{StoreError, TransportError};
use async_trait::async_trait;
use gmp_types::{PlantId, RecordId, RecordType, WorkflowRecord};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::debug;

/// Result of a `persist_record` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The payload is now the stored record
    Written,
    /// A conditional write found another version; nothing was written
    Stale {
        /// Version currently stored
        found: u64,
    },
}

/// External API boundary for record persistence
///
/// Payloads are JSON documents; network and storage details stay on the
/// other side. Failures come back as an opaque `TransportError`.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    /// Fetch one record; `Ok(None)` when the id is unknown
    async fn fetch_record(
        &self,
        record_type: RecordType,
        id: &RecordId,
    ) -> Result<Option<Value>, TransportError>;

    /// Store one record, replacing any previous payload
    ///
    /// With `expected_version` set the write is conditional: the transport
    /// must compare it with the stored version (0 when absent) in the same
    /// operation as the write and answer `Stale` instead of writing on a
    /// mismatch. `None` overwrites unconditionally.
    async fn persist_record(
        &self,
        record_type: RecordType,
        id: &RecordId,
        payload: Value,
        expected_version: Option<u64>,
    ) -> Result<PersistOutcome, TransportError>;

    /// Every record of a type owned by `plant`
    async fn list_records(
        &self,
        record_type: RecordType,
        plant: &PlantId,
    ) -> Result<Vec<Value>, TransportError>;
}

/// Record store over a `RecordTransport`
///
/// In `Optimistic` mode the version check travels with the write as
/// `expected_version`, so two writers racing on the same record cannot both
/// succeed. `LastWriterWins` reads the stored version first only to bump it.
#[derive(Debug)]
pub struct RemoteRecordStore<T, R> {
    transport: T,
    mode: ConcurrencyMode,
    _record: PhantomData<fn() -> R>,
}

impl<T: RecordTransport, R: WorkflowRecord> RemoteRecordStore<T, R> {
    /// Store over `transport` with optimistic versioning
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            mode: ConcurrencyMode::Optimistic,
            _record: PhantomData,
        }
    }

    /// Override the concurrency mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: ConcurrencyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Underlying transport
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn decode(value: Value) -> Result<R, StoreError> {
        serde_json::from_value(value).map_err(|e| StoreError::Codec(e.to_string()))
    }
}

#[async_trait]
impl<T: RecordTransport, R: WorkflowRecord> RecordStore<R> for RemoteRecordStore<T, R> {
    async fn get(&self, id: &RecordId) -> Result<R, StoreError> {
        let payload = self
            .transport
            .fetch_record(R::record_type(), id)
            .await?
            .ok_or_else(|| not_found(R::record_type(), id))?;
        Self::decode(payload)
    }

    async fn save(&self, mut record: R) -> Result<R, StoreError> {
        let id = record.id().clone();
        let expected = record.meta().version;
        let (base, condition) = match self.mode {
            ConcurrencyMode::Optimistic => (expected, Some(expected)),
            ConcurrencyMode::LastWriterWins => {
                let stored = match self.transport.fetch_record(R::record_type(), &id).await? {
                    Some(payload) => Self::decode(payload)?.meta().version,
                    None => 0,
                };
                (stored, None)
            }
        };

        record.meta_mut().version = base + 1;
        let payload = serde_json::to_value(&record).map_err(|e| StoreError::Codec(e.to_string()))?;
        let outcome = self
            .transport
            .persist_record(R::record_type(), &id, payload, condition)
            .await?;
        if let PersistOutcome::Stale { found } = outcome {
            return Err(StoreError::Conflict {
                record_type: R::record_type(),
                record_id: id,
                expected,
                found,
            });
        }
        debug!(
            record_type = %R::record_type(),
            record_id = %id,
            version = record.meta().version,
            "record persisted"
        );
        Ok(record)
    }

    async fn list_by_plant(&self, plant: &PlantId) -> Result<Vec<R>, StoreError> {
        let mut records = self
            .transport
            .list_records(R::record_type(), plant)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect::<Result<Vec<R>, _>>()?;
        records.retain(|r| r.plant_id() == plant);
        records.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(records)
    }
}
