//! Record stores
//!
//! One store per record type, behind `get`/`save`/`list_by_plant`. Saves are
//! replace-by-id. In `Optimistic` mode the caller's `version` must match the
//! stored one (0 for a record not yet stored); every accepted save bumps it.

mod memory;
mod remote;

pub use memory::InMemoryRecordStore;
pub use remote::{PersistOutcome, RecordTransport, RemoteRecordStore};

use crate::error::StoreError;
use async_trait::async_trait;
use gmp_types::{PlantId, RecordId, RecordType};
use serde::{Deserialize, Serialize};

/// How `save` treats a record that changed since it was read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Reject stale versions with `StoreError::Conflict`
    #[default]
    Optimistic,
    /// Overwrite unconditionally
    LastWriterWins,
}

/// Persistence for one record type
#[async_trait]
pub trait RecordStore<R>: Send + Sync {
    /// Fetch by id
    async fn get(&self, id: &RecordId) -> Result<R, StoreError>;

    /// Replace by id; returns the record as stored, with its new version
    async fn save(&self, record: R) -> Result<R, StoreError>;

    /// All records owned by `plant`, ordered by id
    async fn list_by_plant(&self, plant: &PlantId) -> Result<Vec<R>, StoreError>;
}

pub(crate) fn check_version(
    mode: ConcurrencyMode,
    record_type: RecordType,
    record_id: &RecordId,
    expected: u64,
    stored: Option<u64>,
) -> Result<(), StoreError> {
    if mode == ConcurrencyMode::LastWriterWins {
        return Ok(());
    }
    let found = stored.unwrap_or(0);
    if expected == found {
        Ok(())
    } else {
        Err(StoreError::Conflict {
            record_type,
            record_id: record_id.clone(),
            expected,
            found,
        })
    }
}

pub(crate) fn not_found(record_type: RecordType, record_id: &RecordId) -> StoreError {
    StoreError::NotFound {
        record_type,
        record_id: record_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_check() {
        let id = RecordId::new("dev-1");
        let t = RecordType::Deviation;
        assert!(check_version(ConcurrencyMode::Optimistic, t, &id, 0, None).is_ok());
        assert!(check_version(ConcurrencyMode::Optimistic, t, &id, 3, Some(3)).is_ok());
        assert_eq!(
            check_version(ConcurrencyMode::Optimistic, t, &id, 2, Some(3)),
            Err(StoreError::Conflict {
                record_type: t,
                record_id: id.clone(),
                expected: 2,
                found: 3,
            })
        );
        assert!(check_version(ConcurrencyMode::LastWriterWins, t, &id, 2, Some(3)).is_ok());
    }

    #[test]
    fn mode_names() {
        let mode: ConcurrencyMode = serde_json::from_str(r#""last_writer_wins""#).unwrap();
        assert_eq!(mode, ConcurrencyMode::LastWriterWins);
        assert_eq!(ConcurrencyMode::default(), ConcurrencyMode::Optimistic);
    }
}
