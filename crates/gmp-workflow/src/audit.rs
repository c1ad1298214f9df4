//! Hash-chained audit log
//!
//! Every applied or refused transition is appended here. Each event carries
//! the SHA-256 of its predecessor, so editing or dropping an entry breaks
//! `verify_integrity`.

use chrono::{DateTime, Utc};
use gmp_types::{ActorId, RecordId, RecordType, Role};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Chain integrity failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("audit chain broken at event {index}")]
pub struct IntegrityViolation {
    /// Position of the first bad event
    pub index: usize,
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Transition committed
    Applied,
    /// Transition refused
    Denied,
}

/// One audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event id
    pub event_id: Uuid,
    /// Time of the attempt
    pub timestamp: DateTime<Utc>,
    /// Record type
    pub record_type: RecordType,
    /// Record id
    pub record_id: RecordId,
    /// Acting account
    pub actor_id: ActorId,
    /// Acting role
    pub role: Role,
    /// Source status label
    pub from: String,
    /// Requested status label
    pub to: String,
    /// Applied or denied
    pub outcome: AuditOutcome,
    /// Refusal reason, or the signed flag for applied steps
    pub detail: String,
    /// Hash of the previous event; zero for the first
    #[serde(with = "hex_bytes")]
    pub prev_hash: [u8; 32],
    /// Hash of this event
    #[serde(with = "hex_bytes")]
    pub hash: [u8; 32],
}

/// Fields a caller supplies; the log fills in id and chain hashes
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Time of the attempt
    pub timestamp: DateTime<Utc>,
    /// Record type
    pub record_type: RecordType,
    /// Record id
    pub record_id: RecordId,
    /// Acting account
    pub actor_id: ActorId,
    /// Acting role
    pub role: Role,
    /// Source status label
    pub from: String,
    /// Requested status label
    pub to: String,
    /// Applied or denied
    pub outcome: AuditOutcome,
    /// Free-text detail
    pub detail: String,
}

/// Append-only, in-process audit chain
#[derive(Debug, Default)]
pub struct AuditLog {
    inner: Mutex<Vec<AuditEvent>>,
}

impl AuditLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, chaining it to the last event
    pub fn append(&self, entry: AuditEntry) -> Uuid {
        let mut guard = self.inner.lock();
        let prev_hash = guard.last().map_or([0u8; 32], |e| e.hash);
        let mut event = AuditEvent {
            event_id: Uuid::new_v4(),
            timestamp: entry.timestamp,
            record_type: entry.record_type,
            record_id: entry.record_id,
            actor_id: entry.actor_id,
            role: entry.role,
            from: entry.from,
            to: entry.to,
            outcome: entry.outcome,
            detail: entry.detail,
            prev_hash,
            hash: [0u8; 32],
        };
        event.hash = compute_hash(&event);
        let id = event.event_id;
        guard.push(event);
        id
    }

    /// Snapshot of every event, oldest first
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.inner.lock().clone()
    }

    /// Events concerning one record
    #[must_use]
    pub fn events_for(&self, record_id: &RecordId) -> Vec<AuditEvent> {
        self.inner
            .lock()
            .iter()
            .filter(|e| &e.record_id == record_id)
            .cloned()
            .collect()
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when nothing was logged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Recompute the chain and report the first broken link
    pub fn verify_integrity(&self) -> Result<(), IntegrityViolation> {
        verify_chain(&self.inner.lock())
    }
}

/// Check a chain loaded from elsewhere
pub fn verify_chain(events: &[AuditEvent]) -> Result<(), IntegrityViolation> {
    let mut prev = [0u8; 32];
    for (index, event) in events.iter().enumerate() {
        if event.prev_hash != prev || event.hash != compute_hash(event) {
            return Err(IntegrityViolation { index });
        }
        prev = event.hash;
    }
    Ok(())
}

fn compute_hash(event: &AuditEvent) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(event.event_id.as_bytes());
    hasher.update(event.timestamp.timestamp_micros().to_le_bytes());
    for part in [
        event.record_type.as_str(),
        event.record_id.as_str(),
        event.actor_id.as_str(),
        event.role.display_name(),
        event.from.as_str(),
        event.to.as_str(),
        match event.outcome {
            AuditOutcome::Applied => "applied",
            AuditOutcome::Denied => "denied",
        },
        event.detail.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0]);
    }
    hasher.update(event.prev_hash);
    hasher.finalize().into()
}

mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(d)?;
        let raw = hex::decode(&text).map_err(D::Error::custom)?;
        raw.try_into()
            .map_err(|_| D::Error::custom("expected 32 bytes"))
    }
}
