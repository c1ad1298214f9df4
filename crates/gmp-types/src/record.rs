//! Generic workflow record model
//!
//! Every governed record embeds a `WorkflowMeta`: its id, current status and
//! append-only approval trail. Status and trail are private and only move
//! together through [`WorkflowMeta::advance`].

use crate::error::FieldError;
use crate::ids::{ActorId, PlantId, RecordId};
use crate::role::Role;
use crate::status::{RecordType, WorkflowState};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// Named record fields that transitions may read, write or stamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    /// Deviation: investigator in charge
    AssignedTo,
    /// Deviation: investigation findings
    InvestigationSummary,
    /// Deviation: root cause statement
    RootCause,
    /// Deviation: corrective and preventive action
    Capa,
    /// Deviation: manager who reviewed the investigation
    ManagerReviewedBy,
    /// Deviation and CoA: final approver
    ApprovedBy,
    /// Purchase order: requester's justification
    JustificationNotes,
    /// Purchase order: finance approver
    FinanceApprovedBy,
    /// Purchase order: finance approval time
    FinanceApprovedOn,
    /// Purchase order: management approver
    ManagementApprovedBy,
    /// Purchase order: management approval time
    ManagementApprovedOn,
    /// Purchase order: warehouse receiver
    ReceivedBy,
    /// Purchase order: receipt time
    DateReceived,
    /// CoA: analyst who prepared the certificate
    PreparedBy,
    /// CoA: reviewing QC manager
    ReviewedBy,
    /// CoA: release time
    ReleaseDate,
}

impl RecordField {
    /// Snake-case field name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordField::AssignedTo => "assigned_to",
            RecordField::InvestigationSummary => "investigation_summary",
            RecordField::RootCause => "root_cause",
            RecordField::Capa => "capa",
            RecordField::ManagerReviewedBy => "manager_reviewed_by",
            RecordField::ApprovedBy => "approved_by",
            RecordField::JustificationNotes => "justification_notes",
            RecordField::FinanceApprovedBy => "finance_approved_by",
            RecordField::FinanceApprovedOn => "finance_approved_on",
            RecordField::ManagementApprovedBy => "management_approved_by",
            RecordField::ManagementApprovedOn => "management_approved_on",
            RecordField::ReceivedBy => "received_by",
            RecordField::DateReceived => "date_received",
            RecordField::PreparedBy => "prepared_by",
            RecordField::ReviewedBy => "reviewed_by",
            RecordField::ReleaseDate => "release_date",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value carried by a record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// Reference to an account
    Actor(ActorId),
    /// Point in time
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Short name of the variant
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Actor(_) => "actor",
            FieldValue::Timestamp(_) => "timestamp",
        }
    }

    /// True for empty or whitespace-only text
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Actor(id) => id.as_str().is_empty(),
            FieldValue::Timestamp(_) => false,
        }
    }

    /// Unwrap a text value destined for `field`
    pub fn into_text(self, field: RecordField) -> Result<String, FieldError> {
        match self {
            FieldValue::Text(text) => Ok(text),
            _ => Err(FieldError::TypeMismatch { field, expected: "text" }),
        }
    }

    /// Unwrap an actor reference destined for `field`
    pub fn into_actor(self, field: RecordField) -> Result<ActorId, FieldError> {
        match self {
            FieldValue::Actor(id) => Ok(id),
            _ => Err(FieldError::TypeMismatch { field, expected: "actor" }),
        }
    }

    /// Unwrap a timestamp destined for `field`
    pub fn into_timestamp(self, field: RecordField) -> Result<DateTime<Utc>, FieldError> {
        match self {
            FieldValue::Timestamp(at) => Ok(at),
            _ => Err(FieldError::TypeMismatch { field, expected: "timestamp" }),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<ActorId> for FieldValue {
    fn from(value: ActorId) -> Self {
        FieldValue::Actor(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// Who caused a transition, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionStamp {
    /// Label of the rule that fired
    pub step: String,
    /// Acting account
    pub actor_id: ActorId,
    /// Role the actor held at the time
    pub role: Role,
    /// Commit time
    pub at: DateTime<Utc>,
    /// Optional reason entered by the actor
    pub comment: Option<String>,
    /// Whether an e-signature confirmed the step
    pub signed: bool,
}

/// One entry of the approval trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "S: WorkflowState")]
pub struct ApprovalEntry<S> {
    /// Label of the rule that fired
    pub step: String,
    /// Status before the transition
    pub from: S,
    /// Status after the transition
    pub to: S,
    /// Acting account
    pub actor_id: ActorId,
    /// Role the actor held at the time
    pub role: Role,
    /// Commit time
    pub timestamp: DateTime<Utc>,
    /// Optional reason entered by the actor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether an e-signature confirmed the step
    pub signed: bool,
}

/// Workflow header shared by every governed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "S: WorkflowState")]
pub struct WorkflowMeta<S> {
    /// Record id
    pub id: RecordId,
    status: S,
    /// Owning plant
    pub plant_id: PlantId,
    /// Account that raised the record
    pub created_by: ActorId,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Optimistic concurrency version; bumped by the store on every save
    #[serde(default)]
    pub version: u64,
    #[serde(default = "Vec::new")]
    approval_trail: Vec<ApprovalEntry<S>>,
}

impl<S: WorkflowState> WorkflowMeta<S> {
    /// Header for a freshly raised record in the initial status
    #[must_use]
    pub fn new(
        id: impl Into<RecordId>,
        plant_id: impl Into<PlantId>,
        created_by: impl Into<ActorId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            status: S::INITIAL,
            plant_id: plant_id.into(),
            created_by: created_by.into(),
            created_at,
            version: 0,
            approval_trail: Vec::new(),
        }
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> S {
        self.status
    }

    /// Approval trail, oldest first
    #[inline]
    #[must_use]
    pub fn trail(&self) -> &[ApprovalEntry<S>] {
        &self.approval_trail
    }

    /// Most recent trail entry
    #[inline]
    #[must_use]
    pub fn last_entry(&self) -> Option<&ApprovalEntry<S>> {
        self.approval_trail.last()
    }

    /// Move to `to`, appending the matching trail entry in the same step
    pub fn advance(&mut self, to: S, stamp: TransitionStamp) -> &ApprovalEntry<S> {
        let from = self.status;
        self.status = to;
        self.approval_trail.push(ApprovalEntry {
            step: stamp.step,
            from,
            to,
            actor_id: stamp.actor_id,
            role: stamp.role,
            timestamp: stamp.at,
            comment: stamp.comment,
            signed: stamp.signed,
        });
        &self.approval_trail[self.approval_trail.len() - 1]
    }

    /// True when status and trail agree: the trail is a connected path from
    /// the initial status ending in the current one
    #[must_use]
    pub fn trail_is_consistent(&self) -> bool {
        let mut expected = S::INITIAL;
        for entry in &self.approval_trail {
            if entry.from != expected {
                return false;
            }
            expected = entry.to;
        }
        expected == self.status
    }
}

/// A record governed by a status machine
pub trait WorkflowRecord:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Status enumeration of this record type
    type Status: WorkflowState;

    /// Workflow header
    fn meta(&self) -> &WorkflowMeta<Self::Status>;

    /// Mutable workflow header
    fn meta_mut(&mut self) -> &mut WorkflowMeta<Self::Status>;

    /// Fields this record type exposes to transition rules
    fn fields() -> &'static [RecordField];

    /// Read a named field; `Ok(None)` for a supported field that is unset
    fn read_field(&self, field: RecordField) -> Result<Option<FieldValue>, FieldError>;

    /// Overwrite a named field
    fn write_field(&mut self, field: RecordField, value: FieldValue) -> Result<(), FieldError>;

    /// Record type tag
    #[inline]
    #[must_use]
    fn record_type() -> RecordType {
        <Self::Status as WorkflowState>::RECORD_TYPE
    }

    /// Record id
    #[inline]
    fn id(&self) -> &RecordId {
        &self.meta().id
    }

    /// Current status
    #[inline]
    fn status(&self) -> Self::Status {
        self.meta().status()
    }

    /// Owning plant
    #[inline]
    fn plant_id(&self) -> &PlantId {
        &self.meta().plant_id
    }

    /// Error for a field this record type does not carry
    #[must_use]
    fn unsupported(field: RecordField) -> FieldError {
        FieldError::UnsupportedField {
            field,
            record_type: Self::record_type(),
        }
    }
}
