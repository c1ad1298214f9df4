use super::{actor, text};
use crate::error::FieldError;
use crate::ids::{ActorId, PlantId, RecordId};
use crate::record::{FieldValue, RecordField, WorkflowMeta, WorkflowRecord};
use crate::role::Department;
use crate::status::DeviationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Impact classification of a deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Severity {
    /// Cosmetic or documentation-only
    #[default]
    Low,
    /// Contained, no product impact expected
    Medium,
    /// Possible product impact
    High,
    /// Confirmed product or patient impact
    Critical,
}

/// Quality deviation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deviation {
    /// Workflow header
    #[serde(flatten)]
    pub meta: WorkflowMeta<DeviationStatus>,
    /// Short title
    pub title: String,
    /// Affected batch
    pub batch_number: String,
    /// What happened
    pub description: String,
    /// Impact classification
    pub severity: Severity,
    /// Department that raised the deviation
    pub source_dept: Department,
    /// Investigator in charge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<ActorId>,
    /// Investigation findings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investigation_summary: Option<String>,
    /// Root cause statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    /// Corrective and preventive action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capa: Option<String>,
    /// Manager who reviewed the investigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_reviewed_by: Option<ActorId>,
    /// Head who gave final approval or rejection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<ActorId>,
}

impl Deviation {
    /// Raise a new deviation in `Open`
    #[must_use]
    pub fn open(
        id: impl Into<RecordId>,
        plant_id: impl Into<PlantId>,
        opened_by: impl Into<ActorId>,
        opened_at: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            meta: WorkflowMeta::new(id, plant_id, opened_by, opened_at),
            title: title.into(),
            batch_number: String::new(),
            description: String::new(),
            severity: Severity::default(),
            source_dept: Department::QualityAssurance,
            assigned_to: None,
            investigation_summary: None,
            root_cause: None,
            capa: None,
            manager_reviewed_by: None,
            approved_by: None,
        }
    }

    /// Pre-assign an investigator
    #[inline]
    #[must_use]
    pub fn assigned_to(mut self, actor: impl Into<ActorId>) -> Self {
        self.assigned_to = Some(actor.into());
        self
    }

    /// Set the impact classification
    #[inline]
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the affected batch
    #[inline]
    #[must_use]
    pub fn with_batch(mut self, batch_number: impl Into<String>) -> Self {
        self.batch_number = batch_number.into();
        self
    }
}

const FIELDS: &[RecordField] = &[
    RecordField::AssignedTo,
    RecordField::InvestigationSummary,
    RecordField::RootCause,
    RecordField::Capa,
    RecordField::ManagerReviewedBy,
    RecordField::ApprovedBy,
];

impl WorkflowRecord for Deviation {
    type Status = DeviationStatus;

    fn meta(&self) -> &WorkflowMeta<DeviationStatus> {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut WorkflowMeta<DeviationStatus> {
        &mut self.meta
    }

    fn fields() -> &'static [RecordField] {
        FIELDS
    }

    fn read_field(&self, field: RecordField) -> Result<Option<FieldValue>, FieldError> {
        Ok(match field {
            RecordField::AssignedTo => actor(self.assigned_to.as_ref()),
            RecordField::InvestigationSummary => text(self.investigation_summary.as_ref()),
            RecordField::RootCause => text(self.root_cause.as_ref()),
            RecordField::Capa => text(self.capa.as_ref()),
            RecordField::ManagerReviewedBy => actor(self.manager_reviewed_by.as_ref()),
            RecordField::ApprovedBy => actor(self.approved_by.as_ref()),
            other => return Err(Self::unsupported(other)),
        })
    }

    fn write_field(&mut self, field: RecordField, value: FieldValue) -> Result<(), FieldError> {
        match field {
            RecordField::AssignedTo => self.assigned_to = Some(value.into_actor(field)?),
            RecordField::InvestigationSummary => {
                self.investigation_summary = Some(value.into_text(field)?);
            }
            RecordField::RootCause => self.root_cause = Some(value.into_text(field)?),
            RecordField::Capa => self.capa = Some(value.into_text(field)?),
            RecordField::ManagerReviewedBy => {
                self.manager_reviewed_by = Some(value.into_actor(field)?);
            }
            RecordField::ApprovedBy => self.approved_by = Some(value.into_actor(field)?),
            other => return Err(Self::unsupported(other)),
        }
        Ok(())
    }
}
