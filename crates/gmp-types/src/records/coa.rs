use super::{actor, timestamp};
use crate::error::FieldError;
use crate::ids::{ActorId, PlantId, RecordId};
use crate::record::{FieldValue, RecordField, WorkflowMeta, WorkflowRecord};
use crate::status::CoaStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Certificate of analysis for a finished batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateOfAnalysis {
    /// Workflow header
    #[serde(flatten)]
    pub meta: WorkflowMeta<CoaStatus>,
    /// Certified batch
    pub batch_number: String,
    /// Product name
    pub product_name: String,
    /// Analyst who prepared the certificate
    pub prepared_by: ActorId,
    /// Reviewing QC manager
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<ActorId>,
    /// Approving QC head
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<ActorId>,
    /// Release time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<Utc>>,
}

impl CertificateOfAnalysis {
    /// Start a certificate in `Draft`, prepared by its creator
    #[must_use]
    pub fn draft(
        id: impl Into<RecordId>,
        plant_id: impl Into<PlantId>,
        prepared_by: impl Into<ActorId>,
        created_at: DateTime<Utc>,
        batch_number: impl Into<String>,
        product_name: impl Into<String>,
    ) -> Self {
        let prepared_by = prepared_by.into();
        Self {
            meta: WorkflowMeta::new(id, plant_id, prepared_by.clone(), created_at),
            batch_number: batch_number.into(),
            product_name: product_name.into(),
            prepared_by,
            reviewed_by: None,
            approved_by: None,
            release_date: None,
        }
    }
}

const FIELDS: &[RecordField] = &[
    RecordField::PreparedBy,
    RecordField::ReviewedBy,
    RecordField::ApprovedBy,
    RecordField::ReleaseDate,
];

impl WorkflowRecord for CertificateOfAnalysis {
    type Status = CoaStatus;

    fn meta(&self) -> &WorkflowMeta<CoaStatus> {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut WorkflowMeta<CoaStatus> {
        &mut self.meta
    }

    fn fields() -> &'static [RecordField] {
        FIELDS
    }

    fn read_field(&self, field: RecordField) -> Result<Option<FieldValue>, FieldError> {
        Ok(match field {
            RecordField::PreparedBy => Some(FieldValue::Actor(self.prepared_by.clone())),
            RecordField::ReviewedBy => actor(self.reviewed_by.as_ref()),
            RecordField::ApprovedBy => actor(self.approved_by.as_ref()),
            RecordField::ReleaseDate => timestamp(self.release_date.as_ref()),
            other => return Err(Self::unsupported(other)),
        })
    }

    fn write_field(&mut self, field: RecordField, value: FieldValue) -> Result<(), FieldError> {
        match field {
            RecordField::PreparedBy => self.prepared_by = value.into_actor(field)?,
            RecordField::ReviewedBy => self.reviewed_by = Some(value.into_actor(field)?),
            RecordField::ApprovedBy => self.approved_by = Some(value.into_actor(field)?),
            RecordField::ReleaseDate => self.release_date = Some(value.into_timestamp(field)?),
            other => return Err(Self::unsupported(other)),
        }
        Ok(())
    }
}
