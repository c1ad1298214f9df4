use super::{actor, text, timestamp};
use crate::error::FieldError;
use crate::ids::{ActorId, PlantId, RecordId};
use crate::record::{FieldValue, RecordField, WorkflowMeta, WorkflowRecord};
use crate::status::PoStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit of measure on an order line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Unit {
    /// Kilograms
    #[serde(rename = "kg")]
    #[default]
    Kilogram,
    /// Litres
    #[serde(rename = "L")]
    Litre,
    /// Countable units
    #[serde(rename = "units")]
    Units,
}

/// Purchase order for a single material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Workflow header
    #[serde(flatten)]
    pub meta: WorkflowMeta<PoStatus>,
    /// Human-facing order number
    pub po_number: String,
    /// Ordered material
    pub material_name: String,
    /// Ordered quantity
    pub quantity: f64,
    /// Unit of `quantity`
    pub unit: Unit,
    /// Supplier
    pub vendor_id: String,
    /// Order value
    pub total_amount: f64,
    /// Requester's justification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification_notes: Option<String>,
    /// Finance approver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance_approved_by: Option<ActorId>,
    /// Finance decision time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance_approved_on: Option<DateTime<Utc>>,
    /// Management approver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_approved_by: Option<ActorId>,
    /// Management decision time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_approved_on: Option<DateTime<Utc>>,
    /// Warehouse receiver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_by: Option<ActorId>,
    /// Receipt time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_received: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    /// Start a new order in `Draft`
    #[must_use]
    pub fn draft(
        id: impl Into<RecordId>,
        plant_id: impl Into<PlantId>,
        created_by: impl Into<ActorId>,
        created_at: DateTime<Utc>,
        po_number: impl Into<String>,
    ) -> Self {
        Self {
            meta: WorkflowMeta::new(id, plant_id, created_by, created_at),
            po_number: po_number.into(),
            material_name: String::new(),
            quantity: 0.0,
            unit: Unit::default(),
            vendor_id: String::new(),
            total_amount: 0.0,
            justification_notes: None,
            finance_approved_by: None,
            finance_approved_on: None,
            management_approved_by: None,
            management_approved_on: None,
            received_by: None,
            date_received: None,
        }
    }

    /// Set the order line
    #[must_use]
    pub fn with_line(mut self, material: impl Into<String>, quantity: f64, unit: Unit) -> Self {
        self.material_name = material.into();
        self.quantity = quantity;
        self.unit = unit;
        self
    }

    /// Set supplier and value
    #[must_use]
    pub fn with_vendor(mut self, vendor_id: impl Into<String>, total_amount: f64) -> Self {
        self.vendor_id = vendor_id.into();
        self.total_amount = total_amount;
        self
    }
}

const FIELDS: &[RecordField] = &[
    RecordField::JustificationNotes,
    RecordField::FinanceApprovedBy,
    RecordField::FinanceApprovedOn,
    RecordField::ManagementApprovedBy,
    RecordField::ManagementApprovedOn,
    RecordField::ReceivedBy,
    RecordField::DateReceived,
];

impl WorkflowRecord for PurchaseOrder {
    type Status = PoStatus;

    fn meta(&self) -> &WorkflowMeta<PoStatus> {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut WorkflowMeta<PoStatus> {
        &mut self.meta
    }

    fn fields() -> &'static [RecordField] {
        FIELDS
    }

    fn read_field(&self, field: RecordField) -> Result<Option<FieldValue>, FieldError> {
        Ok(match field {
            RecordField::JustificationNotes => text(self.justification_notes.as_ref()),
            RecordField::FinanceApprovedBy => actor(self.finance_approved_by.as_ref()),
            RecordField::FinanceApprovedOn => timestamp(self.finance_approved_on.as_ref()),
            RecordField::ManagementApprovedBy => actor(self.management_approved_by.as_ref()),
            RecordField::ManagementApprovedOn => timestamp(self.management_approved_on.as_ref()),
            RecordField::ReceivedBy => actor(self.received_by.as_ref()),
            RecordField::DateReceived => timestamp(self.date_received.as_ref()),
            other => return Err(Self::unsupported(other)),
        })
    }

    fn write_field(&mut self, field: RecordField, value: FieldValue) -> Result<(), FieldError> {
        match field {
            RecordField::JustificationNotes => {
                self.justification_notes = Some(value.into_text(field)?);
            }
            RecordField::FinanceApprovedBy => {
                self.finance_approved_by = Some(value.into_actor(field)?);
            }
            RecordField::FinanceApprovedOn => {
                self.finance_approved_on = Some(value.into_timestamp(field)?);
            }
            RecordField::ManagementApprovedBy => {
                self.management_approved_by = Some(value.into_actor(field)?);
            }
            RecordField::ManagementApprovedOn => {
                self.management_approved_on = Some(value.into_timestamp(field)?);
            }
            RecordField::ReceivedBy => self.received_by = Some(value.into_actor(field)?),
            RecordField::DateReceived => self.date_received = Some(value.into_timestamp(field)?),
            other => return Err(Self::unsupported(other)),
        }
        Ok(())
    }
}
