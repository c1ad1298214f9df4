//! The three workflow-governed record types

mod coa;
mod deviation;
mod purchase_order;

pub use coa::CertificateOfAnalysis;
pub use deviation::{Deviation, Severity};
pub use purchase_order::{PurchaseOrder, Unit};

use crate::ids::ActorId;
use crate::record::FieldValue;
use chrono::{DateTime, Utc};

fn text(value: Option<&String>) -> Option<FieldValue> {
    value.map(|v| FieldValue::Text(v.clone()))
}

fn actor(value: Option<&ActorId>) -> Option<FieldValue> {
    value.map(|v| FieldValue::Actor(v.clone()))
}

fn timestamp(value: Option<&DateTime<Utc>>) -> Option<FieldValue> {
    value.map(|v| FieldValue::Timestamp(*v))
}
