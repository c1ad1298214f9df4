//! Error types for the shared data model

use crate::record::RecordField;
use crate::status::RecordType;

/// Failure to parse a display string into one of the closed enumerations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No role carries this display name
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// No department carries this display name
    #[error("unknown department: {0}")]
    UnknownDepartment(String),

    /// The status does not exist for this record type
    #[error("unknown {record_type} status: {value}")]
    UnknownStatus {
        /// Record type whose status set was searched
        record_type: RecordType,
        /// Rejected input
        value: String,
    },

    /// No record type carries this name
    #[error("unknown record type: {0}")]
    UnknownRecordType(String),
}

/// Failure to read or write a named record field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The record type has no such field
    #[error("{record_type} has no field {field}")]
    UnsupportedField {
        /// Requested field
        field: RecordField,
        /// Record type that was addressed
        record_type: RecordType,
    },

    /// The value variant does not fit the field
    #[error("field {field} expects a value of kind {expected}")]
    TypeMismatch {
        /// Field being written
        field: RecordField,
        /// Expected value kind
        expected: &'static str,
    },
}
