//! Rule table defects

use gmp_types::{RecordField, RecordType};

/// A structural defect found by `TransitionTable::validate`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two rules share the same edge
    #[error("{record_type}: duplicate edge {from} -> {to}")]
    DuplicateEdge {
        /// Record type of the table
        record_type: RecordType,
        /// Source status
        from: &'static str,
        /// Target status
        to: &'static str,
    },

    /// A rule no role may fire
    #[error("{record_type}: edge {from} -> {to} allows no role")]
    NoRoles {
        /// Record type of the table
        record_type: RecordType,
        /// Source status
        from: &'static str,
        /// Target status
        to: &'static str,
    },

    /// A terminal state has an outbound edge
    #[error("{record_type}: terminal state {state} has an outbound edge")]
    TerminalHasExit {
        /// Record type of the table
        record_type: RecordType,
        /// Offending state
        state: &'static str,
    },

    /// A state cannot be reached from the initial one
    #[error("{record_type}: state {state} is unreachable")]
    Unreachable {
        /// Record type of the table
        record_type: RecordType,
        /// Offending state
        state: &'static str,
    },

    /// A rule touches a field the record type does not carry
    #[error("{record_type}: edge {from} -> {to} touches foreign field {field}")]
    ForeignField {
        /// Record type of the table
        record_type: RecordType,
        /// Source status
        from: &'static str,
        /// Target status
        to: &'static str,
        /// Offending field
        field: RecordField,
    },
}
