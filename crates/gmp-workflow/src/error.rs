//! Error types for the workflow core
//!
//! Failures are grouped by the component that raises them:
//! - `TransitionError` from the engine (authorization, e-sign, guards)
//! - `StoreError` from record stores (missing records, stale versions)
//! - `SessionError` from login and bearer validation
//! - `TransportError` from the external record transport, passed through unchanged
//!
//! `WorkflowError` wraps all of them and maps each onto the user-facing
//! `ErrorKind` taxonomy.

use gmp_esign::ESignError;
use gmp_types::{FieldError, RecordField, RecordId, RecordType};

/// Why the engine refused a transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// No rule for the edge, or the role may not fire it
    #[error("{role} may not move {record_type} {record_id} from {from} to {to}")]
    NotPermitted {
        /// Record type
        record_type: RecordType,
        /// Record id
        record_id: RecordId,
        /// Current status label
        from: String,
        /// Requested status label
        to: String,
        /// Acting role
        role: String,
    },

    /// Only the assignee may fire this edge
    #[error("only the assignee of {record_id} may perform this step")]
    NotAssignee {
        /// Record id
        record_id: RecordId,
    },

    /// The actor's plant does not own the record
    #[error("record {record_id} belongs to another plant")]
    OutOfScope {
        /// Record id
        record_id: RecordId,
    },

    /// A record handed to `create` already carries workflow history
    #[error("record {record_id} must be raised in its initial state with no history")]
    NotNew {
        /// Record id
        record_id: RecordId,
    },

    /// The rule needs an e-signature and no token was supplied
    #[error("electronic signature required")]
    SignatureRequired,

    /// A supplied token failed verification
    #[error("signature rejected: {0}")]
    Signature(#[from] ESignError),

    /// The caller edited a field the rule does not open
    #[error("field {0} is not writable in this step")]
    FieldNotWritable(RecordField),

    /// A required field is still blank
    #[error("field {0} must be filled in before this step")]
    MissingField(RecordField),

    /// Field access failed
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Record store failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record with that id
    #[error("{record_type} {record_id} not found")]
    NotFound {
        /// Record type
        record_type: RecordType,
        /// Record id
        record_id: RecordId,
    },

    /// The record changed since it was read
    #[error("{record_type} {record_id} changed concurrently (version {expected}, now {found})")]
    Conflict {
        /// Record type
        record_type: RecordType,
        /// Record id
        record_id: RecordId,
        /// Version the caller read
        expected: u64,
        /// Version currently stored
        found: u64,
    },

    /// The transport failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A payload could not be encoded or decoded
    #[error("record codec failed: {0}")]
    Codec(String),
}

/// Opaque failure of the external record transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    /// Collaborator-supplied description
    pub message: String,
}

impl TransportError {
    /// Wrap a collaborator message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login and bearer credential failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Unknown email or wrong secret; deliberately indistinguishable
    #[error("invalid credential")]
    InvalidCredential,

    /// No actor is logged in
    #[error("not authenticated")]
    Unauthenticated,

    /// The bearer token is malformed or its signature fails
    #[error("bearer token rejected")]
    InvalidToken,

    /// The bearer token is past its expiry
    #[error("bearer token expired")]
    Expired,

    /// The bearer token belongs to a session that has ended
    #[error("session revoked")]
    Revoked,
}

/// User-facing classification of any workflow failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Role lacks authority, or the record is outside the actor's scope
    NotPermitted,
    /// A signed step was attempted without a valid confirmation
    SignatureRequired,
    /// Secret mismatch at login or e-signature
    InvalidCredential,
    /// Record id unresolved
    NotFound,
    /// Collaborator I/O failure
    TransportError,
    /// Stale record version
    Conflict,
    /// The user abandoned a prompt
    Cancelled,
    /// No valid session
    Unauthenticated,
    /// Caller supplied unusable data
    InvalidInput,
}

/// Any failure surfaced by the workflow service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Engine refusal
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Session failure
    #[error(transparent)]
    Session(#[from] SessionError),

    /// E-signature failure at the prompt
    #[error(transparent)]
    ESign(#[from] ESignError),
}

impl From<TransportError> for WorkflowError {
    fn from(err: TransportError) -> Self {
        WorkflowError::Store(StoreError::Transport(err))
    }
}

impl WorkflowError {
    /// Taxonomy bucket for display
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Transition(err) => match err {
                TransitionError::NotPermitted { .. }
                | TransitionError::NotAssignee { .. }
                | TransitionError::OutOfScope { .. } => ErrorKind::NotPermitted,
                TransitionError::SignatureRequired => ErrorKind::SignatureRequired,
                TransitionError::Signature(e) => esign_kind(e),
                TransitionError::NotNew { .. }
                | TransitionError::FieldNotWritable(_)
                | TransitionError::MissingField(_)
                | TransitionError::Field(_) => ErrorKind::InvalidInput,
            },
            WorkflowError::Store(err) => match err {
                StoreError::NotFound { .. } => ErrorKind::NotFound,
                StoreError::Conflict { .. } => ErrorKind::Conflict,
                StoreError::Transport(_) | StoreError::Codec(_) => ErrorKind::TransportError,
            },
            WorkflowError::Session(err) => match err {
                SessionError::InvalidCredential => ErrorKind::InvalidCredential,
                SessionError::Unauthenticated
                | SessionError::InvalidToken
                | SessionError::Expired
                | SessionError::Revoked => ErrorKind::Unauthenticated,
            },
            WorkflowError::ESign(e) => esign_kind(e),
        }
    }

    /// True when the acting user has a direct way forward (re-enter a
    /// credential, reload, retry); `NotFound` is final for the operation
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::NotFound)
    }

    /// True when repeating the same call may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::TransportError | ErrorKind::Conflict)
    }
}

fn esign_kind(err: &ESignError) -> ErrorKind {
    match err {
        ESignError::InvalidCredential => ErrorKind::InvalidCredential,
        ESignError::Cancelled => ErrorKind::Cancelled,
        ESignError::ActorMismatch { .. }
        | ESignError::TokenIntegrityFailure
        | ESignError::TokenExpired
        | ESignError::TokenBindingFailure => ErrorKind::SignatureRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy() {
        let not_found: WorkflowError = StoreError::NotFound {
            record_type: RecordType::Deviation,
            record_id: "dev-9".into(),
        }
        .into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert!(!not_found.is_recoverable());
        assert!(!not_found.is_retryable());

        let transport: WorkflowError = TransportError::new("connection reset").into();
        assert_eq!(transport.kind(), ErrorKind::TransportError);
        assert!(transport.is_retryable());

        let unsigned: WorkflowError = TransitionError::SignatureRequired.into();
        assert_eq!(unsigned.kind(), ErrorKind::SignatureRequired);
        assert!(!unsigned.is_retryable());

        let bad_pw: WorkflowError = ESignError::InvalidCredential.into();
        assert_eq!(bad_pw.kind(), ErrorKind::InvalidCredential);
        assert!(bad_pw.is_recoverable());
    }

    #[test]
    fn transport_message_is_surfaced_unchanged() {
        let err: WorkflowError = TransportError::new("503 from upstream").into();
        assert_eq!(err.to_string(), "transport error: 503 from upstream");
    }
}
