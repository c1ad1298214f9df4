//! GMP Types - shared vocabulary of the workflow core
//!
//! Defines the closed data model every other crate speaks:
//! - The `Role` / `Department` enumerations and compact `RoleSet`s
//! - The authenticated `Actor` and its salted `CredentialHash`
//! - Per-record status machines (`DeviationStatus`, `PoStatus`, `CoaStatus`)
//! - The three workflow records and their append-only approval trail
//!
//! # Example
//!
//! ```rust
//! use gmp_types::{Role, RoleSet};
//!
//! let reviewers = RoleSet::of(&[Role::QaManager, Role::QcManager]);
//! assert!(reviewers.contains(Role::QaManager));
//! assert!(!reviewers.contains(Role::QaOperator));
//! ```

pub mod actor;
pub mod credential;
pub mod error;
pub mod ids;
pub mod record;
pub mod records;
pub mod role;
pub mod status;

pub use actor::Actor;
pub use credential::{Credential, CredentialHash};
pub use error::{FieldError, ParseError};
pub use ids::{ActorId, PlantId, RecordId};
pub use record::{
    ApprovalEntry, FieldValue, RecordField, TransitionStamp, WorkflowMeta, WorkflowRecord,
};
pub use records::{CertificateOfAnalysis, Deviation, PurchaseOrder, Severity, Unit};
pub use role::{Department, Role, RoleSet};
pub use status::{CoaStatus, DeviationStatus, PoStatus, RecordType, WorkflowState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
