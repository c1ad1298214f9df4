//! GMP Access - permission resolver
//!
//! Answers the two authorization questions of the workflow core:
//! - which navigation entries a role may open (`visible_navigation`)
//! - which status transitions a role may fire (`can_transition`)
//!
//! Both are lookups over process-wide static tables. The transition tables
//! are the only source of legal edges; the engine consults nothing else.
//!
//! # Example
//!
//! ```rust
//! use gmp_access::PermissionResolver;
//! use gmp_types::{PoStatus, Role};
//!
//! let resolver = PermissionResolver::new();
//! let officer = Role::ProcurementOfficer;
//! assert!(resolver.can_transition(PoStatus::Draft, PoStatus::PendingFinanceApproval, officer));
//! assert!(!resolver.can_transition(PoStatus::Draft, PoStatus::Approved, officer));
//! ```

pub mod error;
pub mod navigation;
pub mod resolver;
pub mod rules;
pub mod tables;

pub use error::TableError;
pub use navigation::{NavSection, NavigationEntry, Icon, NAVIGATION};
pub use resolver::PermissionResolver;
pub use rules::{FieldMutation, Guard, TransitionRule, TransitionTable};
pub use tables::{HasRuleTable, COA_TABLE, DEVIATION_TABLE, PURCHASE_ORDER_TABLE};

/// Validate every built-in table against its record type
pub fn validate_all() -> Result<(), TableError> {
    use gmp_types::{CertificateOfAnalysis, Deviation, PurchaseOrder};

    DEVIATION_TABLE.validate_for::<Deviation>()?;
    PURCHASE_ORDER_TABLE.validate_for::<PurchaseOrder>()?;
    COA_TABLE.validate_for::<CertificateOfAnalysis>()?;
    Ok(())
}
