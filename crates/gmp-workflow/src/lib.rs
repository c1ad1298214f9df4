//! GMP Workflow - engine, stores and session for GMP approval workflows
//!
//! Ties the permission tables (`gmp-access`) and the e-signature gate
//! (`gmp-esign`) into a working core:
//!
//! - `WorkflowEngine` applies one table-checked transition to one record
//! - `RecordStore` persists records, in memory or over a `RecordTransport`
//! - `SessionManager` holds the logged-in actor and issues bearer tokens
//! - `AuditLog` chains every applied and refused transition
//! - `WorkflowService` is the façade views call
//!
//! # Example
//!
//! ```rust
//! use gmp_workflow::{RecordStores, TransitionRequest, WorkflowConfig, WorkflowService};
//! use gmp_types::{Actor, Credential, PoStatus, PurchaseOrder, Role};
//!
//! # tokio_test_block(async {
//! let config = WorkflowConfig::default();
//! let service = WorkflowService::new(config.clone(), RecordStores::in_memory(&config));
//! let officer = Actor::new("u7", "Meera", Role::ProcurementOfficer, &Credential::new("pw"));
//!
//! let po = PurchaseOrder::draft("po-1", "plant-1", "u7", chrono::Utc::now(), "PO-0001");
//! service.create(&officer, po).await.unwrap();
//!
//! let err = service
//!     .transition::<PurchaseOrder>(
//!         &officer,
//!         &"po-1".into(),
//!         PoStatus::Approved,
//!         TransitionRequest::new(),
//!     )
//!     .await
//!     .unwrap_err();
//! assert_eq!(err.kind(), gmp_workflow::ErrorKind::NotPermitted);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod service;
pub mod session;
pub mod store;
pub mod telemetry;

pub use audit::{AuditEntry, AuditEvent, AuditLog, AuditOutcome, IntegrityViolation};
pub use config::{ConfigError, LogConfig, WorkflowConfig, DEFAULT_SESSION_TTL_SECS};
pub use engine::{TransitionRequest, WorkflowEngine};
pub use error::{
    ErrorKind, SessionError, StoreError, TransitionError, TransportError, WorkflowError,
};
pub use service::{ManagedRecord, RecordStores, WorkflowService};
pub use session::{
    AccountDirectory, BearerClaims, BearerToken, InMemoryDirectory, ListenerId, SessionManager,
};
pub use store::{
    ConcurrencyMode, InMemoryRecordStore, PersistOutcome, RecordStore, RecordTransport,
    RemoteRecordStore,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
