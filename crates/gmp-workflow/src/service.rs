//! Workflow service
//!
//! The surface views call. It resolves records through the per-type stores,
//! enforces plant scope, runs the engine, persists the result and appends
//! every applied or refused transition to the audit log.

use crate::audit::{AuditEntry, AuditLog, AuditOutcome};
use crate::config::WorkflowConfig;
use crate::engine::{TransitionRequest, WorkflowEngine};
use crate::error::{TransitionError, WorkflowError};
use crate::store::{InMemoryRecordStore, RecordStore};
use chrono::Utc;
use gmp_access::{HasRuleTable, NavigationEntry, PermissionResolver, TransitionRule};
use gmp_esign::{ConfirmationToken, ESignatureGate, SignaturePad, SignatureRequest};
use gmp_types::{
    Actor, CertificateOfAnalysis, Credential, Deviation, PlantId, PurchaseOrder, RecordId,
    WorkflowRecord, WorkflowState,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// One store per governed record type
#[derive(Clone)]
pub struct RecordStores {
    /// Deviation reports
    pub deviations: Arc<dyn RecordStore<Deviation>>,
    /// Purchase orders
    pub purchase_orders: Arc<dyn RecordStore<PurchaseOrder>>,
    /// Certificates of analysis
    pub certificates: Arc<dyn RecordStore<CertificateOfAnalysis>>,
}

impl RecordStores {
    /// Process-local stores honouring the configured save policy
    #[must_use]
    pub fn in_memory(config: &WorkflowConfig) -> Self {
        Self {
            deviations: Arc::new(InMemoryRecordStore::with_mode(config.concurrency)),
            purchase_orders: Arc::new(InMemoryRecordStore::with_mode(config.concurrency)),
            certificates: Arc::new(InMemoryRecordStore::with_mode(config.concurrency)),
        }
    }
}

impl std::fmt::Debug for RecordStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStores").finish_non_exhaustive()
    }
}

/// Record types the service can route to a store
pub trait ManagedRecord: WorkflowRecord {
    /// Store holding records of this type
    fn store(stores: &RecordStores) -> &dyn RecordStore<Self>;
}

impl ManagedRecord for Deviation {
    fn store(stores: &RecordStores) -> &dyn RecordStore<Self> {
        stores.deviations.as_ref()
    }
}

impl ManagedRecord for PurchaseOrder {
    fn store(stores: &RecordStores) -> &dyn RecordStore<Self> {
        stores.purchase_orders.as_ref()
    }
}

impl ManagedRecord for CertificateOfAnalysis {
    fn store(stores: &RecordStores) -> &dyn RecordStore<Self> {
        stores.certificates.as_ref()
    }
}

/// Façade over resolver, gate, engine, stores and audit log
#[derive(Debug)]
pub struct WorkflowService {
    config: WorkflowConfig,
    resolver: PermissionResolver,
    gate: ESignatureGate,
    engine: WorkflowEngine,
    stores: RecordStores,
    audit: AuditLog,
}

impl WorkflowService {
    /// Service with a fresh per-process signing key
    #[must_use]
    pub fn new(config: WorkflowConfig, stores: RecordStores) -> Self {
        Self::with_gate(config, stores, ESignatureGate::generate())
    }

    /// Service with an injected gate; the confirmation lifetime comes from `config`
    #[must_use]
    pub fn with_gate(config: WorkflowConfig, stores: RecordStores, gate: ESignatureGate) -> Self {
        let gate = gate.with_ttl_secs(config.confirmation_ttl_secs);
        let engine = WorkflowEngine::new(gate.verifying_key());
        Self {
            config,
            resolver: PermissionResolver::new(),
            gate,
            engine,
            stores,
            audit: AuditLog::new(),
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Audit chain
    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// E-signature gate
    #[must_use]
    pub fn gate(&self) -> &ESignatureGate {
        &self.gate
    }

    /// Menu entries for the actor's role
    #[must_use]
    pub fn navigation(&self, actor: &Actor) -> Vec<&'static NavigationEntry> {
        self.resolver.visible_navigation(actor.role)
    }

    /// True when the actor's role may open the screen `key`
    #[must_use]
    pub fn can_navigate(&self, actor: &Actor, key: &str) -> bool {
        self.resolver.can_navigate(actor.role, key)
    }

    /// Fetch one record the actor may see
    pub async fn record<R>(&self, actor: &Actor, id: &RecordId) -> Result<R, WorkflowError>
    where
        R: ManagedRecord,
        R::Status: HasRuleTable,
    {
        let record = R::store(&self.stores).get(id).await?;
        self.check_scope(actor, record.plant_id(), id)?;
        Ok(record)
    }

    /// Records of one plant
    pub async fn list_by_plant<R>(
        &self,
        actor: &Actor,
        plant: &PlantId,
    ) -> Result<Vec<R>, WorkflowError>
    where
        R: ManagedRecord,
        R::Status: HasRuleTable,
    {
        if self.config.enforce_plant_scope && !actor.can_access_plant(plant) {
            return Ok(Vec::new());
        }
        Ok(R::store(&self.stores).list_by_plant(plant).await?)
    }

    /// Store a newly raised record
    ///
    /// The record must sit in its initial status with an empty trail and
    /// version 0; history only comes from `transition`.
    pub async fn create<R>(&self, actor: &Actor, record: R) -> Result<R, WorkflowError>
    where
        R: ManagedRecord,
        R::Status: HasRuleTable,
    {
        self.check_scope(actor, record.plant_id(), record.id())?;
        let meta = record.meta();
        if meta.status() != <R::Status as WorkflowState>::INITIAL
            || !meta.trail().is_empty()
            || meta.version != 0
        {
            warn!(
                record_type = %R::record_type(),
                record_id = %record.id(),
                actor_id = %actor.id,
                "record with history refused"
            );
            return Err(TransitionError::NotNew {
                record_id: record.id().clone(),
            }
            .into());
        }
        debug!(
            record_type = %R::record_type(),
            record_id = %record.id(),
            actor_id = %actor.id,
            "record raised"
        );
        Ok(R::store(&self.stores).save(record).await?)
    }

    /// Actions the actor may take on `record` now
    #[must_use]
    pub fn available_transitions<R>(
        &self,
        actor: &Actor,
        record: &R,
    ) -> Vec<&'static TransitionRule<R::Status>>
    where
        R: ManagedRecord,
        R::Status: HasRuleTable,
    {
        if self.config.enforce_plant_scope && !actor.can_access_plant(record.plant_id()) {
            return Vec::new();
        }
        self.resolver.available_transitions(record.status(), actor.role)
    }

    /// Issue a confirmation for `record -> to` from a credential entered out of band
    pub fn sign<R>(
        &self,
        actor: &Actor,
        record: &R,
        to: R::Status,
        credential: &Credential,
        reason: Option<String>,
    ) -> Result<ConfirmationToken, WorkflowError>
    where
        R: ManagedRecord,
        R::Status: HasRuleTable,
    {
        let binding = WorkflowEngine::binding_for(record, to, actor);
        Ok(self.gate.confirm(actor, credential, reason, binding)?)
    }

    /// Load, transition and persist one record
    pub async fn transition<R>(
        &self,
        actor: &Actor,
        id: &RecordId,
        to: R::Status,
        request: TransitionRequest,
    ) -> Result<R, WorkflowError>
    where
        R: ManagedRecord,
        R::Status: HasRuleTable,
    {
        let record: R = R::store(&self.stores).get(id).await?;
        self.commit(actor, &record, to, request).await
    }

    /// Like `transition`, prompting through `pad` first when the step is signed
    ///
    /// The prompt is only shown when the actor could fire the step, so a
    /// refused role never sees it. Cancelling the prompt leaves the record
    /// untouched.
    pub async fn sign_and_transition<R, P>(
        &self,
        pad: &P,
        actor: &Actor,
        id: &RecordId,
        to: R::Status,
        mut request: TransitionRequest,
    ) -> Result<R, WorkflowError>
    where
        R: ManagedRecord,
        R::Status: HasRuleTable,
        P: SignaturePad + ?Sized,
    {
        let record: R = R::store(&self.stores).get(id).await?;
        let from = record.status();
        let rule = self.resolver.rule(from, to).filter(|r| r.allows(actor.role));
        if let Some(rule) = rule.filter(|r| r.requires_esign) {
            self.check_scope(actor, record.plant_id(), id)?;
            let prompt = SignatureRequest {
                title: rule.label.to_string(),
                description: format!("{} {}: {} to {}", R::record_type(), id, from, to),
                binding: WorkflowEngine::binding_for(&record, to, actor),
            };
            let token = self.gate.request_confirmation(pad, actor, &prompt).await?;
            request.token = Some(token);
        }
        self.commit(actor, &record, to, request).await
    }

    async fn commit<R>(
        &self,
        actor: &Actor,
        record: &R,
        to: R::Status,
        request: TransitionRequest,
    ) -> Result<R, WorkflowError>
    where
        R: ManagedRecord,
        R::Status: HasRuleTable,
    {
        let result = async {
            self.check_scope(actor, record.plant_id(), record.id())?;
            let next = self.engine.apply_transition(record, to, actor, request)?;
            let stored = R::store(&self.stores).save(next).await?;
            Ok::<R, WorkflowError>(stored)
        }
        .await;

        let (outcome, detail) = match &result {
            Ok(stored) => {
                let signed = stored.meta().last_entry().is_some_and(|e| e.signed);
                (AuditOutcome::Applied, if signed { "signed" } else { "" }.to_string())
            }
            Err(err) => (AuditOutcome::Denied, err.to_string()),
        };
        self.audit.append(AuditEntry {
            timestamp: Utc::now(),
            record_type: R::record_type(),
            record_id: record.id().clone(),
            actor_id: actor.id.clone(),
            role: actor.role,
            from: record.status().as_str().to_string(),
            to: to.as_str().to_string(),
            outcome,
            detail,
        });
        result
    }

    fn check_scope(
        &self,
        actor: &Actor,
        plant: &PlantId,
        id: &RecordId,
    ) -> Result<(), TransitionError> {
        if self.config.enforce_plant_scope && !actor.can_access_plant(plant) {
            return Err(TransitionError::OutOfScope {
                record_id: id.clone(),
            });
        }
        Ok(())
    }
}
