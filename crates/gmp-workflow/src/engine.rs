//! Workflow engine
//!
//! Applies one transition to one record. The engine works on a clone: the
//! caller's record is never touched, and the returned record has its status
//! and approval trail moved together through `WorkflowMeta::advance`. Any
//! refusal therefore leaves no partial state behind.

use crate::error::TransitionError;
use chrono::{DateTime, Utc};
use gmp_access::{FieldMutation, Guard, HasRuleTable, PermissionResolver, TransitionRule};
use gmp_esign::{check_token, ActionBinding, ConfirmationToken, VerifyingKey};
use gmp_types::{Actor, FieldValue, RecordField, TransitionStamp, WorkflowRecord, WorkflowState};
use tracing::{info, warn};

/// Caller input accompanying a transition
#[derive(Debug, Clone, Default)]
pub struct TransitionRequest {
    /// Free-text reason, copied to the trail entry
    pub reason: Option<String>,
    /// Field edits; each field must be writable in the fired rule
    pub edits: Vec<(RecordField, FieldValue)>,
    /// E-signature confirmation for signed rules
    pub token: Option<ConfirmationToken>,
}

impl TransitionRequest {
    /// Empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a reason
    #[inline]
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Add a field edit
    #[inline]
    #[must_use]
    pub fn with_edit(mut self, field: RecordField, value: impl Into<FieldValue>) -> Self {
        self.edits.push((field, value.into()));
        self
    }

    /// Attach an e-signature confirmation
    #[inline]
    #[must_use]
    pub fn with_token(mut self, token: ConfirmationToken) -> Self {
        self.token = Some(token);
        self
    }
}

/// Table-driven transition executor
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    resolver: PermissionResolver,
    verifying_key: VerifyingKey,
}

impl WorkflowEngine {
    /// Engine accepting confirmations signed by the gate owning `verifying_key`
    #[must_use]
    pub fn new(verifying_key: VerifyingKey) -> Self {
        Self {
            resolver: PermissionResolver::new(),
            verifying_key,
        }
    }

    /// Binding a confirmation must carry to authorize `record -> to` by `actor`
    #[must_use]
    pub fn binding_for<R: WorkflowRecord>(
        record: &R,
        to: R::Status,
        actor: &Actor,
    ) -> ActionBinding {
        ActionBinding::new(
            record.id().clone(),
            record.meta().version,
            record.status(),
            to,
            actor.id.clone(),
        )
    }

    /// Move `record` to `to` on behalf of `actor`
    pub fn apply_transition<R>(
        &self,
        record: &R,
        to: R::Status,
        actor: &Actor,
        request: TransitionRequest,
    ) -> Result<R, TransitionError>
    where
        R: WorkflowRecord,
        R::Status: HasRuleTable,
    {
        self.apply_transition_at(record, to, actor, request, Utc::now())
    }

    /// `apply_transition` with an explicit commit time
    pub fn apply_transition_at<R>(
        &self,
        record: &R,
        to: R::Status,
        actor: &Actor,
        request: TransitionRequest,
        now: DateTime<Utc>,
    ) -> Result<R, TransitionError>
    where
        R: WorkflowRecord,
        R::Status: HasRuleTable,
    {
        let from = record.status();
        let result = self.try_apply(record, to, actor, request, now);
        match &result {
            Ok(_) => info!(
                record_type = %R::record_type(),
                record_id = %record.id(),
                actor_id = %actor.id,
                role = %actor.role,
                from = %from,
                to = %to,
                "transition applied"
            ),
            Err(err) => warn!(
                record_type = %R::record_type(),
                record_id = %record.id(),
                actor_id = %actor.id,
                role = %actor.role,
                from = %from,
                to = %to,
                error = %err,
                "transition refused"
            ),
        }
        result
    }

    fn try_apply<R>(
        &self,
        record: &R,
        to: R::Status,
        actor: &Actor,
        request: TransitionRequest,
        now: DateTime<Utc>,
    ) -> Result<R, TransitionError>
    where
        R: WorkflowRecord,
        R::Status: HasRuleTable,
    {
        let from = record.status();
        let rule = self
            .resolver
            .rule(from, to)
            .filter(|rule| rule.allows(actor.role))
            .ok_or_else(|| TransitionError::NotPermitted {
                record_type: R::record_type(),
                record_id: record.id().clone(),
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
                role: actor.role.to_string(),
            })?;

        check_assignee(record, rule, actor)?;

        let signed = if rule.requires_esign {
            let token = request.token.as_ref().ok_or(TransitionError::SignatureRequired)?;
            let expected = Self::binding_for(record, to, actor);
            let unix = u64::try_from(now.timestamp()).unwrap_or_default();
            check_token(token, &self.verifying_key, &expected, unix)?;
            true
        } else {
            false
        };

        let mut next = record.clone();
        for (field, value) in request.edits {
            if !rule.is_writable(field) {
                return Err(TransitionError::FieldNotWritable(field));
            }
            next.write_field(field, value)?;
        }
        apply_mutations(&mut next, rule, actor, now)?;
        for guard in rule.guards {
            if let Guard::RequiresField(field) = *guard {
                let filled = next.read_field(field)?.is_some_and(|v| !v.is_blank());
                if !filled {
                    return Err(TransitionError::MissingField(field));
                }
            }
        }

        let reason = request
            .reason
            .or_else(|| request.token.and_then(|t| t.reason))
            .filter(|r| !r.trim().is_empty());
        next.meta_mut().advance(
            to,
            TransitionStamp {
                step: rule.label.to_string(),
                actor_id: actor.id.clone(),
                role: actor.role,
                at: now,
                comment: reason,
                signed,
            },
        );
        Ok(next)
    }
}

fn check_assignee<R: WorkflowRecord>(
    record: &R,
    rule: &TransitionRule<R::Status>,
    actor: &Actor,
) -> Result<(), TransitionError> {
    for guard in rule.guards {
        if let Guard::AssigneeOnly(field) = *guard {
            let assignee = match record.read_field(field)? {
                Some(FieldValue::Actor(id)) => Some(id),
                _ => None,
            };
            if assignee.as_ref() != Some(&actor.id) {
                return Err(TransitionError::NotAssignee {
                    record_id: record.id().clone(),
                });
            }
        }
    }
    Ok(())
}

fn apply_mutations<R: WorkflowRecord>(
    record: &mut R,
    rule: &TransitionRule<R::Status>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    for mutation in rule.mutations {
        match *mutation {
            FieldMutation::Writable(_) => {}
            FieldMutation::DefaultToActor(field) => {
                let empty = record.read_field(field)?.map_or(true, |v| v.is_blank());
                if empty {
                    record.write_field(field, FieldValue::Actor(actor.id.clone()))?;
                }
            }
            FieldMutation::StampActor(field) => {
                record.write_field(field, FieldValue::Actor(actor.id.clone()))?;
            }
            FieldMutation::StampTime(field) => {
                record.write_field(field, FieldValue::Timestamp(now))?;
            }
        }
    }
    Ok(())
}
