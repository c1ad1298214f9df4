//! The e-signature gate
//!
//! Checks a re-entered credential against the acting account and, on a
//! match, issues a `ConfirmationToken` for one action. Nothing here touches
//! a record: if the prompt is cancelled or never succeeds, no token exists
//! and the engine refuses the signed transition.

use crate::error::ESignError;
use crate::pad::{SignatureAttempt, SignaturePad, SignaturePrompt};
use crate::token::{unix_now, ActionBinding, ConfirmationToken};
use ed25519_dalek::{SigningKey, VerifyingKey};
use gmp_types::{Actor, Credential};
use rand::rngs::OsRng;
use tracing::{debug, info, warn};

/// Default lifetime of a confirmation token
pub const DEFAULT_CONFIRMATION_TTL_SECS: u64 = 300;

/// Successful credential re-entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    /// Reason entered alongside the credential
    pub reason: Option<String>,
}

/// What the user is asked to sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    /// Short action title, e.g. "Approve & Close Deviation"
    pub title: String,
    /// Longer description of the consequence
    pub description: String,
    /// Exact action the resulting token will cover
    pub binding: ActionBinding,
}

/// Reusable credential confirmation step for signed transitions
pub struct ESignatureGate {
    signing_key: SigningKey,
    ttl_secs: u64,
}

impl ESignatureGate {
    /// Gate signing with `signing_key`
    #[must_use]
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            signing_key,
            ttl_secs: DEFAULT_CONFIRMATION_TTL_SECS,
        }
    }

    /// Gate with a fresh per-process key
    #[must_use]
    pub fn generate() -> Self {
        Self::new(SigningKey::generate(&mut OsRng))
    }

    /// Override token lifetime; 0 issues non-expiring tokens
    #[inline]
    #[must_use]
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Key the engine needs to check tokens
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Compare an attempt against the actor's stored credential
    pub fn verify(
        &self,
        actor: &Actor,
        attempt: &Credential,
        reason: Option<String>,
    ) -> Result<Confirmed, ESignError> {
        if actor.verify_credential(attempt) {
            debug!(actor_id = %actor.id, "e-signature credential accepted");
            Ok(Confirmed { reason })
        } else {
            warn!(actor_id = %actor.id, "e-signature credential rejected");
            Err(ESignError::InvalidCredential)
        }
    }

    /// Verify and, on success, issue a token for `binding`
    pub fn confirm(
        &self,
        actor: &Actor,
        attempt: &Credential,
        reason: Option<String>,
        binding: ActionBinding,
    ) -> Result<ConfirmationToken, ESignError> {
        self.confirm_at(actor, attempt, reason, binding, unix_now())
    }

    /// `confirm` with an explicit clock
    pub fn confirm_at(
        &self,
        actor: &Actor,
        attempt: &Credential,
        reason: Option<String>,
        binding: ActionBinding,
        now: u64,
    ) -> Result<ConfirmationToken, ESignError> {
        if binding.actor_id != actor.id {
            return Err(ESignError::ActorMismatch {
                signer: actor.id.to_string(),
                bound: binding.actor_id.to_string(),
            });
        }
        let Confirmed { reason } = self.verify(actor, attempt, reason)?;
        let expires_at = if self.ttl_secs == 0 { 0 } else { now.saturating_add(self.ttl_secs) };
        let token = ConfirmationToken::sign(binding, reason, &self.signing_key, now, expires_at);
        info!(action = %token.binding, fingerprint = %token.fingerprint(), "e-signature confirmed");
        Ok(token)
    }

    /// Prompt through `pad` until the credential matches or the user cancels
    ///
    /// Every wrong credential re-prompts with the failure shown; there is no
    /// lockout.
    pub async fn request_confirmation<P>(
        &self,
        pad: &P,
        actor: &Actor,
        request: &SignatureRequest,
    ) -> Result<ConfirmationToken, ESignError>
    where
        P: SignaturePad + ?Sized,
    {
        let mut prompt = SignaturePrompt {
            actor_name: actor.name.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            attempt: 1,
            last_error: None,
        };
        loop {
            let Some(SignatureAttempt { credential, reason }) = pad.prompt(&prompt).await else {
                info!(action = %request.binding, "e-signature prompt cancelled");
                return Err(ESignError::Cancelled);
            };
            match self.confirm(actor, &credential, reason, request.binding.clone()) {
                Err(ESignError::InvalidCredential) => {
                    prompt.attempt += 1;
                    prompt.last_error = Some(ESignError::InvalidCredential.to_string());
                }
                other => return other,
            }
        }
    }
}

impl std::fmt::Debug for ESignatureGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ESignatureGate")
            .field("verifying_key", &hex::encode(self.verifying_key().as_bytes()))
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Engine-side token check: signature, expiry, then exact binding
pub fn check_token(
    token: &ConfirmationToken,
    verifying_key: &VerifyingKey,
    expected: &ActionBinding,
    now: u64,
) -> Result<(), ESignError> {
    if !token.verify(verifying_key) {
        return Err(ESignError::TokenIntegrityFailure);
    }
    if token.is_expired_at(now) {
        return Err(ESignError::TokenExpired);
    }
    if !token.is_bound_to(expected) {
        return Err(ESignError::TokenBindingFailure);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gmp_types::{DeviationStatus, Role};
    use std::sync::Mutex;

    struct Scripted {
        answers: Mutex<Vec<Option<SignatureAttempt>>>,
        seen: Mutex<Vec<SignaturePrompt>>,
    }

    impl Scripted {
        fn new(mut answers: Vec<Option<SignatureAttempt>>) -> Self {
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SignaturePad for Scripted {
        async fn prompt(&self, prompt: &SignaturePrompt) -> Option<SignatureAttempt> {
            self.seen.lock().unwrap().push(prompt.clone());
            self.answers.lock().unwrap().pop().flatten()
        }
    }

    fn attempt(secret: &str) -> Option<SignatureAttempt> {
        Some(SignatureAttempt {
            credential: Credential::new(secret),
            reason: Some("reviewed".into()),
        })
    }

    fn manager() -> Actor {
        Actor::new("u2", "Anita", Role::QaManager, &Credential::new("m4nager"))
    }

    fn request() -> SignatureRequest {
        SignatureRequest {
            title: "Approve & Submit to Head".into(),
            description: "Deviation dev-1".into(),
            binding: ActionBinding::new(
                "dev-1",
                2,
                DeviationStatus::PendingManagerReview,
                DeviationStatus::PendingFinalApproval,
                "u2",
            ),
        }
    }

    #[test]
    fn verify_matches_credential() {
        let gate = ESignatureGate::generate();
        let ok = gate.verify(&manager(), &Credential::new("m4nager"), Some("fine".into()));
        assert_eq!(ok.unwrap().reason.as_deref(), Some("fine"));
        assert_eq!(
            gate.verify(&manager(), &Credential::new("wrong"), None),
            Err(ESignError::InvalidCredential)
        );
    }

    #[test]
    fn confirm_refuses_foreign_binding() {
        let gate = ESignatureGate::generate();
        let mut binding = request().binding;
        binding.actor_id = "u3".into();
        let err = gate
            .confirm(&manager(), &Credential::new("m4nager"), None, binding)
            .unwrap_err();
        assert!(matches!(err, ESignError::ActorMismatch { .. }));
    }

    #[test]
    fn issued_token_passes_check() {
        let gate = ESignatureGate::generate().with_ttl_secs(60);
        let token = gate
            .confirm_at(&manager(), &Credential::new("m4nager"), None, request().binding, 1_000)
            .unwrap();
        assert_eq!(token.expires_at, 1_060);
        check_token(&token, &gate.verifying_key(), &request().binding, 1_030).unwrap();
        assert_eq!(
            check_token(&token, &gate.verifying_key(), &request().binding, 1_061),
            Err(ESignError::TokenExpired)
        );
    }

    #[test]
    fn huge_ttl_saturates() {
        let gate = ESignatureGate::generate().with_ttl_secs(u64::MAX);
        let token = gate
            .confirm_at(&manager(), &Credential::new("m4nager"), None, request().binding, 1_000)
            .unwrap();
        assert_eq!(token.expires_at, u64::MAX);
        check_token(&token, &gate.verifying_key(), &request().binding, 1_000_000).unwrap();
    }

    #[test]
    fn check_rejects_other_action() {
        let gate = ESignatureGate::generate();
        let token = gate
            .confirm(&manager(), &Credential::new("m4nager"), None, request().binding)
            .unwrap();
        let mut other = request().binding;
        other.to = DeviationStatus::Rejected.to_string();
        assert_eq!(
            check_token(&token, &gate.verifying_key(), &other, unix_now()),
            Err(ESignError::TokenBindingFailure)
        );
    }

    #[tokio::test]
    async fn wrong_credential_reprompts() {
        let gate = ESignatureGate::generate();
        let pad = Scripted::new(vec![attempt("nope"), attempt("m4nager")]);
        let token = gate
            .request_confirmation(&pad, &manager(), &request())
            .await
            .unwrap();
        assert_eq!(token.reason.as_deref(), Some("reviewed"));

        let seen = pad.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].attempt, 2);
        assert_eq!(seen[1].last_error.as_deref(), Some("invalid credential"));
    }

    #[tokio::test]
    async fn cancel_yields_no_token() {
        let gate = ESignatureGate::generate();
        let pad = Scripted::new(vec![attempt("nope"), None]);
        let result = gate.request_confirmation(&pad, &manager(), &request()).await;
        assert_eq!(result, Err(ESignError::Cancelled));
    }
}
