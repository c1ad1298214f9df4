//! Action-bound confirmation tokens
//!
//! A token proves that `actor_id` re-entered their credential for one exact
//! transition of one exact record version. It is signed by the gate's key so
//! the engine can check it without seeing the credential.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use gmp_types::{ActorId, RecordId, RecordType, WorkflowState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const DOMAIN: &[u8] = b"gmp-esign-confirmation-v1";

/// The transition a confirmation is valid for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionBinding {
    /// Record type
    pub record_type: RecordType,
    /// Record id
    pub record_id: RecordId,
    /// Record version the actor looked at
    pub version: u64,
    /// Source status label
    pub from: String,
    /// Target status label
    pub to: String,
    /// Signing account
    pub actor_id: ActorId,
}

impl ActionBinding {
    /// Bind to `from -> to` on a record version
    #[must_use]
    pub fn new<S: WorkflowState>(
        record_id: impl Into<RecordId>,
        version: u64,
        from: S,
        to: S,
        actor_id: impl Into<ActorId>,
    ) -> Self {
        Self {
            record_type: S::RECORD_TYPE,
            record_id: record_id.into(),
            version,
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            actor_id: actor_id.into(),
        }
    }

    fn write_message(&self, msg: &mut Vec<u8>) {
        put_str(msg, self.record_type.as_str());
        put_str(msg, self.record_id.as_str());
        msg.extend_from_slice(&self.version.to_le_bytes());
        put_str(msg, &self.from);
        put_str(msg, &self.to);
        put_str(msg, self.actor_id.as_str());
    }
}

impl fmt::Display for ActionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}@v{} {} -> {} by {}",
            self.record_type, self.record_id, self.version, self.from, self.to, self.actor_id
        )
    }
}

/// Signed proof of a successful e-signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationToken {
    /// Action the token is valid for
    pub binding: ActionBinding,
    /// Reason entered at the prompt
    pub reason: Option<String>,
    /// Unix seconds at issue
    pub issued_at: u64,
    /// Unix seconds after which the token is void (0 = never)
    pub expires_at: u64,
    /// Gate signature over all of the above
    pub signature: Signature,
}

impl ConfirmationToken {
    /// Issue a token
    #[must_use]
    pub fn sign(
        binding: ActionBinding,
        reason: Option<String>,
        signing_key: &SigningKey,
        issued_at: u64,
        expires_at: u64,
    ) -> Self {
        let message = token_message(&binding, reason.as_deref(), issued_at, expires_at);
        let signature = signing_key.sign(&message);
        Self {
            binding,
            reason,
            issued_at,
            expires_at,
            signature,
        }
    }

    /// Check the signature
    #[must_use]
    pub fn verify(&self, verifying_key: &VerifyingKey) -> bool {
        let message = token_message(
            &self.binding,
            self.reason.as_deref(),
            self.issued_at,
            self.expires_at,
        );
        verifying_key.verify(&message, &self.signature).is_ok()
    }

    /// True when the token is past its expiry at `now` (unix seconds)
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at != 0 && now > self.expires_at
    }

    /// True when the token is past its expiry now
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }

    /// True when the token covers exactly `binding`
    #[must_use]
    pub fn is_bound_to(&self, binding: &ActionBinding) -> bool {
        &self.binding == binding
    }

    /// Hex form of the signature, for logs and audit entries
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.signature.to_bytes()[..8])
    }
}

/// Current unix time in seconds
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn put_str(msg: &mut Vec<u8>, s: &str) {
    msg.extend_from_slice(&(s.len() as u64).to_le_bytes());
    msg.extend_from_slice(s.as_bytes());
}

fn token_message(
    binding: &ActionBinding,
    reason: Option<&str>,
    issued_at: u64,
    expires_at: u64,
) -> Vec<u8> {
    let mut msg = Vec::with_capacity(DOMAIN.len() + 128);
    msg.extend_from_slice(DOMAIN);
    binding.write_message(&mut msg);
    match reason {
        Some(r) => {
            msg.push(1);
            put_str(&mut msg, r);
        }
        None => msg.push(0),
    }
    msg.extend_from_slice(&issued_at.to_le_bytes());
    msg.extend_from_slice(&expires_at.to_le_bytes());
    msg
}
