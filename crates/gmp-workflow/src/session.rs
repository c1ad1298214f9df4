//! Identity and session
//!
//! One `SessionManager` per client session holds the logged-in actor. Login
//! checks the secret against the stored digest and issues an ed25519-signed
//! bearer token; `validate_bearer` accepts it back until it expires or the
//! session ends. Listeners registered with `on_actor_change` run after every
//! login and logout so views can re-evaluate navigation and permissions.

use crate::error::SessionError;
use dashmap::DashMap;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use gmp_esign::unix_now;
use gmp_types::{Actor, ActorId, Credential};
use parking_lot::RwLock;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const DOMAIN: &[u8] = b"gmp-session-bearer-v1";

/// Source of provisioned accounts
pub trait AccountDirectory: Send + Sync {
    /// Account by login email, compared case-insensitively
    fn find_by_email(&self, email: &str) -> Option<Actor>;

    /// Account by id
    fn find_by_id(&self, id: &ActorId) -> Option<Actor>;
}

/// Directory held in memory
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    accounts: DashMap<ActorId, Actor>,
}

impl InMemoryDirectory {
    /// Empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an account
    pub fn insert(&self, actor: Actor) {
        self.accounts.insert(actor.id.clone(), actor);
    }

    /// Number of accounts
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True when no account is provisioned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl FromIterator<Actor> for InMemoryDirectory {
    fn from_iter<I: IntoIterator<Item = Actor>>(iter: I) -> Self {
        let dir = Self::new();
        for actor in iter {
            dir.insert(actor);
        }
        dir
    }
}

impl AccountDirectory for InMemoryDirectory {
    fn find_by_email(&self, email: &str) -> Option<Actor> {
        let email = email.trim();
        if email.is_empty() {
            return None;
        }
        self.accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .map(|a| a.value().clone())
    }

    fn find_by_id(&self, id: &ActorId) -> Option<Actor> {
        self.accounts.get(id).map(|a| a.value().clone())
    }
}

/// Signed contents of a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerClaims {
    /// Session the token belongs to
    pub session_id: Uuid,
    /// Logged-in account
    pub actor_id: ActorId,
    /// Unix seconds at issue
    pub issued_at: u64,
    /// Unix seconds at expiry; 0 = never
    pub expires_at: u64,
}

/// Session credential presented on later requests
///
/// Text form is `claims-hex.signature-hex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken {
    /// Token contents
    pub claims: BearerClaims,
    signature: Signature,
}

impl BearerToken {
    fn issue(claims: BearerClaims, key: &SigningKey) -> Self {
        let signature = key.sign(&message(&claims_bytes(&claims)));
        Self { claims, signature }
    }

    /// True when the signature matches `key`
    #[must_use]
    pub fn verify(&self, key: &VerifyingKey) -> bool {
        key.verify(&message(&claims_bytes(&self.claims)), &self.signature)
            .is_ok()
    }

    /// True at or after `expires_at`
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.claims.expires_at != 0 && now >= self.claims.expires_at
    }
}

fn claims_bytes(claims: &BearerClaims) -> Vec<u8> {
    // Field order is fixed by the struct, so the encoding is stable
    serde_json::to_vec(claims).unwrap_or_default()
}

fn message(claims: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(DOMAIN.len() + claims.len());
    msg.extend_from_slice(DOMAIN);
    msg.extend_from_slice(claims);
    msg
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            hex::encode(claims_bytes(&self.claims)),
            hex::encode(self.signature.to_bytes())
        )
    }
}

impl FromStr for BearerToken {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (claims_hex, sig_hex) = s.trim().split_once('.').ok_or(SessionError::InvalidToken)?;
        let raw = hex::decode(claims_hex).map_err(|_| SessionError::InvalidToken)?;
        let claims: BearerClaims =
            serde_json::from_slice(&raw).map_err(|_| SessionError::InvalidToken)?;
        let sig: [u8; 64] = hex::decode(sig_hex)
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or(SessionError::InvalidToken)?;
        Ok(Self {
            claims,
            signature: Signature::from_bytes(&sig),
        })
    }
}

/// Handle returned by `on_actor_change`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(Option<&Actor>) + Send + Sync>;

struct Session {
    id: Uuid,
    actor: Actor,
}

/// Login state of one client session
pub struct SessionManager<D> {
    directory: D,
    signing_key: SigningKey,
    ttl_secs: u64,
    current: RwLock<Option<Session>>,
    listeners: DashMap<ListenerId, Listener>,
    next_listener: AtomicU64,
}

impl<D: AccountDirectory> SessionManager<D> {
    /// Manager over `directory` with a fresh signing key
    #[must_use]
    pub fn new(directory: D, ttl_secs: u64) -> Self {
        Self::with_key(directory, SigningKey::generate(&mut OsRng), ttl_secs)
    }

    /// Manager with an injected signing key
    #[must_use]
    pub fn with_key(directory: D, signing_key: SigningKey, ttl_secs: u64) -> Self {
        Self {
            directory,
            signing_key,
            ttl_secs,
            current: RwLock::new(None),
            listeners: DashMap::new(),
            next_listener: AtomicU64::new(0),
        }
    }

    /// Account source
    #[must_use]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Log in by email and secret
    pub fn login(&self, email: &str, secret: &Credential) -> Result<BearerToken, SessionError> {
        self.login_at(email, secret, unix_now())
    }

    /// `login` with an explicit clock
    pub fn login_at(
        &self,
        email: &str,
        secret: &Credential,
        now: u64,
    ) -> Result<BearerToken, SessionError> {
        let Some(actor) = self
            .directory
            .find_by_email(email)
            .filter(|a| a.verify_credential(secret))
        else {
            warn!("login rejected");
            return Err(SessionError::InvalidCredential);
        };

        let claims = BearerClaims {
            session_id: Uuid::new_v4(),
            actor_id: actor.id.clone(),
            issued_at: now,
            expires_at: if self.ttl_secs == 0 { 0 } else { now.saturating_add(self.ttl_secs) },
        };
        let token = BearerToken::issue(claims, &self.signing_key);
        info!(
            actor_id = %actor.id,
            role = %actor.role,
            session_id = %token.claims.session_id,
            "login"
        );

        *self.current.write() = Some(Session {
            id: token.claims.session_id,
            actor: actor.clone(),
        });
        self.notify(Some(&actor));
        Ok(token)
    }

    /// End the session; returns false when nobody was logged in
    pub fn logout(&self) -> bool {
        let ended = self.current.write().take();
        match ended {
            Some(session) => {
                info!(actor_id = %session.actor.id, session_id = %session.id, "logout");
                self.notify(None);
                true
            }
            None => false,
        }
    }

    /// Logged-in actor, if any
    #[must_use]
    pub fn current_actor(&self) -> Option<Actor> {
        self.current.read().as_ref().map(|s| s.actor.clone())
    }

    /// Logged-in actor or `Unauthenticated`
    pub fn require_actor(&self) -> Result<Actor, SessionError> {
        self.current_actor().ok_or(SessionError::Unauthenticated)
    }

    /// Resolve a bearer token to its actor
    pub fn validate_bearer(&self, token: &str) -> Result<Actor, SessionError> {
        self.validate_bearer_at(token, unix_now())
    }

    /// `validate_bearer` with an explicit clock
    pub fn validate_bearer_at(&self, token: &str, now: u64) -> Result<Actor, SessionError> {
        let token: BearerToken = token.parse()?;
        if !token.verify(&self.signing_key.verifying_key()) {
            return Err(SessionError::InvalidToken);
        }
        if token.is_expired_at(now) {
            return Err(SessionError::Expired);
        }
        let current = self.current.read();
        match current.as_ref() {
            Some(session) if session.id == token.claims.session_id => {
                Ok(session.actor.clone())
            }
            _ => Err(SessionError::Revoked),
        }
    }

    /// Run `callback` after every login and logout
    pub fn on_actor_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(Option<&Actor>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.insert(id, Arc::new(callback));
        id
    }

    /// Unregister a listener; false when it was already gone
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn notify(&self, actor: Option<&Actor>) {
        // Listeners may register or remove listeners, so no shard lock is held
        let listeners: Vec<Listener> =
            self.listeners.iter().map(|l| Arc::clone(l.value())).collect();
        for listener in listeners {
            listener(actor);
        }
    }
}

impl<D> fmt::Debug for SessionManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl_secs", &self.ttl_secs)
            .field("logged_in", &self.current.read().as_ref().map(|s| s.actor.id.clone()))
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
