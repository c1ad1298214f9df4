//! Credential secrets and their salted digests
//!
//! A `Credential` is only ever held transiently (a login form, a signature
//! prompt). Accounts keep a `CredentialHash`; comparisons go through
//! `subtle` so the check takes the same time whichever byte differs.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;
const DOMAIN: &[u8] = b"gmp-credential-v1";

/// Plaintext secret entered by a user
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret
    #[inline]
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw bytes of the secret
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// True for an empty entry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Salted SHA-256 digest of a credential
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash {
    salt: [u8; SALT_LEN],
    digest: [u8; 32],
}

impl CredentialHash {
    /// Hash a credential under a fresh random salt
    #[must_use]
    pub fn derive(credential: &Credential) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        Self::derive_with_salt(credential, salt)
    }

    /// Hash a credential under a caller-chosen salt
    #[must_use]
    pub fn derive_with_salt(credential: &Credential, salt: [u8; SALT_LEN]) -> Self {
        Self {
            salt,
            digest: digest(&salt, credential.expose()),
        }
    }

    /// Constant-time comparison of an attempt against this hash
    #[must_use]
    pub fn verify(&self, attempt: &Credential) -> bool {
        let candidate = digest(&self.salt, attempt.expose());
        candidate.ct_eq(&self.digest).into()
    }

    /// Salt as lowercase hex
    #[must_use]
    pub fn salt_hex(&self) -> String {
        hex::encode(self.salt)
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHash")
            .field("salt", &self.salt_hex())
            .finish_non_exhaustive()
    }
}

fn digest(salt: &[u8], secret: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN);
    hasher.update(salt);
    hasher.update(secret);
    hasher.finalize().into()
}
