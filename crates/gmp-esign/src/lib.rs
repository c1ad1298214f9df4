//! GMP E-Sign - electronic signature gate
//!
//! Before a signed transition commits, the acting user re-enters their
//! credential. On a match the gate issues an ed25519-signed
//! `ConfirmationToken` bound to that one action; the workflow engine only
//! accepts signed transitions that carry a valid, unexpired, matching token.

pub mod error;
pub mod gate;
pub mod pad;
pub mod token;

pub use error::ESignError;
pub use gate::{
    check_token, Confirmed, ESignatureGate, SignatureRequest, DEFAULT_CONFIRMATION_TTL_SECS,
};
pub use pad::{SignatureAttempt, SignaturePad, SignaturePrompt};
pub use token::{unix_now, ActionBinding, ConfirmationToken};

/// Re-exported so callers can build gates from injected keys
pub use ed25519_dalek::{SigningKey, VerifyingKey};
