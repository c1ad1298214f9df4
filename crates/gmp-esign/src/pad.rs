//! Signature prompt collaborator

use async_trait::async_trait;
use gmp_types::Credential;

/// What the prompt shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePrompt {
    /// Name of the signing account
    pub actor_name: String,
    /// Action title
    pub title: String,
    /// Action description
    pub description: String,
    /// 1-based attempt counter
    pub attempt: u32,
    /// Why the previous attempt failed
    pub last_error: Option<String>,
}

/// What the user entered
#[derive(Debug, Clone)]
pub struct SignatureAttempt {
    /// Re-entered credential
    pub credential: Credential,
    /// Optional free-text reason
    pub reason: Option<String>,
}

/// UI surface that collects a credential for the gate
///
/// Returning `None` means the user abandoned the prompt.
#[async_trait]
pub trait SignaturePad: Send + Sync {
    /// Show `prompt` and wait for input
    async fn prompt(&self, prompt: &SignaturePrompt) -> Option<SignatureAttempt>;
}
