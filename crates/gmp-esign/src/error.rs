//! E-signature failures

/// Why a confirmation was refused or a token rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ESignError {
    /// The re-entered credential does not match
    #[error("invalid credential")]
    InvalidCredential,

    /// The user abandoned the prompt
    #[error("signature prompt cancelled")]
    Cancelled,

    /// The binding names a different account than the signer
    #[error("signer {signer} cannot confirm an action bound to {bound}")]
    ActorMismatch {
        /// Account that entered the credential
        signer: String,
        /// Account named by the binding
        bound: String,
    },

    /// The token signature does not verify
    #[error("confirmation token signature invalid")]
    TokenIntegrityFailure,

    /// The token is past its expiry
    #[error("confirmation token expired")]
    TokenExpired,

    /// The token was issued for a different action
    #[error("confirmation token bound to a different action")]
    TokenBindingFailure,
}

impl ESignError {
    /// True when the user can simply try again
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ESignError::InvalidCredential | ESignError::Cancelled | ESignError::TokenExpired
        )
    }
}
