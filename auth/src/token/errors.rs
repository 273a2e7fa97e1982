use thiserror::Error;

use crate::error::ErrorClass;
use crate::keys::KeyError;

/// Error type for token issuance and verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token header has no key identifier")]
    MissingKeyId,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Failed to serialize token claims: {0}")]
    Serialization(String),

    #[error("Token is expired")]
    Expired,

    #[error("Invalid session ID")]
    InvalidSession,

    #[error("Invalid token lifetime: {0}")]
    InvalidLifetime(String),
}

impl TokenError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TokenError::Key(e) => e.class(),
            TokenError::Serialization(_) | TokenError::InvalidLifetime(_) => {
                ErrorClass::Infrastructure
            }
            TokenError::Malformed(_)
            | TokenError::UnsupportedAlgorithm(_)
            | TokenError::MissingKeyId
            | TokenError::InvalidSignature
            | TokenError::Expired
            | TokenError::InvalidSession => ErrorClass::Rejected,
        }
    }
}
