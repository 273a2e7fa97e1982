use thiserror::Error;

use super::models::KeyId;
use crate::error::ErrorClass;

/// Error type for signing key management.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Secure random source failed: {0}")]
    RandomSource(String),

    #[error("Key identifier already in use: {0}")]
    IdentifierCollision(KeyId),

    #[error("No signing key available")]
    NoKeyAvailable,

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),
}

impl KeyError {
    /// Only an unknown key is a routine outcome (token signed by a retired or
    /// foreign key); the rest mean rotation or setup went wrong.
    pub fn class(&self) -> ErrorClass {
        match self {
            KeyError::UnknownKey(_) => ErrorClass::Rejected,
            KeyError::RandomSource(_)
            | KeyError::IdentifierCollision(_)
            | KeyError::NoKeyAvailable => ErrorClass::Infrastructure,
        }
    }
}
