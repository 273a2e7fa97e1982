use thiserror::Error;

use crate::error::ErrorClass;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password does not match")]
    Mismatch,

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

impl PasswordError {
    /// A mismatch is the routine "invalid credentials" path; everything else
    /// means the hasher or the stored hash is broken.
    pub fn class(&self) -> ErrorClass {
        match self {
            PasswordError::Mismatch => ErrorClass::Rejected,
            PasswordError::HashingFailed(_) | PasswordError::MalformedHash(_) => {
                ErrorClass::Infrastructure
            }
        }
    }
}
