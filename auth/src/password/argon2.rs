use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use serde::Deserialize;
use serde::Serialize;

use super::errors::PasswordError;
use crate::config::PasswordConfig;

/// Stored password hash.
///
/// PHC string carrying algorithm, parameters, salt and digest, so it can be
/// verified without any other input than the candidate password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a hash loaded from storage.
    ///
    /// # Errors
    /// * `MalformedHash` - String is not a valid PHC hash
    pub fn new(hash: String) -> Result<Self, PasswordError> {
        PasswordHash::new(&hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        Ok(Self(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl TryFrom<String> for HashedPassword {
    type Error = PasswordError;

    fn try_from(hash: String) -> Result<Self, Self::Error> {
        Self::new(hash)
    }
}

impl From<HashedPassword> for String {
    fn from(hash: HashedPassword) -> Self {
        hash.0
    }
}

impl fmt::Display for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Password hashing implementation.
///
/// Argon2id with a random salt per hash and a fixed work factor taken from
/// [`PasswordConfig`].
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    max_password_bytes: usize,
}

impl PasswordHasher {
    /// Create a hasher with the default work factor.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            max_password_bytes: PasswordConfig::default().max_password_bytes,
        }
    }

    /// Create a hasher with a configured work factor.
    ///
    /// # Errors
    /// * `HashingFailed` - Memory, time or parallelism cost is out of bounds
    pub fn from_config(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_cost_kib,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|e| PasswordError::HashingFailed(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            max_password_bytes: config.max_password_bytes,
        })
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Self-describing PHC hash
    ///
    /// # Errors
    /// * `HashingFailed` - Password too long or the primitive failed
    pub fn hash(&self, password: &str) -> Result<HashedPassword, PasswordError> {
        if password.len() > self.max_password_bytes {
            return Err(PasswordError::HashingFailed(format!(
                "Password exceeds maximum length of {} bytes",
                self.max_password_bytes
            )));
        }

        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| HashedPassword(hash.to_string()))
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Parameters and salt come from the stored hash, not from this hasher's
    /// configuration, so hashes made under an older work factor still verify.
    ///
    /// # Errors
    /// * `Mismatch` - Password does not match
    /// * `MalformedHash` - Stored hash could not be used
    pub fn verify(&self, password: &str, hash: &HashedPassword) -> Result<(), PasswordError> {
        let parsed_hash = PasswordHash::new(hash.as_str())
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(PasswordHashError::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("max_password_bytes", &self.max_password_bytes)
            .finish_non_exhaustive()
    }
}
