use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use super::errors::KeyError;
use super::models::KeyId;

/// Port for the source of fresh key identifiers.
///
/// Implementations must never hand out the same identifier twice.
pub trait KeyIdGenerator: Send + Sync + 'static {
    fn generate(&self) -> KeyId;
}

/// Port for cryptographically secure random bytes.
pub trait RandomSource: Send + Sync + 'static {
    /// Fill `dest` completely or fail.
    ///
    /// # Errors
    /// * `RandomSource` - The source is exhausted or unavailable
    fn fill(&self, dest: &mut [u8]) -> Result<(), KeyError>;
}

/// Random (v4) UUID identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyIdGenerator;

impl KeyIdGenerator for UuidKeyIdGenerator {
    fn generate(&self) -> KeyId {
        KeyId::new(Uuid::new_v4().to_string())
    }
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

impl RandomSource for OsRandomSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), KeyError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| KeyError::RandomSource(e.to_string()))
    }
}
