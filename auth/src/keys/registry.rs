use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use zeroize::Zeroizing;

use super::errors::KeyError;
use super::models::KeyId;
use super::models::SigningKey;
use super::models::SECRET_LENGTH;
use super::ports::KeyIdGenerator;
use super::ports::OsRandomSource;
use super::ports::RandomSource;
use super::ports::UuidKeyIdGenerator;

/// Port for the set of signing keys used to issue and verify tokens.
///
/// A durable keystore that persists keys across restarts (and decides when
/// superseded keys may be retired) replaces the in-memory registry by
/// implementing this trait.
pub trait KeyRegistry: Send + Sync {
    /// Generate a new key and make it current.
    ///
    /// # Returns
    /// Identifier of the new current key
    ///
    /// # Errors
    /// * `RandomSource` - Secure random source failed
    /// * `IdentifierCollision` - Generated identifier is already registered
    fn rotate(&self) -> Result<KeyId, KeyError>;

    /// Key used for new signatures.
    ///
    /// # Errors
    /// * `NoKeyAvailable` - No key has been rotated in yet
    fn current(&self) -> Result<Arc<SigningKey>, KeyError>;

    /// Resolve a key by identifier.
    ///
    /// # Errors
    /// * `UnknownKey` - No key with this identifier is registered
    fn lookup(&self, id: &str) -> Result<Arc<SigningKey>, KeyError>;
}

#[derive(Default)]
struct RegistryState {
    keys: HashMap<KeyId, Arc<SigningKey>>,
    current: Option<KeyId>,
}

/// Process-local key registry.
///
/// Keys and the current pointer live behind one lock, so a reader either sees
/// the registry before a rotation or after it, never a current identifier
/// whose key is not yet inserted. Superseded keys are kept until the process
/// exits.
pub struct InMemoryKeyRegistry<G = UuidKeyIdGenerator, R = OsRandomSource>
where
    G: KeyIdGenerator,
    R: RandomSource,
{
    state: RwLock<RegistryState>,
    id_generator: G,
    random: R,
}

impl InMemoryKeyRegistry {
    /// Create an empty registry backed by UUID identifiers and the OS CSPRNG.
    pub fn new() -> Self {
        Self::with_collaborators(UuidKeyIdGenerator, OsRandomSource)
    }
}

impl Default for InMemoryKeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, R> InMemoryKeyRegistry<G, R>
where
    G: KeyIdGenerator,
    R: RandomSource,
{
    /// Create an empty registry with injected collaborators.
    ///
    /// # Arguments
    /// * `id_generator` - Source of unique key identifiers
    /// * `random` - Source of key material
    pub fn with_collaborators(id_generator: G, random: R) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            id_generator,
            random,
        }
    }

    /// Number of keys held, current one included.
    pub fn len(&self) -> usize {
        self.state.read().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().keys.is_empty()
    }

    /// Identifier of the current key, if any.
    pub fn current_id(&self) -> Option<KeyId> {
        self.state.read().current.clone()
    }

    /// All registered identifiers, sorted.
    ///
    /// Used by retention policies to decide which keys can be retired.
    pub fn key_ids(&self) -> Vec<KeyId> {
        let mut ids: Vec<KeyId> = self.state.read().keys.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl<G, R> KeyRegistry for InMemoryKeyRegistry<G, R>
where
    G: KeyIdGenerator,
    R: RandomSource,
{
    fn rotate(&self) -> Result<KeyId, KeyError> {
        let mut secret = Zeroizing::new([0u8; SECRET_LENGTH]);
        self.random.fill(secret.as_mut_slice()).map_err(|e| {
            tracing::error!(error = %e, "Failed to generate signing key material");
            e
        })?;

        let id = self.id_generator.generate();
        let key = Arc::new(SigningKey::new(id.clone(), &secret, Utc::now()));

        let retained = {
            let mut state = self.state.write();
            if state.keys.contains_key(&id) {
                tracing::error!(kid = %id, "Generated signing key identifier collides with an existing key");
                return Err(KeyError::IdentifierCollision(id));
            }
            state.keys.insert(id.clone(), key);
            state.current = Some(id.clone());
            state.keys.len()
        };

        tracing::info!(kid = %id, retained_keys = retained, "Signing key rotated");

        Ok(id)
    }

    fn current(&self) -> Result<Arc<SigningKey>, KeyError> {
        let state = self.state.read();
        state
            .current
            .as_ref()
            .and_then(|id| state.keys.get(id))
            .cloned()
            .ok_or(KeyError::NoKeyAvailable)
    }

    fn lookup(&self, id: &str) -> Result<Arc<SigningKey>, KeyError> {
        self.state
            .read()
            .keys
            .get(id)
            .cloned()
            .ok_or_else(|| KeyError::UnknownKey(id.to_string()))
    }
}
