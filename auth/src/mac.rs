//! Keyed message authentication (HMAC-SHA512).
//!
//! The same primitive signs tokens and arbitrary payloads such as webhook
//! bodies.

use hmac::Hmac;
use hmac::Mac;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use crate::keys::KeyError;
use crate::keys::KeyId;
use crate::keys::KeyRegistry;
use crate::keys::SigningKey;

type HmacSha512 = Hmac<Sha512>;

/// Length of a MAC tag in bytes.
pub const MAC_LENGTH: usize = 64;

/// HMAC-SHA512 over byte payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageAuthenticator;

impl MessageAuthenticator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the MAC of `message` under `key`.
    ///
    /// Deterministic for a fixed key and message.
    pub fn sign(&self, message: &[u8], key: &SigningKey) -> Vec<u8> {
        let mut mac =
            HmacSha512::new_from_slice(key.secret()).expect("HMAC can take key of any size");
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }

    /// Check `tag` against the MAC of `message` under `key`.
    ///
    /// Comparison runs in constant time over the tag bytes.
    pub fn verify(&self, message: &[u8], tag: &[u8], key: &SigningKey) -> bool {
        let expected = self.sign(message, key);
        expected.ct_eq(tag).into()
    }

    /// Sign with the registry's current key.
    ///
    /// # Returns
    /// Identifier of the key used, to be sent alongside the tag, and the tag
    ///
    /// # Errors
    /// * `NoKeyAvailable` - Registry has no current key
    pub fn sign_with_current<R>(
        &self,
        registry: &R,
        message: &[u8],
    ) -> Result<(KeyId, Vec<u8>), KeyError>
    where
        R: KeyRegistry + ?Sized,
    {
        let key = registry.current()?;
        Ok((key.id().clone(), self.sign(message, &key)))
    }

    /// Verify a tag produced by [`sign_with_current`](Self::sign_with_current),
    /// possibly under a key that has since been rotated out of "current".
    ///
    /// # Errors
    /// * `UnknownKey` - `kid` is not registered
    pub fn verify_with<R>(
        &self,
        registry: &R,
        kid: &str,
        message: &[u8],
        tag: &[u8],
    ) -> Result<bool, KeyError>
    where
        R: KeyRegistry + ?Sized,
    {
        let key = registry.lookup(kid)?;
        Ok(self.verify(message, tag, &key))
    }
}
