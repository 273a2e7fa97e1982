use std::borrow::Borrow;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use zeroize::ZeroizeOnDrop;

/// Length of a signing key secret in bytes.
pub const SECRET_LENGTH: usize = 64;

/// Opaque, globally unique signing key identifier (`kid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(String);

impl KeyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for KeyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Symmetric signing key.
///
/// The secret is immutable once created, wiped on drop and never exposed
/// outside this crate; callers sign through [`MessageAuthenticator`].
///
/// [`MessageAuthenticator`]: crate::mac::MessageAuthenticator
#[derive(ZeroizeOnDrop)]
pub struct SigningKey {
    #[zeroize(skip)]
    id: KeyId,
    secret: [u8; SECRET_LENGTH],
    #[zeroize(skip)]
    created_at: DateTime<Utc>,
}

impl SigningKey {
    pub(crate) fn new(id: KeyId, secret: &[u8; SECRET_LENGTH], created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            secret: *secret,
            created_at,
        }
    }

    pub fn id(&self) -> &KeyId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}
