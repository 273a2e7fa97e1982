use super::claims::UserClaims;
use super::compact::encode_header;
use super::compact::encode_segment;
use super::errors::TokenError;
use crate::keys::KeyRegistry;
use crate::mac::MessageAuthenticator;

/// Produces signed session tokens under the registry's current key.
#[derive(Debug, Clone, Default)]
pub struct TokenIssuer {
    authenticator: MessageAuthenticator,
}

impl TokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign `claims` into a compact token.
    ///
    /// # Arguments
    /// * `claims` - Payload to sign
    /// * `registry` - Source of the current signing key
    ///
    /// # Returns
    /// `header.payload.signature` token whose header names the signing key
    ///
    /// # Errors
    /// * `Key(NoKeyAvailable)` - Registry has no current key
    /// * `Serialization` - Claims could not be encoded
    pub fn issue<R>(&self, claims: &UserClaims, registry: &R) -> Result<String, TokenError>
    where
        R: KeyRegistry + ?Sized,
    {
        let key = registry.current()?;

        let payload =
            serde_json::to_vec(claims).map_err(|e| TokenError::Serialization(e.to_string()))?;
        let signing_input = format!("{}.{}", encode_header(key.id())?, encode_segment(&payload));
        let signature = self.authenticator.sign(signing_input.as_bytes(), &key);

        tracing::debug!(
            kid = %key.id(),
            session_id = claims.session_id,
            expires_at = claims.expires_at,
            "Token issued"
        );

        Ok(format!("{}.{}", signing_input, encode_segment(&signature)))
    }
}
