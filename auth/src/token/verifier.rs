use chrono::Utc;

use super::claims::UserClaims;
use super::compact::ParsedToken;
use super::errors::TokenError;
use crate::keys::KeyRegistry;
use crate::mac::MessageAuthenticator;

/// Verifies compact session tokens against a key registry.
///
/// Verification is a single pass through
/// parse → algorithm → key → signature → claims decode → claims validation;
/// the first failing step ends it with that step's error.
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier {
    authenticator: MessageAuthenticator,
}

impl TokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// See [`verify_at`](Self::verify_at).
    pub fn verify<R>(&self, token: &str, registry: &R) -> Result<UserClaims, TokenError>
    where
        R: KeyRegistry + ?Sized,
    {
        self.verify_at(token, registry, Utc::now().timestamp())
    }

    /// Verify a token as of `now` (Unix timestamp).
    ///
    /// # Returns
    /// The validated claims
    ///
    /// # Errors
    /// * `Malformed` - Not three segments, or a segment is not valid base64url/JSON header
    /// * `UnsupportedAlgorithm` - Header names any algorithm other than HS512
    /// * `MissingKeyId` - Header has no usable `kid`
    /// * `Key(UnknownKey)` - `kid` is not in the registry
    /// * `InvalidSignature` - MAC does not match
    /// * `Serialization` - Payload is not valid claims
    /// * `Expired` - `exp` is at or before `now`
    /// * `InvalidSession` - Session ID is zero
    pub fn verify_at<R>(
        &self,
        token: &str,
        registry: &R,
        now: i64,
    ) -> Result<UserClaims, TokenError>
    where
        R: KeyRegistry + ?Sized,
    {
        let parsed = ParsedToken::parse(token).map_err(|e| rejected("parse", None, e))?;

        parsed
            .check_algorithm()
            .map_err(|e| rejected("algorithm", None, e))?;

        let kid = parsed.key_id().map_err(|e| rejected("key", None, e))?;
        let key = registry
            .lookup(kid)
            .map_err(|e| rejected("key", Some(kid), e.into()))?;

        if !self
            .authenticator
            .verify(parsed.signing_input(), parsed.signature(), &key)
        {
            return Err(rejected("signature", Some(kid), TokenError::InvalidSignature));
        }

        let claims: UserClaims = serde_json::from_slice(parsed.payload()).map_err(|e| {
            rejected(
                "claims_decode",
                Some(kid),
                TokenError::Serialization(e.to_string()),
            )
        })?;

        claims
            .validate(now)
            .map_err(|e| rejected("claims", Some(kid), e))?;

        Ok(claims)
    }
}

fn rejected(stage: &'static str, kid: Option<&str>, error: TokenError) -> TokenError {
    tracing::warn!(
        stage,
        kid = kid.unwrap_or("-"),
        error = %error,
        "Token rejected"
    );
    error
}
