use std::collections::BTreeMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Registered JWT claims carried through without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardClaims {
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject (user identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// JWT ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Versioned application data attached to a session token.
///
/// A token carrying a version this build does not know fails to decode
/// rather than being accepted with fields silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "v")]
pub enum ClaimsExtension {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
    },
}

/// Session token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    /// Expiration time (Unix timestamp); the token is invalid from this second on.
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Session identifier; zero is never valid.
    #[serde(rename = "SessionID")]
    pub session_id: i64,

    #[serde(flatten)]
    pub standard: StandardClaims,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<ClaimsExtension>,
}

impl UserClaims {
    pub fn new(session_id: i64, expires_at: i64) -> Self {
        Self {
            expires_at,
            session_id,
            standard: StandardClaims::default(),
            ext: None,
        }
    }

    /// Claims for a session starting now.
    ///
    /// # Arguments
    /// * `session_id` - Non-zero session identifier
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with exp and iat set
    ///
    /// # Errors
    /// * `InvalidLifetime` - `ttl` is not positive or pushes `exp` past the representable range
    pub fn for_session(session_id: i64, ttl: Duration) -> Result<Self, TokenError> {
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidLifetime(format!(
                "{}s is not positive",
                ttl.num_seconds()
            )));
        }

        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::InvalidLifetime(format!("{}s overflows the clock", ttl.num_seconds()))
        })?;

        Ok(Self::new(session_id, expires_at.timestamp()).with_issued_at(now.timestamp()))
    }

    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.standard.sub = Some(sub.to_string());
        self
    }

    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.standard.iss = Some(iss.to_string());
        self
    }

    pub fn with_audience(mut self, aud: impl ToString) -> Self {
        self.standard.aud = Some(aud.to_string());
        self
    }

    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.standard.iat = Some(iat);
        self
    }

    pub fn with_token_id(mut self, jti: impl ToString) -> Self {
        self.standard.jti = Some(jti.to_string());
        self
    }

    /// Add an attribute to the current extension, creating it if absent.
    pub fn with_attribute(mut self, key: impl ToString, value: impl ToString) -> Self {
        let ClaimsExtension::V1 { attributes } = self.ext.get_or_insert_with(|| {
            ClaimsExtension::V1 {
                attributes: BTreeMap::new(),
            }
        });
        attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up an extension attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match &self.ext {
            Some(ClaimsExtension::V1 { attributes }) => attributes.get(key).map(String::as_str),
            None => None,
        }
    }

    /// Check if token is expired.
    ///
    /// Expiry is inclusive: a token whose `exp` equals `current_timestamp` is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.expires_at <= current_timestamp
    }

    /// Claim-level validation applied after the signature has been checked.
    ///
    /// # Errors
    /// * `Expired` - `exp` is at or before `current_timestamp`
    /// * `InvalidSession` - Session ID is zero
    pub fn validate(&self, current_timestamp: i64) -> Result<(), TokenError> {
        if self.is_expired(current_timestamp) {
            return Err(TokenError::Expired);
        }

        if self.session_id == 0 {
            return Err(TokenError::InvalidSession);
        }

        Ok(())
    }
}
