use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::config::TokenConfig;
use crate::error::ErrorClass;
use crate::keys::KeyError;
use crate::keys::KeyId;
use crate::keys::KeyRegistry;
use crate::password::HashedPassword;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::TokenError;
use crate::token::TokenIssuer;
use crate::token::TokenVerifier;
use crate::token::UserClaims;

/// Authentication coordinator combining password verification and session tokens.
///
/// Owns a handle to the key registry it signs with, so issuing, verifying and
/// rotating all see the same keys.
pub struct Authenticator<R: KeyRegistry + ?Sized> {
    password_hasher: PasswordHasher,
    registry: Arc<R>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    token_config: TokenConfig,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
    /// Claims embedded in the token
    pub claims: UserClaims,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl AuthenticationError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AuthenticationError::InvalidCredentials => ErrorClass::Rejected,
            AuthenticationError::PasswordError(e) => e.class(),
            AuthenticationError::TokenError(e) => e.class(),
            AuthenticationError::InvalidConfiguration(_) => ErrorClass::Infrastructure,
        }
    }
}

impl<R: KeyRegistry + ?Sized> Authenticator<R> {
    /// Create an authenticator with default configuration.
    ///
    /// # Arguments
    /// * `registry` - Signing key registry shared with other components
    pub fn new(registry: Arc<R>) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            registry,
            issuer: TokenIssuer::new(),
            verifier: TokenVerifier::new(),
            token_config: TokenConfig::default(),
        }
    }

    /// Create an authenticator from loaded configuration.
    ///
    /// # Errors
    /// * `PasswordError` - Configured password work factor is out of bounds
    /// * `InvalidConfiguration` - Configured session lifetime is unusable
    pub fn from_config(config: &Config, registry: Arc<R>) -> Result<Self, AuthenticationError> {
        config
            .token
            .session_ttl()
            .map_err(|e| AuthenticationError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            password_hasher: PasswordHasher::from_config(&config.password)?,
            registry,
            issuer: TokenIssuer::new(),
            verifier: TokenVerifier::new(),
            token_config: config.token.clone(),
        })
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<HashedPassword, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Claims for a new session using the configured lifetime and issuer.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Configured lifetime cannot be added to the current time
    pub fn session_claims(&self, session_id: i64) -> Result<UserClaims, TokenError> {
        let ttl = self
            .token_config
            .session_ttl()
            .map_err(|e| TokenError::InvalidLifetime(e.to_string()))?;
        let claims = UserClaims::for_session(session_id, ttl)?;
        Ok(match &self.token_config.issuer {
            Some(issuer) => claims.with_issuer(issuer),
            None => claims,
        })
    }

    /// Verify credentials and issue a session token.
    ///
    /// Fills in `iss` and `iat` from configuration and the clock when the
    /// caller left them empty.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to sign
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &HashedPassword,
        mut claims: UserClaims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        match self.password_hasher.verify(password, stored_hash) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                tracing::info!(session_id = claims.session_id, "Password mismatch");
                return Err(AuthenticationError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(error = %e, "Password verification failed");
                return Err(e.into());
            }
        }

        if claims.standard.iss.is_none() {
            claims.standard.iss = self.token_config.issuer.clone();
        }
        if claims.standard.iat.is_none() {
            claims.standard.iat = Some(Utc::now().timestamp());
        }

        let access_token = self.issuer.issue(&claims, self.registry.as_ref())?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `TokenError` - Token generation failed
    pub fn generate_token(&self, claims: &UserClaims) -> Result<String, TokenError> {
        self.issuer.issue(claims, self.registry.as_ref())
    }

    /// Validate and decode a session token.
    ///
    /// # Errors
    /// * `TokenError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<UserClaims, TokenError> {
        self.verifier.verify(token, self.registry.as_ref())
    }

    /// Rotate the signing key; tokens issued under older keys stay valid.
    ///
    /// # Errors
    /// * `KeyError` - Key generation failed
    pub fn rotate_key(&self) -> Result<KeyId, KeyError> {
        self.registry.rotate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordConfig;
    use crate::keys::InMemoryKeyRegistry;

    fn test_config() -> Config {
        Config {
            password: PasswordConfig {
                memory_cost_kib: 1024,
                time_cost: 1,
                parallelism: 1,
                max_password_bytes: 128,
            },
            token: TokenConfig {
                session_ttl_seconds: 600,
                issuer: Some("auth-test".to_string()),
            },
        }
    }

    fn authenticator() -> Authenticator<InMemoryKeyRegistry> {
        let authenticator =
            Authenticator::from_config(&test_config(), Arc::new(InMemoryKeyRegistry::new()))
                .unwrap();
        authenticator.rotate_key().unwrap();
        authenticator
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let claims = UserClaims::new(42, Utc::now().timestamp() + 600).with_subject("user123");
        let result = authenticator
            .authenticate(password, &hash, claims)
            .expect("Authentication failed");

        assert_eq!(result.claims.standard.iss.as_deref(), Some("auth-test"));
        assert!(result.claims.standard.iat.is_some());

        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded, result.claims);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate(
            "wrong_password",
            &hash,
            authenticator.session_claims(42).unwrap(),
        );

        let error = result.unwrap_err();
        assert_eq!(error, AuthenticationError::InvalidCredentials);
        assert!(error.class().is_rejection());
    }

    #[test]
    fn test_session_claims_use_config() {
        let authenticator = authenticator();
        let claims = authenticator.session_claims(9).unwrap();

        assert_eq!(claims.session_id, 9);
        assert_eq!(claims.standard.iss.as_deref(), Some("auth-test"));
        assert_eq!(claims.expires_at - claims.standard.iat.unwrap(), 600);
    }

    #[test]
    fn test_from_config_rejects_unusable_session_ttl() {
        for ttl in [i64::MAX, -10, 0] {
            let mut config = test_config();
            config.token.session_ttl_seconds = ttl;

            let result = Authenticator::from_config(&config, Arc::new(InMemoryKeyRegistry::new()));

            let error = result.err().expect("session ttl should be rejected");
            assert!(matches!(error, AuthenticationError::InvalidConfiguration(_)));
            assert!(!error.class().is_rejection());
        }
    }

    #[test]
    fn test_token_survives_rotation() {
        let authenticator = authenticator();
        let token = authenticator
            .generate_token(&authenticator.session_claims(42).unwrap())
            .unwrap();

        authenticator.rotate_key().unwrap();

        assert_eq!(authenticator.validate_token(&token).unwrap().session_id, 42);
        assert_eq!(authenticator.registry().len(), 2);
    }

    #[test]
    fn test_missing_key_is_infrastructure_failure() {
        let authenticator = Authenticator::new(Arc::new(InMemoryKeyRegistry::new()));
        let hash = authenticator.hash_password("pw").unwrap();

        let error = authenticator
            .authenticate("pw", &hash, UserClaims::new(1, i64::MAX))
            .unwrap_err();

        assert_eq!(
            error,
            AuthenticationError::TokenError(TokenError::Key(KeyError::NoKeyAvailable))
        );
        assert!(!error.class().is_rejection());
    }

    #[test]
    fn test_works_with_trait_object_registry() {
        let registry: Arc<dyn KeyRegistry> = Arc::new(InMemoryKeyRegistry::new());
        let authenticator = Authenticator::new(registry);
        authenticator.rotate_key().unwrap();

        let token = authenticator
            .generate_token(&authenticator.session_claims(5).unwrap())
            .unwrap();
        assert_eq!(authenticator.validate_token(&token).unwrap().session_id, 5);
    }
}
