//! Session authentication library
//!
//! Issues and verifies signed session tokens under rotating symmetric keys:
//! - Password hashing (Argon2id)
//! - Signing key registry with rotation
//! - HMAC-SHA512 message authentication
//! - Session token issuance and verification
//! - Authentication coordination
//!
//! Tokens carry the identifier of the key that signed them, so rotating the
//! key never invalidates tokens issued earlier as long as their key is still
//! registered.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use session_auth::{PasswordError, PasswordHasher};
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! assert_eq!(hasher.verify("other", &hash), Err(PasswordError::Mismatch));
//! ```
//!
//! ## Session Tokens
//! ```
//! use session_auth::{InMemoryKeyRegistry, KeyRegistry, TokenIssuer, TokenVerifier, UserClaims};
//!
//! let registry = InMemoryKeyRegistry::new();
//! registry.rotate().unwrap();
//!
//! let claims = UserClaims::for_session(42, chrono::Duration::hours(1)).unwrap();
//! let token = TokenIssuer::new().issue(&claims, &registry).unwrap();
//!
//! registry.rotate().unwrap();
//!
//! let decoded = TokenVerifier::new().verify(&token, &registry).unwrap();
//! assert_eq!(decoded, claims);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::sync::Arc;
//!
//! use session_auth::{Authenticator, InMemoryKeyRegistry};
//!
//! let auth = Authenticator::new(Arc::new(InMemoryKeyRegistry::new()));
//! auth.rotate_key().unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let claims = auth.session_claims(7).unwrap();
//! let result = auth.authenticate("password123", &hash, claims).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.session_id, 7);
//! ```

pub mod authenticator;
pub mod config;
pub mod error;
pub mod keys;
pub mod mac;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use config::Config;
pub use error::ErrorClass;
pub use keys::InMemoryKeyRegistry;
pub use keys::KeyError;
pub use keys::KeyId;
pub use keys::KeyRegistry;
pub use keys::SigningKey;
pub use mac::MessageAuthenticator;
pub use password::HashedPassword;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenError;
pub use token::TokenIssuer;
pub use token::TokenVerifier;
pub use token::UserClaims;
