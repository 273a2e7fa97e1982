pub mod claims;
pub mod compact;
pub mod errors;
pub mod issuer;
pub mod verifier;

pub use claims::ClaimsExtension;
pub use claims::StandardClaims;
pub use claims::UserClaims;
pub use compact::ALGORITHM;
pub use errors::TokenError;
pub use issuer::TokenIssuer;
pub use verifier::TokenVerifier;
