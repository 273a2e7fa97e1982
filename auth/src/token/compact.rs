//! Compact `header.payload.signature` serialization.
//!
//! Segments are base64url without padding and the signature covers the
//! ASCII `header "." payload` prefix, as in JWS compact serialization.

use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use serde::Deserialize;

use super::errors::TokenError;
use crate::keys::KeyId;

/// The only algorithm tokens are signed or accepted with.
pub const ALGORITHM: Algorithm = Algorithm::HS512;

/// Encode the header for a token signed with `kid`.
pub(crate) fn encode_header(kid: &KeyId) -> Result<String, TokenError> {
    let mut header = Header::new(ALGORITHM);
    header.kid = Some(kid.to_string());

    let json = serde_json::to_vec(&header).map_err(|e| TokenError::Serialization(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub(crate) fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Header fields read before the signature is checked.
///
/// A foreign algorithm or a missing `kid` must surface as its own rejection,
/// not as a decode failure, so `alg` stays a raw string and `kid` any JSON value.
#[derive(Debug, Deserialize)]
struct UntrustedHeader {
    alg: String,
    #[serde(default)]
    kid: Option<serde_json::Value>,
}

/// A token split into its segments, nothing verified yet.
#[derive(Debug)]
pub(crate) struct ParsedToken<'a> {
    signing_input: &'a str,
    header: UntrustedHeader,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl<'a> ParsedToken<'a> {
    /// # Errors
    /// * `Malformed` - Not exactly three segments, or a segment fails to decode
    pub(crate) fn parse(token: &'a str) -> Result<Self, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed(
                "token must have 3 parts separated by dots".to_string(),
            ));
        };

        let header_bytes = decode_segment("header", header)?;
        let untrusted: UntrustedHeader = serde_json::from_slice(&header_bytes)
            .map_err(|e| TokenError::Malformed(format!("invalid header: {}", e)))?;

        Ok(Self {
            signing_input: &token[..header.len() + 1 + payload.len()],
            header: untrusted,
            payload: decode_segment("payload", payload)?,
            signature: decode_segment("signature", signature)?,
        })
    }

    /// Reject any algorithm other than [`ALGORITHM`].
    pub(crate) fn check_algorithm(&self) -> Result<(), TokenError> {
        match Algorithm::from_str(&self.header.alg) {
            Ok(algorithm) if algorithm == ALGORITHM => Ok(()),
            _ => Err(TokenError::UnsupportedAlgorithm(self.header.alg.clone())),
        }
    }

    /// Key identifier from the header; non-string or empty values count as absent.
    pub(crate) fn key_id(&self) -> Result<&str, TokenError> {
        self.header
            .kid
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|kid| !kid.is_empty())
            .ok_or(TokenError::MissingKeyId)
    }

    pub(crate) fn signing_input(&self) -> &[u8] {
        self.signing_input.as_bytes()
    }

    pub(crate) fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub(crate) fn payload(&self) -> &[u8] {
        &self.payload
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("failed to decode {}: {}", name, e)))
}
