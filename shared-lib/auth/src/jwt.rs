//! JWT encoding and decoding utilities.
//!
//! Tokens use the compact form `header.payload.signature`: three base64url
//! segments signed with HMAC-SHA256 under a `{"alg":"HS256","typ":"JWT"}`
//! header.

use error::{AuthError, ConfigError};
use hmac::{Hmac, Mac};
use jwt::header::HeaderType;
use jwt::{AlgorithmType, FromBase64, Header, SignWithKey, Token, VerifyingAlgorithm};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::claims::ClaimSet;
use crate::config;

pub type HmacSha256 = Hmac<Sha256>;

/// Build the HMAC key from the configured secret.
pub fn signing_key(secret: &SecretString) -> Result<HmacSha256, ConfigError> {
    HmacSha256::new_from_slice(secret.expose_secret().as_bytes()).map_err(|e| {
        tracing::error!("Failed to create HMAC key: {}", e);
        ConfigError::invalid(config::KEY, e.to_string())
    })
}

/// Encode claims into a signed JWT.
pub fn encode_token(claims: &ClaimSet, key: &HmacSha256) -> Result<String, AuthError> {
    let header = Header {
        algorithm: AlgorithmType::Hs256,
        type_: Some(HeaderType::JsonWebToken),
        ..Default::default()
    };

    let token = Token::new(header, claims).sign_with_key(key).map_err(|e| {
        tracing::error!("Failed to encode JWT: {}", e);
        AuthError::TokenCreationFailed
    })?;

    Ok(token.as_str().to_owned())
}

/// Decode a JWT and verify its signature.
///
/// Only structure and signature are checked here. The MAC is verified in
/// constant time over the raw `header.payload` segments before either of
/// them is decoded. Claim checks belong to
/// [`TokenVerifier`](crate::TokenVerifier).
pub fn decode_token(token: &str, key: &HmacSha256) -> Result<ClaimSet, AuthError> {
    let mut segments = token.split('.');
    let (header, payload, signature) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(payload), Some(signature), None) => (header, payload, signature),
        _ => {
            tracing::debug!("JWT does not have three segments");
            return Err(AuthError::MalformedToken);
        }
    };

    match VerifyingAlgorithm::verify(key, header, payload, signature) {
        Ok(true) => {}
        Ok(false) | Err(jwt::Error::InvalidSignature | jwt::Error::RustCryptoMac(_)) => {
            tracing::debug!("JWT signature rejected");
            return Err(AuthError::SignatureMismatch);
        }
        Err(e) => {
            tracing::debug!("Failed to decode JWT signature: {}", e);
            return Err(AuthError::MalformedToken);
        }
    }

    let header = Header::from_base64(header).map_err(|e| {
        tracing::debug!("Failed to decode JWT header: {}", e);
        AuthError::MalformedToken
    })?;
    if header.algorithm != AlgorithmType::Hs256 {
        tracing::debug!("JWT algorithm rejected: {:?}", header.algorithm);
        return Err(AuthError::SignatureMismatch);
    }

    ClaimSet::from_base64(payload).map_err(|e| {
        tracing::debug!("Failed to decode JWT claims: {}", e);
        AuthError::MalformedToken
    })
}
