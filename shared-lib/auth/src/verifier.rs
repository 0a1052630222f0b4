//! Token validation.

use std::fmt;
use std::sync::Arc;

use error::{AuthError, ConfigError};
use serde_json::Value;

use crate::claims::{ClaimSet, AUDIENCE, EXPIRES_AT, ISSUER, NOT_BEFORE, ROLE, SUBJECT};
use crate::clock::Clock;
use crate::config::JwtConfig;
use crate::jwt::{decode_token, signing_key, HmacSha256};

/// Checks signature, issuer, audience and lifetime of presented tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    config: Arc<JwtConfig>,
    key: HmacSha256,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(config: Arc<JwtConfig>, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let key = signing_key(&config.secret)?;
        Ok(Self { config, key, clock })
    }

    /// Validate `token` and return its claims.
    ///
    /// Expiry has no leeway: a token is accepted only while `now < exp`,
    /// compared in whole seconds.
    pub fn validate(&self, token: &str) -> Result<ClaimSet, AuthError> {
        let result = decode_token(token, &self.key).and_then(|claims| self.check_claims(claims));

        match &result {
            Ok(claims) => tracing::debug!(
                subject = claims.subject().unwrap_or_default(),
                jti = claims.token_id().unwrap_or_default(),
                "Validated session token"
            ),
            Err(err) => tracing::warn!(kind = err.kind(), "Rejected session token: {}", err),
        }

        result
    }

    fn check_claims(&self, claims: ClaimSet) -> Result<ClaimSet, AuthError> {
        if required_str(&claims, ISSUER)? != self.config.issuer {
            return Err(AuthError::IssuerMismatch);
        }
        self.check_audience(&claims)?;

        let now = self.clock.now().timestamp();
        let exp = required_date(&claims, EXPIRES_AT)?;
        if now >= exp {
            return Err(AuthError::TokenExpired);
        }
        if claims.contains(NOT_BEFORE) {
            let nbf = required_date(&claims, NOT_BEFORE)?;
            if now < nbf {
                return Err(AuthError::TokenNotYetValid);
            }
        }

        for name in [SUBJECT, ROLE] {
            if required_str(&claims, name)?.trim().is_empty() {
                return Err(AuthError::MissingClaim(name));
            }
        }

        Ok(claims)
    }

    fn check_audience(&self, claims: &ClaimSet) -> Result<(), AuthError> {
        let expected = self.config.audience.as_str();
        let matches = match claims.get(AUDIENCE) {
            None => return Err(AuthError::MissingClaim(AUDIENCE)),
            Some(Value::String(aud)) => aud == expected,
            Some(Value::Array(items)) => {
                let mut found = false;
                for item in items {
                    match item.as_str() {
                        Some(aud) => found |= aud == expected,
                        None => return Err(AuthError::MalformedToken),
                    }
                }
                found
            }
            Some(_) => return Err(AuthError::MalformedToken),
        };

        if matches {
            Ok(())
        } else {
            Err(AuthError::AudienceMismatch)
        }
    }
}

fn required_str<'a>(claims: &'a ClaimSet, name: &'static str) -> Result<&'a str, AuthError> {
    match claims.get(name) {
        None => Err(AuthError::MissingClaim(name)),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(AuthError::MalformedToken),
    }
}

fn required_date(claims: &ClaimSet, name: &'static str) -> Result<i64, AuthError> {
    match claims.get(name) {
        None => Err(AuthError::MissingClaim(name)),
        Some(_) => claims.numeric_date(name).ok_or(AuthError::MalformedToken),
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
