//! Token service: issuance and validation behind one capability.

use std::sync::Arc;

use error::{AuthError, ConfigError};

use crate::claims::ClaimSet;
use crate::clock::{Clock, SystemClock};
use crate::config::JwtConfig;
use crate::issuer::TokenIssuer;
use crate::verifier::TokenVerifier;

/// Issue and validate session tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for `subject`. `None` selects the configured default role.
    fn generate(&self, subject: &str, role: Option<&str>) -> Result<String, AuthError>;

    /// Validate a presented token and return its claims.
    fn validate(&self, token: &str) -> Result<ClaimSet, AuthError>;
}

/// HS256 token service sharing one configuration and clock.
#[derive(Debug, Clone)]
pub struct JwtTokenService {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl JwtTokenService {
    /// Create a service reading the wall clock.
    pub fn new(config: JwtConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a service reading time from `clock`.
    pub fn with_clock(config: JwtConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        let config = Arc::new(config);
        Ok(Self {
            issuer: TokenIssuer::new(Arc::clone(&config), Arc::clone(&clock))?,
            verifier: TokenVerifier::new(config, clock)?,
        })
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }
}

impl TokenService for JwtTokenService {
    fn generate(&self, subject: &str, role: Option<&str>) -> Result<String, AuthError> {
        self.issuer.generate(subject, role)
    }

    fn validate(&self, token: &str) -> Result<ClaimSet, AuthError> {
        self.verifier.validate(token)
    }
}
