//! Common error types for token issuance and validation.
//!
//! This crate provides the error taxonomy shared by the auth library and
//! the HTTP service. Internal variants stay distinguishable for logging and
//! tests, while [`ErrorResponse`] collapses every validation failure into a
//! single client-facing shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Authentication-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Subject must not be empty")]
    InvalidSubject,

    #[error("Role must not be empty")]
    InvalidRole,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token signature mismatch")]
    SignatureMismatch,

    #[error("Token issuer mismatch")]
    IssuerMismatch,

    #[error("Token audience mismatch")]
    AudienceMismatch,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token missing required claim '{0}'")]
    MissingClaim(&'static str),

    #[error("Token creation failed")]
    TokenCreationFailed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,
}

impl AuthError {
    /// Whether this error is the outcome of presenting a bad token.
    ///
    /// These are expected runtime results: the caller has to re-authenticate,
    /// and nothing about the specific reason is reported back to it.
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::SignatureMismatch
                | AuthError::IssuerMismatch
                | AuthError::AudienceMismatch
                | AuthError::TokenExpired
                | AuthError::TokenNotYetValid
                | AuthError::MissingClaim(_)
                | AuthError::Unauthorized
        )
    }

    /// Stable, low-cardinality label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidSubject => "invalid_subject",
            AuthError::InvalidRole => "invalid_role",
            AuthError::MalformedToken => "malformed",
            AuthError::SignatureMismatch => "signature_mismatch",
            AuthError::IssuerMismatch => "issuer_mismatch",
            AuthError::AudienceMismatch => "audience_mismatch",
            AuthError::TokenExpired => "expired",
            AuthError::TokenNotYetValid => "not_yet_valid",
            AuthError::MissingClaim(_) => "missing_claim",
            AuthError::TokenCreationFailed => "creation_failed",
            AuthError::Unauthorized => "unauthorized",
            AuthError::Forbidden => "forbidden",
        }
    }
}

/// Start-up configuration errors. These abort the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} not found in configuration")]
    Missing(String),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        if err.is_validation_failure() {
            return Self::new("AUTH_UNAUTHORIZED", "Unauthorized");
        }
        let (code, message) = match err {
            AuthError::InvalidSubject | AuthError::InvalidRole => {
                ("AUTH_INVALID_REQUEST", "Please enter your credentials")
            }
            AuthError::Forbidden => ("AUTH_FORBIDDEN", "Access forbidden"),
            _ => ("AUTH_TOKEN_CREATION_FAILED", "Failed to create token"),
        };
        Self::new(code, message)
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        Self::from(&err)
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Auth(auth) => Self::from(auth),
            AppError::Validation(message) => Self::new("VALIDATION_FAILED", message.clone()),
            AppError::Config(_) => Self::new("INTERNAL_ERROR", "Internal server error"),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failures_share_one_response() {
        let failures = [
            AuthError::MalformedToken,
            AuthError::SignatureMismatch,
            AuthError::IssuerMismatch,
            AuthError::AudienceMismatch,
            AuthError::TokenExpired,
            AuthError::TokenNotYetValid,
            AuthError::MissingClaim("role"),
        ];

        for failure in failures {
            assert!(failure.is_validation_failure(), "{failure:?}");
            let response = ErrorResponse::from(failure);
            assert_eq!(response.code, "AUTH_UNAUTHORIZED");
            assert_eq!(response.message, "Unauthorized");
            assert!(response.details.is_none());
        }
    }

    #[test]
    fn test_forbidden_is_not_a_validation_failure() {
        assert!(!AuthError::Forbidden.is_validation_failure());
        assert_eq!(ErrorResponse::from(AuthError::Forbidden).code, "AUTH_FORBIDDEN");
    }

    #[test]
    fn test_internal_errors_do_not_leak() {
        let err = AppError::Config(ConfigError::Missing("Jwt:Key".to_string()));
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "INTERNAL_ERROR");
        assert!(!response.message.contains("Jwt:Key"));
    }

    #[test]
    fn test_request_and_issuance_errors_keep_their_codes() {
        for (err, code) in [
            (AuthError::InvalidSubject, "AUTH_INVALID_REQUEST"),
            (AuthError::InvalidRole, "AUTH_INVALID_REQUEST"),
            (AuthError::TokenCreationFailed, "AUTH_TOKEN_CREATION_FAILED"),
        ] {
            assert!(!err.is_validation_failure(), "{err:?}");
            assert_eq!(ErrorResponse::from(&err).code, code);
        }
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::Missing("Jwt:Issuer".to_string()).to_string(),
            "Jwt:Issuer not found in configuration"
        );
        assert_eq!(
            ConfigError::invalid("Jwt:ExpiryMinutes", "must be positive").to_string(),
            "invalid value for Jwt:ExpiryMinutes: must be positive"
        );
    }

    #[test]
    fn test_error_response_skips_empty_details() {
        let body = serde_json::to_value(ErrorResponse::new("X", "y")).unwrap();
        assert!(body.get("details").is_none());

        let body = serde_json::to_value(ErrorResponse::new("X", "y").with_details("z")).unwrap();
        assert_eq!(body["details"], "z");
    }
}
