//! HTTP handlers for login and the role-protected actions.

use auth::{ROLE_ADMIN, ROLE_MEMBER, ROLE_SUPER_USER};
use axum::extract::State;
use axum::Json;
use error::AppError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AuthContext;
use crate::AppState;

/// Login request body. Both fields are optional so that absence can be
/// reported as a bad request rather than a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/auth/login
///
/// There is no user store: any non-empty username/password pair is
/// accepted. The role is fixed here and never taken from the request.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let username = match (&request.username, &request.password) {
        (Some(username), Some(password))
            if !username.trim().is_empty() && !password.expose_secret().is_empty() =>
        {
            username
        }
        _ => {
            return Err(AppError::Validation("Please enter your credentials".to_string()).into());
        }
    };

    let token = state.tokens.generate(username, Some(ROLE_MEMBER))?;
    tracing::info!(username = %username, role = ROLE_MEMBER, "Issued session token");

    Ok(Json(TokenResponse { token }))
}

/// GET /api/auth/protecteduser
pub async fn protected_user(_auth: AuthContext) -> &'static str {
    "protected user action"
}

/// GET /api/auth/protectedadmin
pub async fn protected_admin(auth: AuthContext) -> Result<&'static str, ApiError> {
    auth.require_role(&[ROLE_ADMIN])?;
    Ok("protected admin action")
}

/// GET /api/auth/protectedsuperuser
pub async fn protected_superuser(auth: AuthContext) -> Result<&'static str, ApiError> {
    auth.require_role(&[ROLE_SUPER_USER])?;
    Ok("protected superuser action")
}

pub async fn health_check() -> &'static str {
    "OK"
}
