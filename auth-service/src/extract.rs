use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;

use auth::{ensure_role, AuthError, ClaimSet};

use crate::error::ApiError;
use crate::AppState;

/// Claims of the bearer token presented with the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: ClaimSet,
}

impl AuthContext {
    /// Reject unless the token's role is one of `allowed`.
    pub fn require_role(&self, allowed: &[&str]) -> Result<(), ApiError> {
        ensure_role(&self.claims, allowed).map_err(ApiError::from)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::Unauthorized)?;
        let token = parse_bearer(header)?;
        let claims = state.tokens.validate(token)?;

        Ok(Self { claims })
    }
}

fn parse_bearer(value: &HeaderValue) -> Result<&str, AuthError> {
    let raw = value.to_str().map_err(|_| AuthError::Unauthorized)?.trim();
    let (scheme, token) = raw.split_once(' ').ok_or(AuthError::Unauthorized)?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    Ok(token)
}
