use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error::{AppError, AuthError, ErrorResponse};

/// Error returned from HTTP handlers.
///
/// Every token validation failure maps to the same 401 body, so clients
/// cannot tell an expired token from a forged one.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::Auth(err) if err.is_validation_failure() => StatusCode::UNAUTHORIZED,
            AppError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            AppError::Auth(AuthError::InvalidSubject | AuthError::InvalidRole) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(AppError::Auth(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}
