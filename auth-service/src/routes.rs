use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        // Token issuance
        .route("/api/auth/login", post(handlers::login))
        // Bearer-protected actions
        .route("/api/auth/protecteduser", get(handlers::protected_user))
        .route("/api/auth/protectedadmin", get(handlers::protected_admin))
        .route(
            "/api/auth/protectedsuperuser",
            get(handlers::protected_superuser),
        )
        // Health check
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
