//! Auth Service
//!
//! HTTP login and role-protected endpoints backed by signed session tokens.

use std::sync::Arc;

use auth::TokenService;

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use config::ServiceConfig;
pub use extract::AuthContext;
pub use routes::build_routes;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }
}
