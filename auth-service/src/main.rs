use std::sync::Arc;

use auth::JwtTokenService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_service::{build_routes, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; anything missing aborts start-up
    let config = ServiceConfig::from_env().inspect_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
    })?;
    tracing::info!("Starting Auth Service v{}", config.version);

    let tokens = JwtTokenService::new(config.jwt.clone())?;
    let state = AppState::new(Arc::new(tokens));

    // Parse address
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, build_routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Auth Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
