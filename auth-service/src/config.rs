use std::net::SocketAddr;

use auth::JwtConfig;
use error::ConfigError;

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen address
    pub http_addr: String,

    /// Token signing and validation settings
    pub jwt: JwtConfig,

    /// Service version
    pub version: String,
}

impl ServiceConfig {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            jwt,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Missing `Jwt__*` settings are fatal; `HTTP_ADDR` is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(JwtConfig::from_env()?);

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            config.http_addr = addr;
        }

        Ok(config)
    }

    /// Parse the listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.http_addr
            .parse()
            .map_err(|e| ConfigError::invalid("HTTP_ADDR", format!("{}: {}", self.http_addr, e)))
    }
}
