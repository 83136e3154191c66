//! Server configuration.

use thiserror::Error;

/// Default capacity of each connection's outbound buffer
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Configuration errors detected before the server starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("port is required")]
    PortRequired,

    #[error("secret is required")]
    JwtSecretRequired,

    #[error("database is required")]
    DatabaseUrlRequired,

    #[error("outbound buffer must hold at least one message")]
    OutboundBufferTooSmall,
}

/// Settings for the HTTP listener and the hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Secret used by the token validation layer in front of the API
    pub jwt_secret: String,
    /// Connection string of the relational store behind the REST API
    pub database_url: String,
    /// Messages buffered per client before it is treated as stalled
    pub outbound_buffer: usize,
}

impl ServerConfig {
    /// Check the settings the server cannot run without.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::PortRequired);
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::JwtSecretRequired);
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::DatabaseUrlRequired);
        }
        if self.outbound_buffer == 0 {
            return Err(ConfigError::OutboundBufferTooSmall);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
