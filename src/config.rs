//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup; every variable has a default.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL, DEFAULT_LEADERBOARD_SYNC_CRON,
    DEFAULT_LEADERBOARD_TOP_K, DEFAULT_NATS_URL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, LEADERBOARD_NAMESPACE,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub nats: NatsConfig,
    pub leaderboard: LeaderboardConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration (cache and leaderboard index)
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// NATS configuration (executor message bus)
#[derive(Debug, Clone)]
pub struct NatsConfig {
    pub url: String,
}

/// Leaderboard index configuration
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    pub namespace: String,
    pub top_k: usize,
    pub sync_cron: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            nats: NatsConfig::from_env()?,
            leaderboard: LeaderboardConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
        })
    }
}

impl NatsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("NATS_URL").unwrap_or_else(|_| DEFAULT_NATS_URL.to_string()),
        })
    }
}

impl LeaderboardConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            namespace: env::var("LEADERBOARD_NAMESPACE")
                .unwrap_or_else(|_| LEADERBOARD_NAMESPACE.to_string()),
            top_k: env::var("LEADERBOARD_TOP_K")
                .unwrap_or_else(|_| DEFAULT_LEADERBOARD_TOP_K.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LEADERBOARD_TOP_K".to_string()))?,
            sync_cron: env::var("LEADERBOARD_SYNC_CRON")
                .unwrap_or_else(|_| DEFAULT_LEADERBOARD_SYNC_CRON.to_string()),
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 50055);
    }

    #[test]
    fn test_leaderboard_defaults() {
        let lb = LeaderboardConfig {
            namespace: LEADERBOARD_NAMESPACE.to_string(),
            top_k: DEFAULT_LEADERBOARD_TOP_K,
            sync_cron: DEFAULT_LEADERBOARD_SYNC_CRON.to_string(),
        };
        assert_eq!(lb.namespace, "problems_leaderboard");
        assert_eq!(lb.top_k, 10);
    }
}
