//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_level: Level,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    /// Origins allowed by CORS: the patient app and the admin/doctor app.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = required("DATABASE_URL")?;
        let database_max_connections = parsed_or("DATABASE_MAX_CONNECTIONS", 5)?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Token Settings ---
        let jwt_secret = required("JWT_SECRET")?;
        let jwt_expires_in_hours = parsed_or("JWT_EXPIRES_IN_HOURS", 24 * 7)?;
        if jwt_expires_in_hours <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_EXPIRES_IN_HOURS".to_string(),
                "must be positive".to_string(),
            ));
        }

        // --- Load Front-end Origins ---
        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let admin_url =
            std::env::var("ADMIN_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            log_level,
            jwt_secret,
            jwt_expires_in_hours,
            allowed_origins: vec![frontend_url, admin_url],
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn parsed_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
