//! Process configuration, read once at startup from the environment (and `.env`).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HOST must be an IP address, got {0:?}")]
    InvalidHost(String),

    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("JWT_SECRET must not be empty")]
    EmptySecret,

    #[error("LOG_LEVEL must be one of trace, debug, info, warn, error; got {0:?}")]
    InvalidLogLevel(String),

    #[error("failed to load .env file: {0}")]
    DotEnv(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: String,
    pub log_level: String,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a variable is set to an unusable value or
    /// when an existing `.env` file cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(ConfigError::DotEnv(err.to_string()));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first invalid variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let host: IpAddr = match lookup("HOST") {
            Some(raw) => match raw.trim().parse() {
                Ok(host) => host,
                Err(_) => return Err(ConfigError::InvalidHost(raw)),
            },
            None => DEFAULT_HOST,
        };

        let port = match lookup("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => DEFAULT_PORT,
        };

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());
        if jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let log_level = lookup("LOG_LEVEL")
            .map(|level| level.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(log_level));
        }

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            log_level,
        })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
