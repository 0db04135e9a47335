use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

// ============================================================================
// Configuration - read once from the environment at startup
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` runs the service on the seeded in-memory store
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub connect_attempts: u32,
    pub run_migrations: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: try_load(&lookup, "DB_MAX_CONNECTIONS", 5)?,
                acquire_timeout: Duration::from_secs(try_load(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
                connect_attempts: try_load(&lookup, "DB_CONNECT_ATTEMPTS", 3)?,
                run_migrations: try_load(&lookup, "RUN_MIGRATIONS", true)?,
            }),
            None => {
                warn!("DATABASE_URL not set, serving the in-memory demo store");
                None
            }
        };

        Ok(Self {
            host: try_load(&lookup, "SERVER_HOST", "0.0.0.0".to_string())?,
            port: try_load(&lookup, "SERVER_PORT", 2022)?,
            database,
        })
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
