//! User service configuration.

use std::env;
use std::str::FromStr;

use common::{DatabaseConfig, HasherConfig};

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Password hashing cost
    pub hasher: HasherConfig,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Per-operation deadline in seconds (0 disables it)
    pub request_timeout_secs: u64,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database: DatabaseConfig {
                url: env::var("USER_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: env_or(
                    "USER_SERVICE_DB_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                ),
                min_connections: env_or(
                    "USER_SERVICE_DB_MIN_CONNECTIONS",
                    defaults.database.min_connections,
                ),
            },
            hasher: HasherConfig {
                time_cost: env_or("USER_SERVICE_HASH_TIME_COST", defaults.hasher.time_cost),
                memory_kib: env_or("USER_SERVICE_HASH_MEMORY_KIB", defaults.hasher.memory_kib),
                parallelism: env_or("USER_SERVICE_HASH_PARALLELISM", defaults.hasher.parallelism),
            },
            host: env::var("USER_SERVICE_HOST").unwrap_or(defaults.host),
            port: env_or("USER_SERVICE_PORT", defaults.port),
            request_timeout_secs: env_or(
                "USER_SERVICE_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
        }
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            hasher: HasherConfig::default(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 60,
        }
    }
}

/// Parse an env var, falling back when missing or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
