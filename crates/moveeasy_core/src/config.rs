//! Runtime configuration for storage and logging.
//!
//! Environment variables:
//! - `MOVEEASY_DB_PATH`: database file path (required by [`DbConfig::from_env`])
//! - `MOVEEASY_POOL_MAX`: maximum pool size (default: 8)
//! - `MOVEEASY_POOL_MIN_IDLE`: idle connections kept warm (default: 1)
//! - `MOVEEASY_CONN_TIMEOUT_SEC`: pool checkout timeout in seconds (default: 5)
//! - `MOVEEASY_BUSY_TIMEOUT_MS`: SQLite busy timeout in milliseconds (default: 5000)
//! - `MOVEEASY_LIST_TIMEOUT_MS`: deadline span for bounded list reads (default: 2000)
//! - `MOVEEASY_LOG_LEVEL`: trace|debug|info|warn|error (default: by build mode)
//! - `MOVEEASY_LOG_DIR`: absolute log directory; logging stays off when unset

use crate::logging::default_log_level;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Storage configuration consumed by [`crate::db::Database::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// SQLite database file.
    pub path: PathBuf,
    /// Maximum number of pooled connections.
    pub max_pool_size: u32,
    /// Idle connections the pool tries to keep open.
    pub min_idle: u32,
    /// How long a checkout may wait for a free connection. Zero is read as one
    /// second.
    pub connection_timeout_sec: u64,
    /// How long a statement waits on a locked database.
    pub busy_timeout_ms: u64,
    /// Deadline span applied by services to bounded list reads.
    pub list_timeout_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("moveeasy.db"),
            max_pool_size: 8,
            min_idle: 1,
            connection_timeout_sec: 5,
            busy_timeout_ms: 5_000,
            list_timeout_ms: 2_000,
        }
    }
}

impl DbConfig {
    /// Creates configuration from environment variables.
    ///
    /// Unparsable numeric values fall back to their defaults.
    pub fn from_env() -> Result<Self, String> {
        let path = std::env::var("MOVEEASY_DB_PATH")
            .map_err(|_| "MOVEEASY_DB_PATH must be set".to_string())?;
        let defaults = Self::default();

        Ok(Self {
            path: PathBuf::from(path),
            max_pool_size: env_or("MOVEEASY_POOL_MAX", defaults.max_pool_size),
            min_idle: env_or("MOVEEASY_POOL_MIN_IDLE", defaults.min_idle),
            connection_timeout_sec: env_or(
                "MOVEEASY_CONN_TIMEOUT_SEC",
                defaults.connection_timeout_sec,
            ),
            busy_timeout_ms: env_or("MOVEEASY_BUSY_TIMEOUT_MS", defaults.busy_timeout_ms),
            list_timeout_ms: env_or("MOVEEASY_LIST_TIMEOUT_MS", defaults.list_timeout_ms),
        })
    }

    /// Creates a configuration for `path` with default pool settings.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Pool checkout timeout, never shorter than one second.
    pub fn checkout_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_sec.max(1))
    }

    /// Deadline span for bounded list reads.
    pub fn list_timeout(&self) -> Duration {
        Duration::from_millis(self.list_timeout_ms)
    }
}

/// Logging configuration for binaries embedding the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// `None` disables file logging.
    pub log_dir: Option<String>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("MOVEEASY_LOG_LEVEL")
                .unwrap_or_else(|_| default_log_level().to_string()),
            log_dir: std::env::var("MOVEEASY_LOG_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty()),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}
