//! Store configuration.
//!
//! # Responsibility
//! - Describe where the SQLite store lives and how connections are tuned.
//! - Carry logging settings for binaries embedding the core.
//!
//! # Invariants
//! - `db_path = None` means an in-memory store.
//! - `busy_timeout_ms` is never zero after `validate()`.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "TASKBOARD_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "TASKBOARD_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "TASKBOARD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKBOARD_LOG_DIR";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value could not be parsed from its textual source.
    InvalidValue { key: &'static str, value: String },
    /// Busy timeout must be positive.
    ZeroBusyTimeout,
    /// Log directory must be absolute.
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
            Self::ZeroBusyTimeout => write!(f, "busy_timeout_ms must be greater than zero"),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be an absolute path, got `{}`", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Connection and logging settings for one store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file location. `None` opens an in-memory database.
    pub db_path: Option<PathBuf>,
    /// How long SQLite waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Config for an on-disk store with all other settings defaulted.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Builds config from `TASKBOARD_*` environment variables.
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|value| !value.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms =
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_BUSY_TIMEOUT_MS,
                        value: raw.clone(),
                    })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            config.log_level = level.trim().to_ascii_lowercase();
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|value| !value.trim().is_empty()) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde and env parsing cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.busy_timeout_ms == 0 {
            return Err(ConfigError::ZeroBusyTimeout);
        }
        if !matches!(
            self.log_level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                value: self.log_level.clone(),
            });
        }
        if let Some(dir) = self.log_dir.as_ref() {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, ENV_BUSY_TIMEOUT_MS, ENV_DB_PATH, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_in_memory_store() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(config.db_path.is_none());
        assert_eq!(config.busy_timeout_ms, 5_000);
    }

    #[test]
    fn reads_overrides_from_lookup() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /tmp/board.db "),
            (ENV_BUSY_TIMEOUT_MS, "250"),
            (ENV_LOG_LEVEL, "WARN"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/board.db")));
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"db_path": "/var/lib/taskboard.db"}"#).unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/var/lib/taskboard.db")));
        assert_eq!(config.busy_timeout_ms, StoreConfig::default().busy_timeout_ms);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unparseable_and_zero_timeouts() {
        let err = StoreConfig::from_lookup(lookup_from(&[(ENV_BUSY_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err =
            StoreConfig::from_lookup(lookup_from(&[(ENV_BUSY_TIMEOUT_MS, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroBusyTimeout);
    }

    #[test]
    fn rejects_unknown_level_and_relative_log_dir() {
        let mut config = StoreConfig::default();
        config.log_level = "loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = StoreConfig::default();
        config.log_dir = Some(PathBuf::from("logs"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RelativeLogDir(_))
        ));
    }
}
