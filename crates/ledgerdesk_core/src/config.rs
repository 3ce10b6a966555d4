//! Runtime configuration for the dashboard core.
//!
//! # Responsibility
//! - Collect database, logging, paging, and store-synchronization settings.
//! - Load overrides from `LEDGERDESK_*` environment variables.
//!
//! # Invariants
//! - A loaded config is always usable: values are validated on load.
//! - Unset variables keep their defaults.

use crate::logging::default_log_level;
use crate::service::DEFAULT_ITEMS_PER_PAGE;
use crate::store::{ReconcileStrategy, RollbackPolicy, UpdateMode};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB: &str = "LEDGERDESK_DB";
pub const ENV_LOG_LEVEL: &str = "LEDGERDESK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LEDGERDESK_LOG_DIR";
pub const ENV_PAGE_SIZE: &str = "LEDGERDESK_PAGE_SIZE";
pub const ENV_UPDATE_MODE: &str = "LEDGERDESK_UPDATE_MODE";
pub const ENV_RECONCILE: &str = "LEDGERDESK_RECONCILE";
pub const ENV_ROLLBACK: &str = "LEDGERDESK_ROLLBACK";

const DEFAULT_DB_FILE_NAME: &str = "ledgerdesk.sqlite3";
const PAGE_SIZE_MAX: u32 = 100;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value `{}` for {}; expected {}",
            self.value, self.key, self.expected
        )
    }
}

impl Error for ConfigError {}

/// Settings shared by the core and its front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub items_per_page: u32,
    pub update_mode: UpdateMode,
    pub reconcile: ReconcileStrategy,
    pub rollback: RollbackPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            update_mode: UpdateMode::default(),
            reconcile: ReconcileStrategy::default(),
            rollback: RollbackPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps variable names to values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read(ENV_DB) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value.to_ascii_lowercase();
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = read(ENV_PAGE_SIZE) {
            config.items_per_page = parse_page_size(&value)?;
        }
        if let Some(value) = read(ENV_UPDATE_MODE) {
            config.update_mode = parse_update_mode(&value)?;
        }
        if let Some(value) = read(ENV_RECONCILE) {
            config.reconcile = parse_reconcile(&value)?;
        }
        if let Some(value) = read(ENV_ROLLBACK) {
            config.rollback = parse_rollback(&value)?;
        }
        Ok(config)
    }
}

pub fn parse_page_size(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|size| (1..=PAGE_SIZE_MAX).contains(size))
        .ok_or_else(|| ConfigError {
            key: ENV_PAGE_SIZE,
            value: value.to_string(),
            expected: "an integer between 1 and 100",
        })
}

pub fn parse_update_mode(value: &str) -> Result<UpdateMode, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "replace" => Ok(UpdateMode::Replace),
        "append" | "append_compat" => Ok(UpdateMode::AppendCompat),
        _ => Err(ConfigError {
            key: ENV_UPDATE_MODE,
            value: value.to_string(),
            expected: "replace|append",
        }),
    }
}

pub fn parse_reconcile(value: &str) -> Result<ReconcileStrategy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "key_diff" | "keys" => Ok(ReconcileStrategy::KeyDiff),
        "length" | "length_heuristic" => Ok(ReconcileStrategy::LengthHeuristic),
        _ => Err(ConfigError {
            key: ENV_RECONCILE,
            value: value.to_string(),
            expected: "key_diff|length",
        }),
    }
}

pub fn parse_rollback(value: &str) -> Result<RollbackPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "revert" => Ok(RollbackPolicy::Revert),
        "keep" | "keep_optimistic" => Ok(RollbackPolicy::KeepOptimistic),
        _ => Err(ConfigError {
            key: ENV_ROLLBACK,
            value: value.to_string(),
            expected: "revert|keep",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_PAGE_SIZE, ENV_RECONCILE, ENV_UPDATE_MODE};
    use crate::store::{ReconcileStrategy, RollbackPolicy, UpdateMode};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).expect("defaults load");
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.items_per_page, 6);
        assert_eq!(config.update_mode, UpdateMode::Replace);
        assert_eq!(config.reconcile, ReconcileStrategy::KeyDiff);
        assert_eq!(config.rollback, RollbackPolicy::Revert);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_PAGE_SIZE, " 10 "),
            (ENV_UPDATE_MODE, "APPEND"),
            (ENV_RECONCILE, "length"),
            ("LEDGERDESK_ROLLBACK", "keep"),
            ("LEDGERDESK_LOG_DIR", ""),
        ]))
        .expect("overrides load");
        assert_eq!(config.items_per_page, 10);
        assert_eq!(config.update_mode, UpdateMode::AppendCompat);
        assert_eq!(config.reconcile, ReconcileStrategy::LengthHeuristic);
        assert_eq!(config.rollback, RollbackPolicy::KeepOptimistic);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn out_of_range_page_size_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_PAGE_SIZE, "0")])).expect_err("zero");
        assert_eq!(err.key, ENV_PAGE_SIZE);
        assert!(err.to_string().contains("between 1 and 100"));
    }
}
