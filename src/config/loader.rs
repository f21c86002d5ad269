//! Configuration file loading with precedence handling.

use crate::model::ID_FIELD;
use crate::state::ListConfig;
use crate::view_state::{ColumnSpec, Extent, RowExtent};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PAGESEL_CONFIG";
/// Environment variable overriding `debounce_ms`.
pub const DEBOUNCE_ENV: &str = "PAGESEL_DEBOUNCE_MS";
/// Environment variable overriding `filter_field`.
pub const FILTER_FIELD_ENV: &str = "PAGESEL_FILTER_FIELD";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting has a value outside its domain.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Config key.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/pagesel/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Rows rendered beyond each viewport edge.
    #[serde(default)]
    pub overscan_rows: Option<usize>,

    /// Remaining scroll distance that triggers the next page.
    #[serde(default)]
    pub scroll_threshold_px: Option<u64>,

    /// Search debounce in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Fixed row extent. Must be non-zero.
    #[serde(default)]
    pub row_extent_px: Option<u64>,

    /// Records per fetched page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Simulated fetch latency in milliseconds.
    #[serde(default)]
    pub latency_ms: Option<u64>,

    /// Field searched initially.
    #[serde(default)]
    pub filter_field: Option<String>,

    /// Fields offered for searching.
    #[serde(default)]
    pub filter_fields: Option<Vec<String>>,

    /// Table columns.
    #[serde(default)]
    pub columns: Option<Vec<ColumnSpec>>,

    /// Title bar text.
    #[serde(default)]
    pub title: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Overscan rows.
    pub overscan_rows: usize,
    /// Scroll threshold.
    pub scroll_threshold_px: u64,
    /// Search debounce.
    pub debounce_ms: u64,
    /// Row extent.
    pub row_extent_px: u64,
    /// Page size.
    pub page_size: usize,
    /// Simulated latency.
    pub latency_ms: u64,
    /// Initial filter field.
    pub filter_field: String,
    /// Selectable filter fields.
    pub filter_fields: Vec<String>,
    /// Table columns.
    pub columns: Vec<ColumnSpec>,
    /// Title bar text.
    pub title: String,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            overscan_rows: 10,
            scroll_threshold_px: 100,
            debounce_ms: 300,
            row_extent_px: 48,
            page_size: 10,
            latency_ms: 0,
            filter_field: ID_FIELD.to_string(),
            filter_fields: vec![ID_FIELD.to_string()],
            columns: vec![ColumnSpec::new("ID", ID_FIELD)],
            title: "Access Groups".to_string(),
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Check values that have no valid default fallback.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero row extent or page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.row_extent()?;
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                reason: "must be >= 1".to_string(),
            });
        }
        Ok(())
    }

    /// List tunables derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if [`validate`](Self::validate) fails.
    pub fn list_config(&self) -> Result<ListConfig, ConfigError> {
        self.validate()?;
        Ok(ListConfig {
            overscan_rows: self.overscan_rows,
            scroll_threshold: Extent::new(self.scroll_threshold_px),
            debounce: Duration::from_millis(self.debounce_ms),
            row_extent: self.row_extent()?,
            filter_field: self.filter_field.clone(),
            filter_fields: self.filter_fields.clone(),
        })
    }

    fn row_extent(&self) -> Result<RowExtent, ConfigError> {
        RowExtent::new(self.row_extent_px).map_err(|err| ConfigError::InvalidValue {
            key: "row_extent_px",
            reason: err.to_string(),
        })
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/pagesel/pagesel.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("pagesel").join("pagesel.log")
    } else {
        PathBuf::from("pagesel.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/pagesel/config.toml` on Unix, appropriate path on other platforms.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pagesel").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `PAGESEL_CONFIG` environment variable
/// 3. Default path `~/.config/pagesel/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let filter_field = config.filter_field.unwrap_or(defaults.filter_field);
    // Without an explicit list the chosen field is the only option
    let filter_fields = config
        .filter_fields
        .filter(|fields| !fields.is_empty())
        .unwrap_or_else(|| vec![filter_field.clone()]);

    ResolvedConfig {
        overscan_rows: config.overscan_rows.unwrap_or(defaults.overscan_rows),
        scroll_threshold_px: config
            .scroll_threshold_px
            .unwrap_or(defaults.scroll_threshold_px),
        debounce_ms: config.debounce_ms.unwrap_or(defaults.debounce_ms),
        row_extent_px: config.row_extent_px.unwrap_or(defaults.row_extent_px),
        page_size: config.page_size.unwrap_or(defaults.page_size),
        latency_ms: config.latency_ms.unwrap_or(defaults.latency_ms),
        filter_field,
        filter_fields,
        columns: config
            .columns
            .filter(|columns| !columns.is_empty())
            .unwrap_or(defaults.columns),
        title: config.title.unwrap_or(defaults.title),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `PAGESEL_DEBOUNCE_MS`: Override debounce (ignored with a warning if not a number)
/// - `PAGESEL_FILTER_FIELD`: Override initial filter field
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(DEBOUNCE_ENV) {
        match raw.trim().parse() {
            Ok(ms) => config.debounce_ms = ms,
            Err(_) => warn!(value = %raw, "Ignoring non-numeric {DEBOUNCE_ENV}"),
        }
    }

    if let Ok(field) = std::env::var(FILTER_FIELD_ENV) {
        if !field.is_empty() {
            config.filter_field = field;
        }
    }

    config
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--filter-field`
    pub filter_field: Option<String>,
    /// `--page-size`
    pub page_size: Option<usize>,
    /// `--debounce-ms`
    pub debounce_ms: Option<u64>,
    /// `--latency-ms`
    pub latency_ms: Option<u64>,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(field) = overrides.filter_field {
        config.filter_field = field;
    }
    if let Some(page_size) = overrides.page_size {
        config.page_size = page_size;
    }
    if let Some(debounce_ms) = overrides.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if let Some(latency_ms) = overrides.latency_ms {
        config.latency_ms = latency_ms;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
