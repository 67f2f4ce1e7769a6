//! Configuration management for Hearth
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{HearthError, Result};
use crate::planner::PlannerRules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Hearth
///
/// This structure holds everything the router and the planner need:
/// where their input documents live, history retention, planner rules,
/// the storage backend and logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Message routing configuration
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Meal planner configuration
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Document store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Routing configuration
///
/// Points at the session-manager document and sets history retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Session-manager JSON document (contexts, session mapping, patterns)
    #[serde(default = "default_session_manager_path")]
    pub session_manager_path: PathBuf,

    /// Entries kept in each per-context history log
    #[serde(default = "default_context_history_limit")]
    pub context_history_limit: usize,

    /// Entries kept in the central routing log
    #[serde(default = "default_central_history_limit")]
    pub central_history_limit: usize,

    /// Message preview length in per-context logs
    #[serde(default = "default_context_preview_chars")]
    pub context_preview_chars: usize,

    /// Message preview length in the central log
    #[serde(default = "default_central_preview_chars")]
    pub central_preview_chars: usize,
}

fn default_session_manager_path() -> PathBuf {
    PathBuf::from("data/session-manager.json")
}

fn default_context_history_limit() -> usize {
    50
}

fn default_central_history_limit() -> usize {
    100
}

fn default_context_preview_chars() -> usize {
    200
}

fn default_central_preview_chars() -> usize {
    100
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            session_manager_path: default_session_manager_path(),
            context_history_limit: default_context_history_limit(),
            central_history_limit: default_central_history_limit(),
            context_preview_chars: default_context_preview_chars(),
            central_preview_chars: default_central_preview_chars(),
        }
    }
}

/// Meal planner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Recipe catalog (JSON array of recipes)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Plan generation rules
    #[serde(default)]
    pub rules: PlannerRules,

    /// Fixed seed for reproducible plans
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/recipes.json")
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            rules: PlannerRules::default(),
            seed: None,
        }
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One pretty-printed JSON file per document
    #[default]
    Json,
    /// Embedded sled database
    Sled,
    /// Process memory only; nothing survives the run
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = HearthError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sled" => Ok(Self::Sled),
            "memory" => Ok(Self::Memory),
            other => Err(HearthError::Config(format!(
                "Invalid storage backend: {}. Must be one of: json, sled, memory",
                other
            ))),
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: StorageBackend,

    /// Data directory (defaults to the platform data directory)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable JSON-formatted logs
    #[serde(default)]
    pub json_format: bool,

    /// Log file path (if None, stderr only)
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

const MAX_HISTORY_LIMIT: usize = 10_000;
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| HearthError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| HearthError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(data_dir) = std::env::var("HEARTH_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(data_dir));
        }

        if let Ok(backend) = std::env::var("HEARTH_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(value) => self.storage.backend = value,
                Err(e) => tracing::warn!("Invalid HEARTH_STORAGE_BACKEND: {}", e),
            }
        }

        if let Ok(path) = std::env::var("HEARTH_SESSION_MANAGER") {
            self.routing.session_manager_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("HEARTH_RECIPES") {
            self.planner.catalog_path = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var("HEARTH_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(seed) = std::env::var("HEARTH_PLAN_SEED") {
            if let Ok(value) = seed.parse() {
                self.planner.seed = Some(value);
            } else {
                tracing::warn!("Invalid HEARTH_PLAN_SEED: {}", seed);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(data_dir) = &cli.data_dir {
            self.storage.data_dir = Some(data_dir.clone());
        }

        if cli.verbose {
            self.logging.level = "debug".to_string();
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Returns
    ///
    /// Returns Ok if configuration is valid
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            (
                "routing.context_history_limit",
                self.routing.context_history_limit,
            ),
            (
                "routing.central_history_limit",
                self.routing.central_history_limit,
            ),
        ] {
            if value == 0 {
                return Err(HearthError::Config(format!("{} must be greater than 0", name)).into());
            }
            if value > MAX_HISTORY_LIMIT {
                return Err(HearthError::Config(format!(
                    "{} must be less than or equal to {}",
                    name, MAX_HISTORY_LIMIT
                ))
                .into());
            }
        }

        if self.routing.context_preview_chars == 0 || self.routing.central_preview_chars == 0 {
            return Err(HearthError::Config(
                "routing preview lengths must be greater than 0".to_string(),
            )
            .into());
        }

        if self.routing.session_manager_path.as_os_str().is_empty() {
            return Err(HearthError::Config(
                "routing.session_manager_path cannot be empty".to_string(),
            )
            .into());
        }

        if self.planner.catalog_path.as_os_str().is_empty() {
            return Err(
                HearthError::Config("planner.catalog_path cannot be empty".to_string()).into(),
            );
        }

        self.planner.rules.validate()?;

        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(HearthError::Config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Weekday;
    use serial_test::serial;

    const ENV_VARS: [&str; 6] = [
        "HEARTH_DATA_DIR",
        "HEARTH_STORAGE_BACKEND",
        "HEARTH_SESSION_MANAGER",
        "HEARTH_RECIPES",
        "HEARTH_LOG_LEVEL",
        "HEARTH_PLAN_SEED",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.routing.context_history_limit, 50);
        assert_eq!(config.routing.central_history_limit, 100);
        assert_eq!(config.routing.context_preview_chars, 200);
        assert_eq!(config.routing.central_preview_chars, 100);
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.logging.level, "info");
        assert!(config.planner.seed.is_none());
    }

    #[test]
    fn test_config_validation_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_history_limit() {
        let mut config = Config::default();
        config.routing.context_history_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_history_limit_too_large() {
        let mut config = Config::default();
        config.routing.central_history_limit = 10_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_preview() {
        let mut config = Config::default();
        config.routing.central_preview_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_rules() {
        let mut config = Config::default();
        config.planner.rules.favorites.max_per_week = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
routing:
  session_manager_path: /etc/hearth/sessions.json
  central_history_limit: 250
planner:
  catalog_path: /etc/hearth/recipes.json
  seed: 42
  rules:
    first_day: sunday
    takeaway_days: [saturday]
storage:
  backend: sled
  data_dir: /var/lib/hearth
logging:
  level: debug
  json_format: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.routing.session_manager_path,
            PathBuf::from("/etc/hearth/sessions.json")
        );
        assert_eq!(config.routing.central_history_limit, 250);
        assert_eq!(config.routing.context_history_limit, 50);
        assert_eq!(config.planner.seed, Some(42));
        assert_eq!(config.planner.rules.first_day, Weekday::Sunday);
        assert_eq!(config.storage.backend, StorageBackend::Sled);
        assert!(config.logging.json_format);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("SLED".parse::<StorageBackend>().unwrap(), StorageBackend::Sled);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        clear_env();
        let cli = crate::cli::Cli::default();
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.routing.context_history_limit, 50);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    #[serial]
    fn test_load_reads_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "planner:\n  seed: 9\n").unwrap();
        let config = Config::load(path.to_str().unwrap(), &crate::cli::Cli::default()).unwrap();
        assert_eq!(config.planner.seed, Some(9));
    }

    #[test]
    #[serial]
    fn test_load_invalid_yaml_is_error() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "routing: [not, a, map").unwrap();
        assert!(Config::load(path.to_str().unwrap(), &crate::cli::Cli::default()).is_err());
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides_fields() {
        clear_env();
        std::env::set_var("HEARTH_DATA_DIR", "/tmp/hearth-env");
        std::env::set_var("HEARTH_STORAGE_BACKEND", "memory");
        std::env::set_var("HEARTH_SESSION_MANAGER", "/tmp/sessions.json");
        std::env::set_var("HEARTH_RECIPES", "/tmp/recipes.json");
        std::env::set_var("HEARTH_LOG_LEVEL", "trace");
        std::env::set_var("HEARTH_PLAN_SEED", "123");

        let mut config = Config::default();
        config.apply_env_vars();

        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/hearth-env")));
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(
            config.routing.session_manager_path,
            PathBuf::from("/tmp/sessions.json")
        );
        assert_eq!(config.planner.catalog_path, PathBuf::from("/tmp/recipes.json"));
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.planner.seed, Some(123));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_env_values_are_ignored() {
        clear_env();
        std::env::set_var("HEARTH_STORAGE_BACKEND", "floppy");
        std::env::set_var("HEARTH_PLAN_SEED", "soon");

        let mut config = Config::default();
        config.apply_env_vars();
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert!(config.planner.seed.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_cli_overrides_win_over_env() {
        clear_env();
        std::env::set_var("HEARTH_DATA_DIR", "/tmp/from-env");
        let cli = crate::cli::Cli {
            verbose: true,
            data_dir: Some(PathBuf::from("/tmp/from-cli")),
            ..Default::default()
        };
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/from-cli")));
        assert_eq!(config.logging.level, "debug");
        clear_env();
    }
}
