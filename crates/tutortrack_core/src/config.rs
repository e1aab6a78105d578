//! Application configuration file.
//!
//! # Responsibility
//! - Load startup settings (log level, log directory, prefs location).
//! - Materialize a default config file on first run.
//!
//! # Invariants
//! - A missing file is not an error; a malformed one is.
//! - Relative paths are resolved against the data directory by the caller.

use crate::logging::default_log_level;
use crate::storage::json_storage::{read_json_file, save_json_file};
use crate::storage::StorageError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
const DEFAULT_USER_PREFS_FILE: &str = "preferences.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// Log directory, resolved against the data directory; `None` means `<data_dir>/logs`.
    pub log_dir: Option<PathBuf>,
    pub user_prefs_file_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            user_prefs_file_path: PathBuf::from(DEFAULT_USER_PREFS_FILE),
        }
    }
}

#[derive(Debug)]
pub struct ConfigError(StorageError);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to load config: {}", self.0)
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Loads `path`, writing and returning defaults when it does not exist.
///
/// # Errors
/// - Returns an error when the file exists but cannot be read or decoded.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match read_json_file::<AppConfig>(path).map_err(ConfigError)? {
        Some(config) => Ok(config),
        None => {
            let config = AppConfig::default();
            match save_json_file(path, &config) {
                Ok(()) => info!(
                    "event=config_created module=config status=ok path={}",
                    path.display()
                ),
                // Defaults still apply when the file cannot be written.
                Err(err) => warn!(
                    "event=config_created module=config status=error path={} error={}",
                    path.display(),
                    err
                ),
            }
            Ok(config)
        }
    }
}
