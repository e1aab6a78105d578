//! Explicit application context threaded through startup.
//!
//! # Responsibility
//! - Own the loaded `AppConfig` and the active `LoggingHandle`.
//! - Resolve config-relative paths against the data directory.
//!
//! # Invariants
//! - Nothing in core reads config from process-wide state; callers pass the
//!   context to whatever needs it.

use crate::config::{load_config, AppConfig, ConfigError};
use crate::logging::{init_logging, LoggingHandle};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ContextError {
    Config(ConfigError),
    Logging(String),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "failed to initialize logging: {message}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct AppContext {
    config: AppConfig,
    data_dir: PathBuf,
    logging: Option<LoggingHandle>,
}

impl AppContext {
    /// Loads `config_path` and starts file logging.
    ///
    /// `level_override` replaces the configured level when given.
    pub fn new(
        config_path: &Path,
        data_dir: &Path,
        level_override: Option<&str>,
    ) -> Result<Self, ContextError> {
        let mut config = load_config(config_path).map_err(ContextError::Config)?;
        if let Some(level) = level_override {
            config.log_level = level.to_string();
        }
        let mut context = Self::without_logging(config, data_dir);
        let log_dir = context.log_dir();
        let handle =
            init_logging(&context.config.log_level, &log_dir).map_err(ContextError::Logging)?;
        context.logging = Some(handle);
        Ok(context)
    }

    /// Context with no logger attached; used by tests and embedders that
    /// install their own `log` backend.
    pub fn without_logging(config: AppConfig, data_dir: &Path) -> Self {
        Self {
            config,
            data_dir: data_dir.to_path_buf(),
            logging: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn logging(&self) -> Option<&LoggingHandle> {
        self.logging.as_ref()
    }

    pub fn log_dir(&self) -> PathBuf {
        match &self.config.log_dir {
            Some(dir) => self.resolve(dir),
            None => self.data_dir.join("logs"),
        }
    }

    pub fn user_prefs_path(&self) -> PathBuf {
        self.resolve(&self.config.user_prefs_file_path)
    }

    /// Joins relative paths onto the data directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}
