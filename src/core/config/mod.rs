//! core::config
//!
//! Façade configuration and loading.
//!
//! # Overview
//!
//! `Git::new()` reads the default configuration file when there is one and
//! falls back to built-in defaults otherwise. Hosts that keep their settings
//! elsewhere use [`Git::from_config_file`](crate::git::Git::from_config_file)
//! or build a [`FacadeConfig`] and pass it to
//! [`Git::with_config`](crate::git::Git::with_config).
//!
//! # Location
//!
//! [`FacadeConfig::load`] reads `<config_dir>/gitfacade/config.toml`
//! (for example `~/.config/gitfacade/config.toml` on Linux). A missing file or
//! config directory is not an error. No environment variables are consulted.
//!
//! # Example
//!
//! ```no_run
//! use gitfacade::core::config::FacadeConfig;
//! use gitfacade::git::Git;
//!
//! let config = FacadeConfig::load().unwrap();
//! let git = Git::with_config(&config).unwrap();
//! println!("using {}", git.binary().display());
//! ```

pub mod schema;

pub use schema::FacadeConfig;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("config directory not found")]
    NoConfigDir,
}

impl FacadeConfig {
    /// Load configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// validated. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let Ok(path) = Self::default_path() else {
            tracing::debug!("no config directory, using facade defaults");
            return Ok(Self::default());
        };
        Self::load_or_default(&path)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load_from_file`](Self::load_from_file) for an existing file.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no facade config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Load and validate configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns `ReadError`, `ParseError`, or `InvalidValue`.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded facade config");
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Returns `<config_dir>/gitfacade/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("gitfacade").join("config.toml"))
    }

    /// Write the configuration to `path` atomically.
    ///
    /// Creates parent directories if needed. The file is written next to the
    /// target and renamed into place.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
