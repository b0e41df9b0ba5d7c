//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: the deadline must be non-zero and the
//! session section must be usable as a git config section name.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::ConfigError;

/// Default per-command deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default name of the repository config section that holds session data.
pub const DEFAULT_SESSION_SECTION: &str = "gitfacade";

/// Façade configuration.
///
/// Every field is optional; accessors apply the defaults.
///
/// # Example
///
/// ```toml
/// binary = "/usr/local/bin/git"
/// timeout_secs = 60
/// session_section = "workshop"
/// pin_locale = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FacadeConfig {
    /// Explicit path to the `git` executable. Skips the `PATH` search.
    pub binary: Option<PathBuf>,

    /// Default per-command deadline, in seconds.
    pub timeout_secs: Option<u64>,

    /// Config section reserved for session data.
    pub session_section: Option<String>,

    /// Run every command under `LC_ALL=C` so transcript phrases are English.
    pub pin_locale: Option<bool>,
}

impl FacadeConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        if let Some(section) = &self.session_section {
            if !is_valid_section_name(section) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid session section '{section}': use letters, digits and '-', starting with a letter"
                )));
            }
        }

        if let Some(binary) = &self.binary {
            if binary.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue("binary path is empty".into()));
            }
        }

        Ok(())
    }

    /// Effective per-command deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Effective session section name.
    pub fn session_section(&self) -> &str {
        self.session_section
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_SECTION)
    }

    /// Whether commands run under the C locale.
    pub fn pin_locale(&self) -> bool {
        self.pin_locale.unwrap_or(false)
    }
}

/// Git accepts alphanumerics and `-` in section names; we also require a
/// leading letter so the section never collides with a numeric key.
pub(crate) fn is_valid_section_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
