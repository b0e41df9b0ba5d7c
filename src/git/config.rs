//! git::config
//!
//! Reading and writing git configuration.
//!
//! These persist values in a config file. For a one-off override on a single
//! call use [`options::config`](super::options::config) instead.

use std::path::Path;

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::config::{parse_config_list, parse_null_pairs, ConfigEntry};
use super::repo::is_silent_miss;
use super::Git;

pub fn local() -> GitOption {
    flag("--local")
}

pub fn global() -> GitOption {
    flag("--global")
}

pub fn system() -> GitOption {
    flag("--system")
}

pub fn worktree() -> GitOption {
    flag("--worktree")
}

/// Use `path` as the config file.
pub fn file(path: impl AsRef<Path>) -> GitOption {
    flag_with("--file", path.as_ref().display())
}

pub fn get() -> GitOption {
    flag("--get")
}

/// Every value of a multi-valued key, one per line.
pub fn get_all() -> GitOption {
    flag("--get-all")
}

/// Treat the key as a regular expression; lines are `key value`.
pub fn get_regexp() -> GitOption {
    flag("--get-regexp")
}

const GET_ACTIONS: [&str; 3] = ["--get", "--get-all", "--get-regexp"];

impl Git {
    /// Write `key = value`.
    #[instrument(skip(self, value, opts))]
    pub fn set_config(&self, key: &str, value: &str, opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["config"], opts);
        cmd.push_positional(key);
        cmd.push_positional(value);
        self.execute(&cmd)
    }

    /// Read `key`; `None` when it is not set.
    ///
    /// `--get` is added unless [`get_all`] or [`get_regexp`] was given.
    #[instrument(skip(self, opts))]
    pub fn get_config(&self, key: &str, opts: &[GitOption]) -> Result<Option<String>, GitError> {
        let mut cmd = self.build(["config"], opts);
        if !GET_ACTIONS.iter().any(|a| cmd.has_flag(a)) {
            cmd.push_arg("--get");
        }
        cmd.push_positional(key);
        match self.execute(&cmd) {
            Ok(out) => Ok(Some(out.strip_suffix('\n').unwrap_or(&out).to_string())),
            Err(e) if is_silent_miss(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Remove `key`.
    #[instrument(skip(self, opts))]
    pub fn unset_config(&self, key: &str, opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["config", "--unset"], opts);
        cmd.push_positional(key);
        self.execute(&cmd)
    }

    /// Every visible value with its scope and origin file.
    #[instrument(skip(self, opts))]
    pub fn list_config(&self, opts: &[GitOption]) -> Result<Vec<ConfigEntry>, GitError> {
        let out = self.run(["config", "--list", "--show-origin", "--show-scope"], opts)?;
        Ok(parse_config_list(&out))
    }

    /// `(key, value)` pairs whose key matches `pattern`; empty when none do.
    ///
    /// Values may span lines.
    #[instrument(skip(self, opts))]
    pub fn get_config_regexp(
        &self,
        pattern: &str,
        opts: &[GitOption],
    ) -> Result<Vec<(String, String)>, GitError> {
        let mut cmd = self.build(["config", "--null", "--get-regexp"], opts);
        cmd.push_positional(pattern);
        match self.execute(&cmd) {
            Ok(out) => Ok(parse_null_pairs(&out)),
            Err(e) if is_silent_miss(&e) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Drop a whole `[section]`.
    #[instrument(skip(self, opts))]
    pub fn remove_config_section(&self, section: &str, opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["config", "--remove-section"], opts);
        cmd.push_positional(section);
        self.execute(&cmd)
    }
}
