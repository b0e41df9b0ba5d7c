//! git
//!
//! Typed façade over the `git` command-line tool.
//!
//! # Architecture
//!
//! Every operation follows the same pipeline:
//!
//! ```text
//! Git::<verb>(..., opts) -> Command -> GitOption::apply_all -> exec -> parse
//! ```
//!
//! - [`command`]: the per-invocation builder
//! - [`options`]: generic options; verb modules add their own
//! - [`exec`]: deadline-bounded process execution
//! - [`parse`]: pure parsers from captured text to typed records
//! - [`error`]: the error taxonomy
//!
//! Each verb lives in its own module holding its `impl Git` block and its
//! operation-specific option constructors.
//!
//! # Concurrency
//!
//! Calls block until the child exits or its deadline fires. A façade may be
//! cloned and used from several threads, but git's own index and HEAD are not
//! safe to mutate concurrently; serialise writes against one working tree.
//!
//! # Example
//!
//! ```no_run
//! use gitfacade::git::{options, Git};
//!
//! let git = Git::open("/path/to/repo")?;
//! git.add(&["README.md"], &[])?;
//! git.commit("docs: readme", &[options::identity("J Doe", "j@d")])?;
//! for entry in git.log(&[gitfacade::git::log::max_count(5)])? {
//!     println!("{} {}", &entry.commit_id[..7], entry.message);
//! }
//! # Ok::<(), gitfacade::Error>(())
//! ```

pub mod command;
pub mod error;
pub mod exec;
pub mod locate;
pub mod options;
pub mod parse;

pub mod add;
pub mod branch;
pub mod checkout;
pub mod clone;
pub mod commit;
pub mod config;
pub mod diff;
pub mod fetch;
pub mod init;
pub mod log;
pub mod merge;
pub mod pull;
pub mod push;
pub mod rebase;
pub mod reflog;
pub mod remote;
pub mod repo;
pub mod reset;
pub mod revert;
pub mod rm;
pub mod show;
pub mod status;
pub mod tag;

pub use command::Command;
pub use error::{ExecutionError, GitError, SessionError};
pub use options::GitOption;
pub use repo::MergeState;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::config::FacadeConfig;

/// Handle on the `git` executable, optionally bound to a working directory.
///
/// Holds only the resolved binary path and per-call defaults; all repository
/// state lives in git itself.
#[derive(Debug, Clone)]
pub struct Git {
    binary: PathBuf,
    workdir: Option<PathBuf>,
    timeout: Duration,
    session_section: String,
    pin_locale: bool,
}

impl Git {
    /// Locate `git` using the user's façade configuration file, if any.
    ///
    /// Without a file this searches `PATH` with the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Config`] if the file exists but is invalid and
    /// [`GitError::NotFound`] if `git` is not installed.
    pub fn new() -> Result<Self, GitError> {
        Self::with_config(&FacadeConfig::load()?)
    }

    /// Build a façade from the configuration file at `path`.
    ///
    /// A missing file yields the defaults.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, GitError> {
        Self::with_config(&FacadeConfig::load_or_default(path.as_ref())?)
    }

    /// Build a façade from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Config`] for invalid values and
    /// [`GitError::NotFound`] if the binary cannot be resolved.
    pub fn with_config(config: &FacadeConfig) -> Result<Self, GitError> {
        config.validate()?;
        let wanted = config
            .binary
            .clone()
            .unwrap_or_else(|| PathBuf::from(locate::GIT_BINARY));
        let binary = locate::locate(&wanted)?;
        Ok(Self {
            binary,
            workdir: None,
            timeout: config.timeout(),
            session_section: config.session_section().to_string(),
            pin_locale: config.pin_locale(),
        })
    }

    /// Locate `git` and bind the façade to `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        Ok(Self::new()?.with_workdir(path))
    }

    /// Return a copy bound to `path`.
    pub fn with_workdir(mut self, path: impl AsRef<Path>) -> Self {
        self.set_workdir(path);
        self
    }

    /// Bind to `path`; every later command runs there.
    pub fn set_workdir(&mut self, path: impl AsRef<Path>) {
        self.workdir = Some(path.as_ref().to_path_buf());
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Resolved path of the `git` executable.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Default deadline for each command.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Name of the config section reserved for session data.
    pub fn session_section(&self) -> &str {
        &self.session_section
    }

    /// Start a command seeded with `seed` and the façade defaults.
    ///
    /// The child never opens an editor: `GIT_EDITOR` is set to `true`, which
    /// accepts whatever message git prepared.
    pub fn command<I, S>(&self, seed: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cmd = Command::new(&self.binary, seed);
        cmd.set_timeout(self.timeout);
        cmd.set_env("GIT_EDITOR", "true");
        if self.pin_locale {
            cmd.set_env("LC_ALL", "C");
            cmd.set_env("LANGUAGE", "C");
        }
        if let Some(dir) = &self.workdir {
            cmd.set_working_dir(dir.clone());
        }
        cmd
    }

    /// Seed a command and apply `opts` to it.
    pub(crate) fn build<I, S>(&self, seed: I, opts: &[GitOption]) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cmd = self.command(seed);
        GitOption::apply_all(opts, &mut cmd);
        cmd
    }

    /// Seed, apply, and execute; returns the primary output.
    pub(crate) fn run<I, S>(&self, seed: I, opts: &[GitOption]) -> Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        exec::execute(&self.build(seed, opts))
    }

    /// Execute an arbitrary command through the façade's executor.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Execution`] on non-zero exit or timeout.
    pub fn execute(&self, cmd: &Command) -> Result<String, GitError> {
        exec::execute(cmd)
    }

    /// Run `git <args...>` with façade defaults and return stdout.
    pub fn raw<I, S>(&self, args: I, opts: &[GitOption]) -> Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(args, opts)
    }

    /// The working directory a command built with `opts` would use.
    pub(crate) fn effective_dir(&self, opts: &[GitOption]) -> Option<PathBuf> {
        opts.iter()
            .rev()
            .find_map(|o| match o {
                GitOption::WorkingDir(dir) => Some(dir.clone()),
                _ => None,
            })
            .or_else(|| self.workdir.clone())
    }

    /// Options that carry over to follow-up commands: location, environment, deadline.
    pub(crate) fn ambient(opts: &[GitOption]) -> Vec<GitOption> {
        opts.iter().filter(|o| o.is_ambient()).cloned().collect()
    }
}
