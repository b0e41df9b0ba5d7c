//! git::error
//!
//! Error taxonomy for the façade.
//!
//! # Categories
//!
//! - [`GitError::NotFound`]: the `git` executable could not be located
//! - [`GitError::Execution`]: the child exited non-zero or hit its deadline
//! - [`GitError::Parse`]: captured output did not have the expected shape
//! - [`GitError::Session`]: session lifecycle failures
//!
//! Outcomes the tool reports as failure but callers treat as data (merge
//! conflicts, pull conflicts, checkout blocked by untracked files) are not
//! errors; they come back as result records with `success == false`.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::types::TypeError;

/// Errors from façade operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` executable is not on the search path.
    #[error("git executable not found: {binary}")]
    NotFound {
        /// The name or path that was searched for
        binary: String,
    },

    /// The child process failed.
    #[error(transparent)]
    Execution(Box<ExecutionError>),

    /// Output did not match the expected shape.
    #[error("failed to parse {what}: {text:?}")]
    Parse {
        /// What was being parsed
        what: &'static str,
        /// The offending text
        text: String,
    },

    /// Spawning, piping, or filesystem access failed.
    #[error("{context}: {source}")]
    Io {
        /// What the façade was doing
        context: String,
        /// The underlying error
        source: std::io::Error,
    },

    /// The caller supplied an unusable value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Session lifecycle failure.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A strong-type constructor rejected a value.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Façade configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GitError {
    pub(crate) fn parse(what: &'static str, text: impl Into<String>) -> Self {
        GitError::Parse {
            what,
            text: text.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        GitError::Io {
            context: context.into(),
            source,
        }
    }

    /// The execution details, if this is an execution failure.
    pub fn as_execution(&self) -> Option<&ExecutionError> {
        match self {
            GitError::Execution(e) => Some(e),
            _ => None,
        }
    }

    /// True when the child reported that the directory is not a repository.
    pub fn is_not_a_repository(&self) -> bool {
        self.as_execution()
            .is_some_and(ExecutionError::is_not_a_repository)
    }
}

impl From<ExecutionError> for GitError {
    fn from(err: ExecutionError) -> Self {
        GitError::Execution(Box::new(err))
    }
}

/// A failed child process.
///
/// Carries everything needed to rerun the command by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.render())]
pub struct ExecutionError {
    /// Argument vector passed to the binary (binary itself excluded)
    pub argv: Vec<String>,
    /// Exit code; `None` when the child was killed by a signal or the deadline
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Whether the deadline expired
    pub timed_out: bool,
}

impl ExecutionError {
    /// True when `needle` occurs in the captured stderr.
    pub fn stderr_contains(&self, needle: &str) -> bool {
        self.stderr.contains(needle)
    }

    /// `fatal: not a git repository`
    pub fn is_not_a_repository(&self) -> bool {
        self.stderr_contains("not a git repository")
    }

    /// Clone target is occupied.
    pub fn is_destination_exists(&self) -> bool {
        self.stderr_contains("already exists and is not an empty directory")
    }

    /// A revision argument did not resolve.
    pub fn is_unknown_revision(&self) -> bool {
        self.stderr_contains("unknown revision or path not in the working tree")
            || self.stderr_contains("did not match any file(s) known to git")
    }

    fn render(&self) -> String {
        let argv = self.argv.join(" ");
        let mut msg = if self.timed_out {
            format!("git {argv} timed out")
        } else {
            match self.exit_code {
                Some(code) => format!("git {argv} exited with status {code}"),
                None => format!("git {argv} was terminated by a signal"),
            }
        };
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            msg.push_str(": ");
            msg.push_str(stderr);
        }
        msg
    }
}

/// Errors from session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session section exists but holds no session id.
    #[error("session at {path} has no session id")]
    MissingSessionId {
        /// Repository path
        path: PathBuf,
    },

    /// The repository carries no session section.
    #[error("no session found at {path}")]
    NotASession {
        /// Repository path
        path: PathBuf,
    },

    /// Metadata key cannot be stored as a config key.
    #[error("invalid metadata key '{key}': use letters, digits and '-', starting with a letter")]
    InvalidMetadataKey {
        /// The rejected key
        key: String,
    },

    /// Metadata key collides with a session field.
    #[error("metadata key '{key}' is reserved")]
    ReservedMetadataKey {
        /// The rejected key
        key: String,
    },

    /// The stored `created` value is not RFC3339.
    #[error("invalid session timestamp '{value}'")]
    InvalidTimestamp {
        /// The stored value
        value: String,
    },
}
