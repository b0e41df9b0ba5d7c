//! git::options
//!
//! The option layer: transformations over a [`Command`].
//!
//! Options are plain values so call sites can build, inspect, and reuse
//! option lists. Every façade method takes `&[GitOption]` and applies the
//! list left to right after seeding the verb, so a later option overrides an
//! earlier one where both touch the same setting.
//!
//! This module holds the generic options that apply to any verb.
//! Operation-specific constructors live beside their operation, for example
//! [`commit::signoff`](super::commit::signoff) or
//! [`init::bare`](super::init::bare).
//!
//! # Example
//!
//! ```
//! use gitfacade::git::command::Command;
//! use gitfacade::git::options::{self, GitOption};
//!
//! let mut cmd = Command::new("git", ["commit", "-m", "m"]);
//! GitOption::apply_all(
//!     &[
//!         options::identity("J Doe", "j@d"),
//!         options::config("commit.gpgsign", "false"),
//!     ],
//!     &mut cmd,
//! );
//! assert_eq!(cmd.env()["GIT_AUTHOR_NAME"], "J Doe");
//! assert_eq!(cmd.args()[..2], ["-c", "commit.gpgsign=false"]);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use super::command::Command;

/// A single transformation over a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOption {
    /// Append option arguments.
    Args(Vec<String>),
    /// Append positional arguments (refs, remotes, urls).
    Positional(Vec<String>),
    /// Insert a positional argument ahead of the others (the remote in `push <remote> <ref>`).
    LeadingPositional(String),
    /// Append pathspecs after `--`.
    Pathspec(Vec<String>),
    /// Insert arguments directly after the verb.
    InsertAfterVerb(Vec<String>),
    /// Set one environment overlay entry.
    Env(String, String),
    /// Set several environment overlay entries.
    Envs(Vec<(String, String)>),
    /// Append a config pair through `GIT_CONFIG_KEY_<n>`/`GIT_CONFIG_VALUE_<n>`.
    EnvConfig(String, String),
    /// Override the deadline.
    Timeout(Duration),
    /// Override the working directory.
    WorkingDir(PathBuf),
    /// Feed a payload on stdin.
    Stdin(String),
    /// Insert `-c key=value` before the verb.
    Config(String, String),
    /// Insert several `-c key=value` pairs before the verb.
    Configs(Vec<(String, String)>),
    /// Apply several options in order.
    Group(Vec<GitOption>),
}

impl GitOption {
    /// Apply this option to `cmd`.
    pub fn apply(&self, cmd: &mut Command) {
        match self {
            GitOption::Args(args) => cmd.push_args(args.iter().cloned()),
            GitOption::Positional(values) => {
                for v in values {
                    cmd.push_positional(v.clone());
                }
            }
            GitOption::LeadingPositional(value) => cmd.insert_positional(0, value.clone()),
            GitOption::Pathspec(paths) => {
                for p in paths {
                    cmd.push_pathspec(p.clone());
                }
            }
            GitOption::InsertAfterVerb(args) => cmd.insert_after_verb(args.iter().cloned()),
            GitOption::Env(k, v) => cmd.set_env(k.clone(), v.clone()),
            GitOption::Envs(pairs) => {
                for (k, v) in pairs {
                    cmd.set_env(k.clone(), v.clone());
                }
            }
            GitOption::EnvConfig(k, v) => cmd.push_env_config(k, v),
            GitOption::Timeout(d) => cmd.set_timeout(*d),
            GitOption::WorkingDir(dir) => cmd.set_working_dir(dir.clone()),
            GitOption::Stdin(input) => cmd.set_stdin(input.clone()),
            GitOption::Config(k, v) => cmd.prepend_config(k, v),
            GitOption::Configs(pairs) => {
                // Reverse so the pairs end up in listed order at the front
                for (k, v) in pairs.iter().rev() {
                    cmd.prepend_config(k, v);
                }
            }
            GitOption::Group(opts) => Self::apply_all(opts, cmd),
        }
    }

    /// Whether this option only sets where and how a command runs.
    ///
    /// Such options carry over to follow-up commands of the same call.
    pub fn is_ambient(&self) -> bool {
        match self {
            GitOption::WorkingDir(_)
            | GitOption::Env(..)
            | GitOption::Envs(_)
            | GitOption::EnvConfig(..)
            | GitOption::Timeout(_) => true,
            GitOption::Group(opts) => opts.iter().all(GitOption::is_ambient),
            _ => false,
        }
    }

    /// Apply a list of options left to right.
    pub fn apply_all(opts: &[GitOption], cmd: &mut Command) {
        for opt in opts {
            opt.apply(cmd);
        }
    }
}

pub(crate) fn flag(arg: &str) -> GitOption {
    GitOption::Args(vec![arg.to_string()])
}

pub(crate) fn flag_with(name: &str, value: impl std::fmt::Display) -> GitOption {
    GitOption::Args(vec![format!("{name}={value}")])
}

/// Override the per-command deadline.
pub fn timeout(duration: Duration) -> GitOption {
    GitOption::Timeout(duration)
}

/// Set an environment variable for the child.
pub fn env(key: impl Into<String>, value: impl Into<String>) -> GitOption {
    GitOption::Env(key.into(), value.into())
}

/// Run in `dir` instead of the façade's working directory.
pub fn working_dir(dir: impl Into<PathBuf>) -> GitOption {
    GitOption::WorkingDir(dir.into())
}

/// Feed `input` to the child's stdin.
pub fn stdin(input: impl Into<String>) -> GitOption {
    GitOption::Stdin(input.into())
}

pub fn quiet() -> GitOption {
    flag("--quiet")
}

pub fn verbose() -> GitOption {
    flag("--verbose")
}

/// Raw escape hatch: append arbitrary arguments.
pub fn args<I, S>(args: I) -> GitOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    GitOption::Args(args.into_iter().map(Into::into).collect())
}

/// Append positional arguments such as a revision range.
pub fn positional<I, S>(values: I) -> GitOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    GitOption::Positional(values.into_iter().map(Into::into).collect())
}

/// Limit the operation to `paths` (placed after `--`).
pub fn pathspec<I, S>(paths: I) -> GitOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    GitOption::Pathspec(paths.into_iter().map(Into::into).collect())
}

/// One global `-c key=value` pair.
pub fn config(key: impl Into<String>, value: impl Into<String>) -> GitOption {
    GitOption::Config(key.into(), value.into())
}

/// Several global `-c key=value` pairs.
pub fn configs<I, K, V>(pairs: I) -> GitOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    GitOption::Configs(
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    )
}

/// Author and committer identity through the environment.
///
/// Does not add `--author`; verbs that take one can layer it on top.
pub fn identity(name: impl Into<String>, email: impl Into<String>) -> GitOption {
    let name = name.into();
    let email = email.into();
    GitOption::Envs(vec![
        ("GIT_AUTHOR_NAME".into(), name.clone()),
        ("GIT_AUTHOR_EMAIL".into(), email.clone()),
        ("GIT_COMMITTER_NAME".into(), name),
        ("GIT_COMMITTER_EMAIL".into(), email),
    ])
}

/// Non-interactive authentication with a bearer token.
///
/// Prompts are disabled and the token is sent as an HTTP header through
/// git's environment config, so it never appears in the argument vector.
/// The header is appended after any `GIT_CONFIG_*` pairs already set.
pub fn auth(token: impl Into<String>) -> GitOption {
    GitOption::Group(vec![
        GitOption::Envs(vec![
            ("GIT_ASKPASS".into(), "echo".into()),
            ("GIT_TERMINAL_PROMPT".into(), "0".into()),
        ]),
        GitOption::EnvConfig(
            "http.extraHeader".into(),
            format!("Authorization: Bearer {}", token.into()),
        ),
    ])
}

/// Run this call under the C locale so transcript phrases are English.
pub fn locale_c() -> GitOption {
    GitOption::Envs(vec![
        ("LC_ALL".into(), "C".into()),
        ("LANGUAGE".into(), "C".into()),
    ])
}
