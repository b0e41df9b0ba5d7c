//! git::log
//!
//! Commit history.
//!
//! Unless the caller picks a format, the façade asks for the record-delimited
//! [`LOG_FORMAT`] so every field is tagged. The `fuller`, `full`, `medium`,
//! `short` and `raw` formats are also parsed. One-line, graph and custom
//! `format:` output cannot be split into records; use [`Git::log_raw`].

use tracing::instrument;

use super::command::Command;
use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::log::{parse_pretty, parse_records, LogEntry, LogShape, LOG_FORMAT};
use super::Git;

pub fn max_count(n: usize) -> GitOption {
    flag_with("--max-count", n)
}

pub fn skip(n: usize) -> GitOption {
    flag_with("--skip", n)
}

/// Any date git understands (`2024-01-01`, `2.weeks`).
pub fn since(date: &str) -> GitOption {
    flag_with("--since", date)
}

pub fn until(date: &str) -> GitOption {
    flag_with("--until", date)
}

pub fn author(pattern: &str) -> GitOption {
    flag_with("--author", pattern)
}

pub fn committer(pattern: &str) -> GitOption {
    flag_with("--committer", pattern)
}

pub fn grep(pattern: &str) -> GitOption {
    flag_with("--grep", pattern)
}

/// `--format=<value>`
pub fn format(value: &str) -> GitOption {
    flag_with("--format", value)
}

/// `--pretty=<value>`
pub fn pretty(value: &str) -> GitOption {
    flag_with("--pretty", value)
}

pub fn oneline() -> GitOption {
    flag("--oneline")
}

pub fn graph() -> GitOption {
    flag("--graph")
}

pub fn decorate() -> GitOption {
    flag("--decorate")
}

pub fn all() -> GitOption {
    flag("--all")
}

pub fn stat() -> GitOption {
    flag("--stat")
}

pub fn shortstat() -> GitOption {
    flag("--shortstat")
}

pub fn name_only() -> GitOption {
    flag("--name-only")
}

pub fn name_status() -> GitOption {
    flag("--name-status")
}

pub fn abbrev_commit() -> GitOption {
    flag("--abbrev-commit")
}

pub fn no_merges() -> GitOption {
    flag("--no-merges")
}

pub fn merges() -> GitOption {
    flag("--merges")
}

pub fn first_parent() -> GitOption {
    flag("--first-parent")
}

pub fn reverse() -> GitOption {
    flag("--reverse")
}

/// Follow renames; needs exactly one [`path`].
pub fn follow() -> GitOption {
    flag("--follow")
}

/// Limit to commits touching `path`.
pub fn path(path: impl Into<String>) -> GitOption {
    GitOption::Pathspec(vec![path.into()])
}

/// Start from `rev` (or a `from..to` range) instead of HEAD.
pub fn revision(rev: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![rev.into()])
}

/// Which parser the output of `cmd` needs.
///
/// Adds `--pretty=<LOG_FORMAT>` when the caller chose no format.
pub(crate) fn prepare_format(cmd: &mut Command) -> LogShape {
    if cmd.has_flag("--oneline") || cmd.has_flag("--graph") {
        return LogShape::Unsupported;
    }
    let chosen = cmd
        .flag_value("--pretty")
        .or_else(|| cmd.flag_value("--format"))
        .map(str::to_string);
    match chosen {
        Some(value) => LogShape::from_format(&value),
        None => {
            cmd.push_arg(format!("--pretty={LOG_FORMAT}"));
            LogShape::Records
        }
    }
}

/// Parse output of the given shape.
pub(crate) fn parse_shape(shape: LogShape, output: &str) -> Result<Vec<LogEntry>, GitError> {
    match shape {
        LogShape::Records => parse_records(output),
        LogShape::Pretty | LogShape::Raw => parse_pretty(output),
        LogShape::Unsupported => Err(GitError::parse(
            "log output in a format without commit records; use log_raw",
            output,
        )),
    }
}

impl Git {
    /// Commit history, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Parse`] for one-line, graph, or custom formats
    /// (checked before running git), and the child's error on an unborn
    /// branch or a bad revision.
    #[instrument(skip(self, opts))]
    pub fn log(&self, opts: &[GitOption]) -> Result<Vec<LogEntry>, GitError> {
        let mut cmd = self.build(["log", "--no-color"], opts);
        let shape = prepare_format(&mut cmd);
        if shape == LogShape::Unsupported {
            return parse_shape(shape, &cmd.argv().join(" "));
        }
        let out = self.execute(&cmd)?;
        parse_shape(shape, &out)
    }

    /// `git log` output exactly as printed, for formats that have no record form.
    #[instrument(skip(self, opts))]
    pub fn log_raw(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.run(["log", "--no-color"], opts)
    }
}
