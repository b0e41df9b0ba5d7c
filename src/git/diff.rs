//! git::diff
//!
//! Patches between the working tree, the index and commits. Colour and
//! external diff drivers are always disabled so the patch text is parseable.
//!
//! Summary modes (`--stat`, `--name-only`, `--raw`, ...) print no file
//! headers, so [`Git::diff`] returns an empty list for them; read them with
//! [`Git::diff_stat`] or [`Git::diff_raw`].

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::diff::{parse_diff, Diff};
use super::parse::stat::{parse_diffstat, DiffStatReport};
use super::Git;

/// Compare the index with HEAD.
pub fn cached() -> GitOption {
    flag("--cached")
}

/// Same as [`cached`].
pub fn staged() -> GitOption {
    flag("--staged")
}

pub fn name_only() -> GitOption {
    flag("--name-only")
}

pub fn name_status() -> GitOption {
    flag("--name-status")
}

pub fn stat() -> GitOption {
    flag("--stat")
}

pub fn shortstat() -> GitOption {
    flag("--shortstat")
}

pub fn numstat() -> GitOption {
    flag("--numstat")
}

pub fn patch() -> GitOption {
    flag("--patch")
}

pub fn no_patch() -> GitOption {
    flag("--no-patch")
}

pub fn raw() -> GitOption {
    flag("--raw")
}

/// `myers`, `minimal`, `patience`, or `histogram`.
pub fn algorithm(name: &str) -> GitOption {
    flag_with("--diff-algorithm", name)
}

/// Lines of context around each hunk.
pub fn context(lines: u32) -> GitOption {
    flag_with("--unified", lines)
}

pub fn ignore_space_change() -> GitOption {
    flag("--ignore-space-change")
}

pub fn ignore_all_space() -> GitOption {
    flag("--ignore-all-space")
}

pub fn ignore_space_at_eol() -> GitOption {
    flag("--ignore-space-at-eol")
}

pub fn ignore_blank_lines() -> GitOption {
    flag("--ignore-blank-lines")
}

/// Compare against `rev`.
pub fn commit(rev: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![rev.into()])
}

/// `from..to`
pub fn range(from: &str, to: &str) -> GitOption {
    GitOption::Positional(vec![format!("{from}..{to}")])
}

/// Limit to `path`.
pub fn path(path: impl Into<String>) -> GitOption {
    GitOption::Pathspec(vec![path.into()])
}

impl Git {
    /// Parsed patch, one [`Diff`] per file header.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Parse`] if a file section is malformed.
    #[instrument(skip(self, opts))]
    pub fn diff(&self, opts: &[GitOption]) -> Result<Vec<Diff>, GitError> {
        let out = self.diff_raw(opts)?;
        parse_diff(&out)
    }

    /// `diff --stat` parsed into per-file counts and the summary line.
    #[instrument(skip(self, opts))]
    pub fn diff_stat(&self, opts: &[GitOption]) -> Result<DiffStatReport, GitError> {
        let mut cmd = self.build(["diff", "--no-color", "--no-ext-diff"], opts);
        if !cmd.has_flag("--stat") {
            cmd.push_arg("--stat");
        }
        let out = self.execute(&cmd)?;
        Ok(parse_diffstat(&out))
    }

    /// Diff output exactly as printed.
    pub fn diff_raw(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.run(["diff", "--no-color", "--no-ext-diff"], opts)
    }
}
