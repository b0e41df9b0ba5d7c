//! git::add
//!
//! Staging changes.

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, GitOption};
use super::Git;

pub fn force() -> GitOption {
    flag("--force")
}

pub fn dry_run() -> GitOption {
    flag("--dry-run")
}

pub fn all() -> GitOption {
    flag("--all")
}

/// Stage modifications and deletions of tracked files only.
pub fn update() -> GitOption {
    flag("--update")
}

pub fn no_ignore_removal() -> GitOption {
    flag("--no-ignore-removal")
}

pub fn ignore_errors() -> GitOption {
    flag("--ignore-errors")
}

pub fn intent_to_add() -> GitOption {
    flag("--intent-to-add")
}

/// Interactive hunk selection; the answers must come from [`stdin`](super::options::stdin).
pub fn patch() -> GitOption {
    flag("--patch")
}

impl Git {
    /// Stage `paths` (placed after `--`).
    ///
    /// With no paths, only what the options select is staged (e.g. [`all`]).
    #[instrument(skip(self, paths, opts), fields(paths = paths.len()))]
    pub fn add<S: AsRef<str>>(&self, paths: &[S], opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["add"], opts);
        for path in paths {
            cmd.push_pathspec(path.as_ref());
        }
        self.execute(&cmd)
    }
}
