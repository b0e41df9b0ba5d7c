//! git::rebase
//!
//! The todo list and commit messages go through `GIT_EDITOR`, which the
//! façade sets to `true`, so an interactive rebase runs the list unchanged
//! unless an [`exec`] or a custom sequence editor says otherwise.

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::Git;

/// Rebase onto `rev`.
pub fn upstream(rev: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![rev.into()])
}

/// Check out `name` first; follows [`upstream`].
pub fn branch(name: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![name.into()])
}

pub fn onto(rev: &str) -> GitOption {
    flag_with("--onto", rev)
}

pub fn interactive() -> GitOption {
    flag("--interactive")
}

/// Run `command` after each rewritten commit.
pub fn exec(command: &str) -> GitOption {
    flag_with("--exec", command)
}

pub fn root() -> GitOption {
    flag("--root")
}

pub fn autosquash() -> GitOption {
    flag("--autosquash")
}

pub fn autostash() -> GitOption {
    flag("--autostash")
}

pub fn keep_empty() -> GitOption {
    flag("--keep-empty")
}

/// Drop commits that become empty.
pub fn skip_empty() -> GitOption {
    flag_with("--empty", "drop")
}

/// git 2.34 removed `--preserve-merges`; this asks for `--rebase-merges`.
pub fn preserve_merges() -> GitOption {
    rebase_merges()
}

pub fn rebase_merges() -> GitOption {
    flag("--rebase-merges")
}

pub fn continue_rebase() -> GitOption {
    flag("--continue")
}

pub fn skip() -> GitOption {
    flag("--skip")
}

pub fn abort() -> GitOption {
    flag("--abort")
}

pub fn quit() -> GitOption {
    flag("--quit")
}

pub fn edit_todo() -> GitOption {
    flag("--edit-todo")
}

pub fn show_current_patch() -> GitOption {
    flag("--show-current-patch")
}

impl Git {
    /// Reapply commits on top of another base, or drive a rebase in progress
    /// with [`continue_rebase`], [`skip`], [`abort`], or [`quit`].
    ///
    /// # Errors
    ///
    /// A rebase stopped by conflicts exits non-zero and is an error; the
    /// repository is left mid-rebase.
    #[instrument(skip(self, opts))]
    pub fn rebase(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.run(["rebase"], opts)
    }
}
