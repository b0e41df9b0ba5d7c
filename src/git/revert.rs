//! git::revert

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::Git;

pub fn edit() -> GitOption {
    flag("--edit")
}

pub fn no_edit() -> GitOption {
    flag("--no-edit")
}

/// Parent number to revert against when reverting a merge.
pub fn mainline(parent: u32) -> GitOption {
    flag_with("--mainline", parent)
}

/// Apply the inverse to the index and working tree without committing.
pub fn no_commit() -> GitOption {
    flag("--no-commit")
}

pub fn signoff() -> GitOption {
    flag("--signoff")
}

pub fn strategy(name: &str) -> GitOption {
    flag_with("--strategy", name)
}

pub fn strategy_option(value: &str) -> GitOption {
    flag_with("--strategy-option", value)
}

/// The commit to revert; repeatable.
pub fn commit(id: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![id.into()])
}

impl Git {
    /// Record commits that undo the given ones.
    #[instrument(skip(self, opts))]
    pub fn revert(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.run(["revert"], opts)
    }
}
