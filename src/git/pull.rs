//! git::pull
//!
//! Fetch and integrate. The outcome is classified like a merge, with the
//! diffstat tail parsed into the result.

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::merge::MergeResult;
use super::parse::status::parse_branch_header;
use super::Git;

/// Pull from `name` (always the first positional).
pub fn remote(name: impl Into<String>) -> GitOption {
    GitOption::LeadingPositional(name.into())
}

/// The remote branch to integrate; needs a [`remote`].
pub fn branch(name: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![name.into()])
}

/// `--rebase` or `--rebase=<mode>` (`merges`, `interactive`, ...).
pub fn rebase(mode: Option<&str>) -> GitOption {
    match mode {
        Some(m) => flag_with("--rebase", m),
        None => flag("--rebase"),
    }
}

pub fn no_rebase() -> GitOption {
    flag("--no-rebase")
}

pub fn ff_only() -> GitOption {
    flag("--ff-only")
}

pub fn no_ff() -> GitOption {
    flag("--no-ff")
}

pub fn squash() -> GitOption {
    flag("--squash")
}

pub fn strategy(name: &str) -> GitOption {
    flag_with("--strategy", name)
}

pub fn all() -> GitOption {
    flag("--all")
}

pub fn tags() -> GitOption {
    flag("--tags")
}

pub fn prune() -> GitOption {
    flag("--prune")
}

impl Git {
    /// Fetch and merge (or rebase) the upstream branch.
    ///
    /// `merged_branch` in the result is the requested branch, or the
    /// configured upstream when none was given.
    ///
    /// # Errors
    ///
    /// Conflicts and fast-forward refusals are reported in the result.
    /// Diverged history with no reconcile mode configured is an error.
    #[instrument(skip(self, opts))]
    pub fn pull(&self, opts: &[GitOption]) -> Result<MergeResult, GitError> {
        let cmd = self.build(["pull"], opts);
        let merged = match cmd.positionals().get(1) {
            Some(branch) => branch.clone(),
            None => self.upstream(opts)?.unwrap_or_default(),
        };
        self.merge_flow(&cmd, merged, opts)
    }

    fn upstream(&self, opts: &[GitOption]) -> Result<Option<String>, GitError> {
        let out = self.status_branch_raw(opts)?;
        Ok(parse_branch_header(&out).and_then(|h| h.upstream))
    }
}
