//! git::branch
//!
//! Listing, creating and deleting branches. None of these need a working
//! tree, so they work in bare repositories.

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::branch::{parse_branch_list, Branch};
use super::Git;
use crate::core::types::BranchName;

/// List remote-tracking branches.
pub fn remote() -> GitOption {
    flag("--remotes")
}

/// List local and remote-tracking branches.
pub fn all() -> GitOption {
    flag("--all")
}

pub fn verbose() -> GitOption {
    flag("--verbose")
}

/// Only branches merged into `rev` (HEAD when `None`).
pub fn merged(rev: Option<&str>) -> GitOption {
    match rev {
        Some(r) => flag_with("--merged", r),
        None => flag("--merged"),
    }
}

pub fn no_merged(rev: Option<&str>) -> GitOption {
    match rev {
        Some(r) => flag_with("--no-merged", r),
        None => flag("--no-merged"),
    }
}

pub fn contains(rev: &str) -> GitOption {
    flag_with("--contains", rev)
}

pub fn no_contains(rev: &str) -> GitOption {
    flag_with("--no-contains", rev)
}

/// On delete, drop unmerged branches too (`-D`); on create, reset an existing branch.
pub fn force() -> GitOption {
    flag("--force")
}

/// Where a new branch starts; HEAD otherwise.
pub fn start_point(rev: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![rev.into()])
}

impl Git {
    /// Branches in the repository; an unborn HEAD lists nothing.
    #[instrument(skip(self, opts))]
    pub fn list_branches(&self, opts: &[GitOption]) -> Result<Vec<Branch>, GitError> {
        let out = self.run(["branch", "--list", "--no-color"], opts)?;
        Ok(parse_branch_list(&out))
    }

    /// Create `name` without checking it out.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Type`] for a name git would reject, before running it.
    #[instrument(skip(self, opts))]
    pub fn create_branch(&self, name: &str, opts: &[GitOption]) -> Result<BranchName, GitError> {
        let branch = BranchName::new(name)?;
        let mut cmd = self.build(["branch"], opts);
        cmd.insert_positional(0, branch.as_str());
        self.execute(&cmd)?;
        Ok(branch)
    }

    /// Delete `name`.
    ///
    /// # Errors
    ///
    /// An unmerged branch is refused unless [`force`] is given.
    #[instrument(skip(self, opts))]
    pub fn delete_branch(&self, name: &str, opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["branch", "--delete"], opts);
        cmd.push_positional(name);
        self.execute(&cmd)
    }

    /// Make `branch` track `upstream` (`origin/main`).
    #[instrument(skip(self, opts))]
    pub fn set_upstream(
        &self,
        branch: &str,
        upstream: &str,
        opts: &[GitOption],
    ) -> Result<String, GitError> {
        let mut cmd = self.build(["branch"], opts);
        cmd.push_arg(format!("--set-upstream-to={upstream}"));
        cmd.push_positional(branch);
        self.execute(&cmd)
    }
}
