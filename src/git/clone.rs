//! git::clone

use std::path::Path;

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::Git;

pub fn bare() -> GitOption {
    flag("--bare")
}

/// Shallow clone with `depth` commits.
pub fn depth(depth: u32) -> GitOption {
    flag_with("--depth", depth)
}

pub fn single_branch() -> GitOption {
    flag("--single-branch")
}

/// Check out `name` instead of the remote's HEAD.
pub fn branch(name: &str) -> GitOption {
    flag_with("--branch", name)
}

pub fn mirror() -> GitOption {
    flag("--mirror")
}

pub fn reference(repo: impl AsRef<Path>) -> GitOption {
    flag_with("--reference", repo.as_ref().display())
}

pub fn no_checkout() -> GitOption {
    flag("--no-checkout")
}

pub fn recurse_submodules() -> GitOption {
    flag("--recurse-submodules")
}

/// Write `key=value` into the new repository's config.
///
/// Unlike [`options::config`](super::options::config) this persists.
pub fn config(key: &str, value: &str) -> GitOption {
    GitOption::Args(vec!["--config".into(), format!("{key}={value}")])
}

impl Git {
    /// Clone `url` into `destination`.
    ///
    /// # Errors
    ///
    /// A non-empty destination fails with an execution error for which
    /// [`ExecutionError::is_destination_exists`](super::ExecutionError::is_destination_exists)
    /// holds.
    #[instrument(skip(self, destination, opts), fields(destination = %destination.as_ref().display()))]
    pub fn clone_repo(
        &self,
        url: &str,
        destination: impl AsRef<Path>,
        opts: &[GitOption],
    ) -> Result<String, GitError> {
        let mut cmd = self.build(["clone"], opts);
        cmd.push_positional(url);
        cmd.push_positional(destination.as_ref().display().to_string());
        self.execute(&cmd)
    }
}
