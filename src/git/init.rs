//! git::init

use std::path::Path;

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::Git;

pub fn bare() -> GitOption {
    flag("--bare")
}

pub fn initial_branch(name: &str) -> GitOption {
    flag_with("--initial-branch", name)
}

pub fn separate_git_dir(dir: impl AsRef<Path>) -> GitOption {
    flag_with("--separate-git-dir", dir.as_ref().display())
}

/// `--shared` or `--shared=<perm>` (`group`, `all`, `0660`, ...).
pub fn shared(permissions: Option<&str>) -> GitOption {
    match permissions {
        Some(p) => flag_with("--shared", p),
        None => flag("--shared"),
    }
}

pub fn template(dir: impl AsRef<Path>) -> GitOption {
    flag_with("--template", dir.as_ref().display())
}

impl Git {
    /// Create or reinitialise a repository at `path`.
    ///
    /// The façade's working directory is left unchanged; bind to the new
    /// repository with [`Git::with_workdir`].
    #[instrument(skip(self, path, opts), fields(path = %path.as_ref().display()))]
    pub fn init(&self, path: impl AsRef<Path>, opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["init"], opts);
        cmd.push_positional(path.as_ref().display().to_string());
        self.execute(&cmd)
    }
}
