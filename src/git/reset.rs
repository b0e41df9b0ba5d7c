//! git::reset

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, GitOption};
use super::Git;

pub fn soft() -> GitOption {
    flag("--soft")
}

pub fn mixed() -> GitOption {
    flag("--mixed")
}

pub fn hard() -> GitOption {
    flag("--hard")
}

pub fn merge() -> GitOption {
    flag("--merge")
}

pub fn keep() -> GitOption {
    flag("--keep")
}

pub fn recurse_submodules() -> GitOption {
    flag("--recurse-submodules")
}

/// Reset to `rev` instead of `HEAD`.
pub fn commit(rev: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![rev.into()])
}

impl Git {
    /// Reset HEAD, the index, or `paths`.
    ///
    /// With paths, only those index entries are reset.
    #[instrument(skip(self, paths, opts), fields(paths = paths.len()))]
    pub fn reset<S: AsRef<str>>(&self, paths: &[S], opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["reset"], opts);
        for path in paths {
            cmd.push_pathspec(path.as_ref());
        }
        self.execute(&cmd)
    }
}
