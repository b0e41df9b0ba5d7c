//! git::rm

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

/// Allow removing directories (`-r`).
pub fn recursive() -> GitOption {
    flag("-r")
}

/// Remove from the index only, keeping the working tree file.
pub fn cached() -> GitOption {
    flag("--cached")
}

pub fn ignore_unmatch() -> GitOption {
    flag("--ignore-unmatch")
}

/// Read pathspecs from `file` (`-` for stdin).
pub fn pathspec_from_file(file: &str) -> GitOption {
    super::options::flag_with("--pathspec-from-file", file)
}

/// Paths to remove; equivalent to passing them to [`Git::remove`].
pub fn files<I, S>(paths: I) -> GitOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    super::options::pathspec(paths)
}

impl Git {
    /// Remove files from the index and working tree.
    #[instrument(skip(self, paths, opts), fields(paths = paths.len()))]
    pub fn remove<S: AsRef<str>>(&self, paths: &[S], opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["rm"], opts);
        for path in paths {
            cmd.push_pathspec(path.as_ref());
        }
        self.execute(&cmd)
    }
}
