//! git::remote
//!
//! Managing remotes. Listing uses `remote -v`, one [`Remote`] per name.

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::remote::{parse_remote_list, Remote};
use super::Git;

/// Track only `branch` (`-t`); repeatable.
pub fn track(branch: &str) -> GitOption {
    GitOption::Args(vec!["-t".into(), branch.into()])
}

/// Point `refs/remotes/<name>/HEAD` at `branch` (`-m`).
pub fn master(branch: &str) -> GitOption {
    GitOption::Args(vec!["-m".into(), branch.into()])
}

/// Fetch right after adding (`-f`).
pub fn fetch_on_add() -> GitOption {
    flag("-f")
}

/// `fetch` or `push` mirror.
pub fn mirror(mode: &str) -> GitOption {
    flag_with("--mirror", mode)
}

/// Change the push URL rather than the fetch URL.
pub fn push_url() -> GitOption {
    flag("--push")
}

/// Add a URL instead of replacing.
pub fn add_url() -> GitOption {
    flag("--add")
}

impl Git {
    #[instrument(skip(self, opts))]
    pub fn add_remote(&self, name: &str, url: &str, opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["remote", "add"], opts);
        cmd.push_positional(name);
        cmd.push_positional(url);
        self.execute(&cmd)
    }

    /// Remove `name` and its remote-tracking branches.
    #[instrument(skip(self, opts))]
    pub fn remove_remote(&self, name: &str, opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["remote", "remove"], opts);
        cmd.push_positional(name);
        self.execute(&cmd)
    }

    #[instrument(skip(self, opts))]
    pub fn set_remote_url(
        &self,
        name: &str,
        url: &str,
        opts: &[GitOption],
    ) -> Result<String, GitError> {
        let mut cmd = self.build(["remote", "set-url"], opts);
        cmd.push_positional(name);
        cmd.push_positional(url);
        self.execute(&cmd)
    }

    /// Configured remotes in listing order; `refs` is always empty.
    #[instrument(skip(self, opts))]
    pub fn list_remotes(&self, opts: &[GitOption]) -> Result<Vec<Remote>, GitError> {
        let out = self.run(["remote", "-v"], opts)?;
        Ok(parse_remote_list(&out))
    }
}
