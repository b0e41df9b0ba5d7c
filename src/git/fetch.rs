//! git::fetch
//!
//! Git reports ref updates on stderr, so the façade reads that stream.

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::remote::Remote;
use super::parse::transfer::parse_transcript;
use super::Git;

pub fn all() -> GitOption {
    flag("--all")
}

pub fn prune() -> GitOption {
    flag("--prune")
}

pub fn prune_tags() -> GitOption {
    flag("--prune-tags")
}

pub fn tags() -> GitOption {
    flag("--tags")
}

pub fn no_tags() -> GitOption {
    flag("--no-tags")
}

pub fn depth(depth: u32) -> GitOption {
    flag_with("--depth", depth)
}

/// Fetch from `name` (always the first positional).
pub fn remote(name: impl Into<String>) -> GitOption {
    GitOption::LeadingPositional(name.into())
}

/// A refspec to fetch; needs a [`remote`].
pub fn refspec(spec: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![spec.into()])
}

pub fn force() -> GitOption {
    flag("--force")
}

pub fn dry_run() -> GitOption {
    flag("--dry-run")
}

pub fn refetch() -> GitOption {
    flag("--refetch")
}

impl Git {
    /// Download objects and refs; one [`Remote`] per `From` header.
    ///
    /// Nothing new to fetch yields an empty list.
    #[instrument(skip(self, opts))]
    pub fn fetch(&self, opts: &[GitOption]) -> Result<Vec<Remote>, GitError> {
        let mut cmd = self.build(["fetch"], opts);
        cmd.set_stderr_primary(true);
        let out = self.execute(&cmd)?;
        Ok(parse_transcript(&out))
    }
}
