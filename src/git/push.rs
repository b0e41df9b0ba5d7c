//! git::push
//!
//! The human transcript goes to stderr. With [`porcelain`] git prints a
//! tab-separated report on stdout instead; both parse to the same records.

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::remote::Remote;
use super::parse::transfer::parse_transcript;
use super::Git;

/// Push to `name` (always the first positional).
pub fn remote(name: impl Into<String>) -> GitOption {
    GitOption::LeadingPositional(name.into())
}

/// A branch or refspec to push; needs a [`remote`].
pub fn branch(name: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![name.into()])
}

pub fn force() -> GitOption {
    flag("--force")
}

/// `--force-with-lease`, optionally pinned to `ref[:expect]`.
pub fn force_with_lease(lease: Option<&str>) -> GitOption {
    match lease {
        Some(l) => flag_with("--force-with-lease", l),
        None => flag("--force-with-lease"),
    }
}

pub fn all() -> GitOption {
    flag("--all")
}

pub fn tags() -> GitOption {
    flag("--tags")
}

pub fn follow_tags() -> GitOption {
    flag("--follow-tags")
}

pub fn set_upstream() -> GitOption {
    flag("--set-upstream")
}

pub fn dry_run() -> GitOption {
    flag("--dry-run")
}

/// Delete the named refs on the remote.
pub fn delete() -> GitOption {
    flag("--delete")
}

pub fn atomic() -> GitOption {
    flag("--atomic")
}

pub fn porcelain() -> GitOption {
    flag("--porcelain")
}

impl Git {
    /// Update remote refs; one [`Remote`] per `To` header.
    ///
    /// # Errors
    ///
    /// A rejected push exits non-zero and surfaces as an execution error;
    /// the transcript is in its `stderr`.
    #[instrument(skip(self, opts))]
    pub fn push(&self, opts: &[GitOption]) -> Result<Vec<Remote>, GitError> {
        let mut cmd = self.build(["push"], opts);
        cmd.set_stderr_primary(!cmd.has_flag("--porcelain"));
        let out = self.execute(&cmd)?;
        Ok(parse_transcript(&out))
    }
}
