//! git::commit
//!
//! Recording changes.
//!
//! Identity comes from, in increasing precedence: repository and user
//! config, global `-c user.name=...` pairs, the environment set by
//! [`options::identity`](super::options::identity), and [`author`] (author
//! only).

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::Git;

/// `--author="Name <email>"`
pub fn author(name: &str, email: &str) -> GitOption {
    flag_with("--author", format!("{name} <{email}>"))
}

/// Stage modified and deleted tracked files first.
pub fn all() -> GitOption {
    flag("--all")
}

pub fn amend() -> GitOption {
    flag("--amend")
}

pub fn no_edit() -> GitOption {
    flag("--no-edit")
}

pub fn allow_empty() -> GitOption {
    flag("--allow-empty")
}

pub fn allow_empty_message() -> GitOption {
    flag("--allow-empty-message")
}

pub fn signoff() -> GitOption {
    flag("--signoff")
}

/// Sign with GPG, optionally with a specific key id.
pub fn gpg_sign(key_id: Option<&str>) -> GitOption {
    match key_id {
        Some(id) => flag_with("--gpg-sign", id),
        None => flag("--gpg-sign"),
    }
}

/// Skip the pre-commit and commit-msg hooks.
pub fn no_verify() -> GitOption {
    flag("--no-verify")
}

impl Git {
    /// Commit the index with `message`.
    ///
    /// # Errors
    ///
    /// Fails when there is nothing to commit (unless [`allow_empty`]) or no
    /// identity is configured.
    #[instrument(skip(self, message, opts))]
    pub fn commit(&self, message: &str, opts: &[GitOption]) -> Result<String, GitError> {
        self.run(["commit", "-m", message], opts)
    }
}
