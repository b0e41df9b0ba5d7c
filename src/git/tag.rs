//! git::tag

use std::path::Path;

use tracing::instrument;

use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::branch::parse_name_list;
use super::parse::remote::Remote;
use super::push;
use super::Git;
use crate::core::types::RefName;

/// Create an annotated tag object.
pub fn annotated() -> GitOption {
    flag("--annotate")
}

/// Tag message; implies an annotated tag.
pub fn message(text: &str) -> GitOption {
    GitOption::Args(vec!["-m".into(), text.into()])
}

/// Read the message from `path`.
pub fn file(path: impl AsRef<Path>) -> GitOption {
    flag_with("--file", path.as_ref().display())
}

pub fn sign() -> GitOption {
    flag("--sign")
}

pub fn local_user(key_id: &str) -> GitOption {
    flag_with("--local-user", key_id)
}

/// Replace an existing tag.
pub fn force() -> GitOption {
    flag("--force")
}

/// `refname`, `-version:refname`, `creatordate`, ...
pub fn sort(key: &str) -> GitOption {
    flag_with("--sort", key)
}

pub fn merged(rev: &str) -> GitOption {
    flag_with("--merged", rev)
}

pub fn no_merged(rev: &str) -> GitOption {
    flag_with("--no-merged", rev)
}

pub fn contains(rev: &str) -> GitOption {
    flag_with("--contains", rev)
}

pub fn no_contains(rev: &str) -> GitOption {
    flag_with("--no-contains", rev)
}

pub fn points_at(rev: &str) -> GitOption {
    flag_with("--points-at", rev)
}

/// A `for-each-ref` format for listings; each line is returned verbatim.
pub fn format(value: &str) -> GitOption {
    flag_with("--format", value)
}

/// What to tag; HEAD otherwise.
pub fn commit(rev: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![rev.into()])
}

impl Git {
    /// Create tag `name`.
    #[instrument(skip(self, opts))]
    pub fn tag(&self, name: &str, opts: &[GitOption]) -> Result<String, GitError> {
        RefName::for_tag(name)?;
        let mut cmd = self.build(["tag"], opts);
        cmd.insert_positional(0, name);
        self.execute(&cmd)
    }

    /// Tag names, one per line of `tag --list`; empty when there are none.
    #[instrument(skip(self, opts))]
    pub fn list_tags(&self, opts: &[GitOption]) -> Result<Vec<String>, GitError> {
        let out = self.run(["tag", "--list"], opts)?;
        Ok(parse_name_list(&out))
    }

    #[instrument(skip(self, opts))]
    pub fn delete_tag(&self, name: &str, opts: &[GitOption]) -> Result<String, GitError> {
        let mut cmd = self.build(["tag", "--delete"], opts);
        cmd.push_positional(name);
        self.execute(&cmd)
    }

    /// Push every local tag to `remote`.
    #[instrument(skip(self, opts))]
    pub fn push_tags(&self, remote: &str, opts: &[GitOption]) -> Result<Vec<Remote>, GitError> {
        let mut all = vec![push::remote(remote), push::tags()];
        all.extend_from_slice(opts);
        self.push(&all)
    }

    /// Delete tag `name` on `remote`; the local tag is kept.
    #[instrument(skip(self, opts))]
    pub fn delete_remote_tag(
        &self,
        remote: &str,
        name: &str,
        opts: &[GitOption],
    ) -> Result<Vec<Remote>, GitError> {
        let tag = RefName::for_tag(name)?;
        let mut all = vec![
            push::remote(remote),
            push::delete(),
            push::branch(tag.as_str()),
        ];
        all.extend_from_slice(opts);
        self.push(&all)
    }
}
