//! git::repo
//!
//! Repository-level queries built on `rev-parse`.

use std::path::PathBuf;

use serde::Serialize;
use tracing::instrument;

use super::error::GitError;
use super::options::GitOption;
use super::parse::status::StatusCode;
use super::Git;
use crate::core::types::Oid;

/// Where a repository stands in the merge lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeState {
    /// No merge in progress
    Clean,
    /// `MERGE_HEAD` exists and every conflict is resolved
    Merging,
    /// `MERGE_HEAD` exists and unmerged paths remain
    MergingConflicted,
}

/// `rev-parse --verify -q` exits 1 with no output when the name does not resolve.
pub(crate) fn is_silent_miss(err: &GitError) -> bool {
    err.as_execution()
        .is_some_and(|e| e.exit_code == Some(1) && e.stderr.trim().is_empty())
}

impl Git {
    /// Whether the repository has no working tree.
    ///
    /// # Errors
    ///
    /// Fails outside a repository.
    #[instrument(skip(self, opts))]
    pub fn is_bare_repository(&self, opts: &[GitOption]) -> Result<bool, GitError> {
        let out = self.run(["rev-parse", "--is-bare-repository"], opts)?;
        Ok(out.trim() == "true")
    }

    /// Whether the working directory is inside a repository.
    ///
    /// # Errors
    ///
    /// Propagates failures other than "not a git repository".
    #[instrument(skip(self, opts))]
    pub fn is_repository(&self, opts: &[GitOption]) -> Result<bool, GitError> {
        match self.run(["rev-parse", "--git-dir"], opts) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_a_repository() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The commit HEAD points at; `None` on an unborn branch.
    #[instrument(skip(self, opts))]
    pub fn head_commit(&self, opts: &[GitOption]) -> Result<Option<Oid>, GitError> {
        self.resolve("HEAD", opts)
    }

    /// Resolve a revision to a full object id; `None` if it does not exist.
    pub fn resolve(&self, rev: &str, opts: &[GitOption]) -> Result<Option<Oid>, GitError> {
        let spec = format!("{rev}^{{commit}}");
        match self.run(["rev-parse", "--verify", "-q", spec.as_str()], opts) {
            Ok(out) => Ok(Some(Oid::new(out)?)),
            Err(e) if is_silent_miss(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The checked-out branch; `None` when HEAD is detached.
    ///
    /// An unborn branch is reported by name.
    #[instrument(skip(self, opts))]
    pub fn current_branch(&self, opts: &[GitOption]) -> Result<Option<String>, GitError> {
        match self.run(["symbolic-ref", "--short", "-q", "HEAD"], opts) {
            Ok(out) => Ok(Some(out.trim().to_string()).filter(|b| !b.is_empty())),
            Err(e) if is_silent_miss(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `rev-parse --abbrev-ref HEAD`: a branch name, the literal `HEAD` when
    /// detached, or empty when HEAD is unborn.
    pub(crate) fn abbrev_head(&self, opts: &[GitOption]) -> String {
        self.run(["rev-parse", "--abbrev-ref", "HEAD"], opts)
            .map(|o| o.trim().to_string())
            .unwrap_or_default()
    }

    /// Top level of the working tree.
    pub fn toplevel(&self, opts: &[GitOption]) -> Result<PathBuf, GitError> {
        let out = self.run(["rev-parse", "--show-toplevel"], opts)?;
        Ok(PathBuf::from(out.trim()))
    }

    /// Path of the `.git` directory, as git prints it.
    pub fn git_dir(&self, opts: &[GitOption]) -> Result<PathBuf, GitError> {
        let out = self.run(["rev-parse", "--absolute-git-dir"], opts)?;
        Ok(PathBuf::from(out.trim()))
    }

    /// Current merge lifecycle state.
    #[instrument(skip(self, opts))]
    pub fn merge_state(&self, opts: &[GitOption]) -> Result<MergeState, GitError> {
        let merging = match self.run(["rev-parse", "-q", "--verify", "MERGE_HEAD"], opts) {
            Ok(_) => true,
            Err(e) if is_silent_miss(&e) => false,
            Err(e) => return Err(e),
        };
        if !merging {
            return Ok(MergeState::Clean);
        }
        let conflicted = self
            .status(opts)?
            .iter()
            .any(|e| e.code == StatusCode::Updated);
        Ok(if conflicted {
            MergeState::MergingConflicted
        } else {
            MergeState::Merging
        })
    }
}
