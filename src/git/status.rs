//! git::status
//!
//! `git status`, always in porcelain v1 so the listing is parseable.

use tracing::instrument;

use super::command::Command;
use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::status::{parse_status, StatusEntry};
use super::Git;

pub fn short() -> GitOption {
    flag("--short")
}

/// Include the `## branch...upstream` header line.
pub fn branch() -> GitOption {
    flag("--branch")
}

pub fn long() -> GitOption {
    flag("--long")
}

pub fn porcelain() -> GitOption {
    flag("--porcelain")
}

pub fn show_stash() -> GitOption {
    flag("--show-stash")
}

pub fn ahead_behind() -> GitOption {
    flag("--ahead-behind")
}

/// `no`, `normal`, or `all`.
pub fn untracked_files(mode: &str) -> GitOption {
    flag_with("--untracked-files", mode)
}

/// List ignored files too (reported as `!!`).
pub fn ignored() -> GitOption {
    flag("--ignored")
}

impl Git {
    /// Working tree status.
    ///
    /// `--porcelain` is always passed; `long` or `short` options are
    /// overridden by it.
    ///
    /// # Errors
    ///
    /// A non-repository surfaces as the child's execution error
    /// ([`GitError::is_not_a_repository`]). Asking for any porcelain format
    /// other than v1 is a [`GitError::Parse`] and nothing is run.
    #[instrument(skip(self, opts))]
    pub fn status(&self, opts: &[GitOption]) -> Result<Vec<StatusEntry>, GitError> {
        let mut cmd = self.build(["status"], opts);
        ensure_porcelain_v1(&mut cmd)?;
        let out = self.execute(&cmd)?;
        parse_status(&out)
    }

    /// Status output with the branch header, unparsed.
    pub(crate) fn status_branch_raw(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.run(["status", "--porcelain", "--branch"], &Git::ambient(opts))
    }
}

/// Add `--porcelain` unless present; reject formats the parser cannot read.
fn ensure_porcelain_v1(cmd: &mut Command) -> Result<(), GitError> {
    let format = cmd
        .args()
        .iter()
        .filter_map(|a| a.strip_prefix("--porcelain="))
        .last();
    match format {
        Some("v1" | "1") => Ok(()),
        Some(other) => Err(GitError::parse(
            "status porcelain format (only v1 is supported)",
            other,
        )),
        None => {
            if !cmd.has_flag("--porcelain") {
                cmd.push_arg("--porcelain");
            }
            Ok(())
        }
    }
}
