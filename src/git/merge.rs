//! git::merge
//!
//! Merging and the merge lifecycle.
//!
//! ```text
//! Clean --merge--> Merging | MergingConflicted
//! MergingConflicted --resolve_conflicts--> Merging
//! Merging --merge_continue--> Clean
//! any --merge_abort--> Clean
//! ```
//!
//! A merge that stops on conflicts returns `Ok` with `success == false`; the
//! conflicted files are read from the working tree and parsed into
//! [`ConflictFile`]s. [`Git::merge_state`] reports where a repository stands.

use std::path::Path;

use tracing::{debug, instrument};

use super::command::Command;
use super::error::GitError;
use super::exec;
use super::options::{flag, flag_with, GitOption};
use super::parse::conflict::{
    apply_resolutions, parse_conflict_sections, ConflictFile, ConflictResolution, ConflictStatus,
};
use super::parse::merge::{has_conflicts, refusal_reason, MergeResult};
use super::parse::status::StatusCode;
use super::Git;

/// The branch or commit to merge.
pub fn branch(name: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![name.into()])
}

pub fn no_ff() -> GitOption {
    flag("--no-ff")
}

pub fn ff_only() -> GitOption {
    flag("--ff-only")
}

pub fn squash() -> GitOption {
    flag("--squash")
}

pub fn no_commit() -> GitOption {
    flag("--no-commit")
}

/// `ort`, `recursive`, `resolve`, `octopus`, `ours`, or `subtree`.
pub fn strategy(name: &str) -> GitOption {
    flag_with("--strategy", name)
}

pub fn strategy_option(value: &str) -> GitOption {
    flag_with("--strategy-option", value)
}

pub fn message(text: &str) -> GitOption {
    GitOption::Args(vec!["-m".into(), text.into()])
}

pub fn edit() -> GitOption {
    flag("--edit")
}

pub fn no_edit() -> GitOption {
    flag("--no-edit")
}

pub fn sign() -> GitOption {
    flag("--gpg-sign")
}

pub fn no_sign() -> GitOption {
    flag("--no-gpg-sign")
}

/// Add up to `n` one-line commit descriptions to the merge message.
pub fn log(n: Option<u32>) -> GitOption {
    match n {
        Some(n) => flag_with("--log", n),
        None => flag("--log"),
    }
}

pub fn stat() -> GitOption {
    flag("--stat")
}

pub fn allow_unrelated_histories() -> GitOption {
    flag("--allow-unrelated-histories")
}

/// Same as [`Git::merge_abort`] when passed to [`Git::merge`].
pub fn abort() -> GitOption {
    flag("--abort")
}

/// Same as [`Git::merge_continue`] when passed to [`Git::merge`].
pub fn continue_merge() -> GitOption {
    flag("--continue")
}

impl Git {
    /// Merge the branches given with [`branch`] into the current branch.
    ///
    /// # Errors
    ///
    /// Conflicts and refusals (`--ff-only` on diverged history, local changes
    /// in the way) are reported in the result. Anything else git rejects,
    /// including a merge started while conflicts remain, is an error.
    #[instrument(skip(self, opts))]
    pub fn merge(&self, opts: &[GitOption]) -> Result<MergeResult, GitError> {
        let cmd = self.build(["merge"], opts);
        let merged = cmd.positionals().join(" ");
        self.merge_flow(&cmd, merged, opts)
    }

    /// Drop an in-progress merge and restore the pre-merge state.
    #[instrument(skip(self, opts))]
    pub fn merge_abort(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.run(["merge", "--abort"], opts)
    }

    /// Conclude a merge whose conflicts are resolved and staged.
    ///
    /// # Errors
    ///
    /// Fails while unmerged paths remain or when no merge is in progress.
    #[instrument(skip(self, opts))]
    pub fn merge_continue(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.run(["merge", "--continue"], opts)
    }

    /// Resolve and stage conflicted paths.
    ///
    /// Paths are relative to the top of the working tree. Only the ambient
    /// options (working directory, environment, deadline) are used.
    #[instrument(skip(self, resolutions, opts), fields(count = resolutions.len()))]
    pub fn resolve_conflicts(
        &self,
        resolutions: &[ConflictResolution],
        opts: &[GitOption],
    ) -> Result<(), GitError> {
        let mut ambient = Git::ambient(opts);
        let root = self.toplevel(&ambient)?;
        ambient.push(GitOption::WorkingDir(root.clone()));

        for resolution in resolutions {
            let path = resolution.path.as_str();
            if resolution.use_ours || resolution.use_theirs {
                let side = if resolution.use_ours { "--ours" } else { "--theirs" };
                let mut cmd = self.build(["checkout", side], &ambient);
                cmd.push_pathspec(path);
                self.execute(&cmd)?;
            } else if resolution.custom {
                write_resolved(&root, resolution)?;
            }
            self.add(&[path], &ambient)?;
            debug!(path, "resolved conflict");
        }
        Ok(())
    }

    /// Run a merge-shaped command (`merge`, `pull`) and classify the outcome.
    pub(crate) fn merge_flow(
        &self,
        cmd: &Command,
        merged_branch: String,
        opts: &[GitOption],
    ) -> Result<MergeResult, GitError> {
        let ambient = Git::ambient(opts);
        let before = self.head_commit(&ambient)?;
        let strategy = cmd
            .flag_value("--strategy")
            .or_else(|| cmd.flag_value("-s"))
            .unwrap_or_default()
            .to_string();
        let mut result = MergeResult {
            merged_branch,
            base_branch: self.current_branch(&ambient)?.unwrap_or_default(),
            strategy,
            ..Default::default()
        };

        match exec::execute_with_stderr(cmd) {
            Ok(output) => {
                result.success = true;
                result.apply_transcript(&output.stdout);
                let after = self.head_commit(&ambient)?;
                if !result.fast_forward && after != before {
                    result.merge_commit = after.map(String::from);
                }
                Ok(result)
            }
            Err(GitError::Execution(err)) => {
                let transcript = format!("{}\n{}", err.stdout, err.stderr);
                if has_conflicts(&transcript) {
                    result.apply_transcript(&err.stdout);
                    self.collect_conflicts(&mut result, &ambient)?;
                    Ok(result)
                } else if let Some(reason) = refusal_reason(&transcript) {
                    result.abort_reason = Some(reason);
                    Ok(result)
                } else {
                    Err(GitError::Execution(err))
                }
            }
            Err(e) => Err(e),
        }
    }

    fn collect_conflicts(
        &self,
        result: &mut MergeResult,
        ambient: &[GitOption],
    ) -> Result<(), GitError> {
        let root = self.toplevel(ambient)?;
        let mut ambient = ambient.to_vec();
        ambient.push(GitOption::WorkingDir(root.clone()));

        for entry in self.status(&ambient)? {
            if entry.code != StatusCode::Updated {
                continue;
            }
            let raw_content = read_worktree_file(&root, &entry.path)?;
            result.conflicts.push(ConflictFile {
                path: entry.path.clone(),
                status: ConflictStatus::from_code(&entry.raw_code)
                    .unwrap_or(ConflictStatus::BothModified),
                sections: parse_conflict_sections(&raw_content),
                raw_content,
            });
            result.conflicted_paths.push(entry.path);
        }
        // Conflicts are the only outcome without a fast-forward
        result.fast_forward = false;
        Ok(())
    }
}

/// File contents, or empty when the file is gone or not text.
fn read_worktree_file(root: &Path, path: &str) -> Result<String, GitError> {
    match std::fs::read_to_string(root.join(path)) {
        Ok(text) => Ok(text),
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::InvalidData
            ) =>
        {
            Ok(String::new())
        }
        Err(e) => Err(GitError::io(format!("failed to read {path}"), e)),
    }
}

fn write_resolved(root: &Path, resolution: &ConflictResolution) -> Result<(), GitError> {
    let file = root.join(&resolution.path);
    let raw = std::fs::read_to_string(&file)
        .map_err(|e| GitError::io(format!("failed to read {}", resolution.path), e))?;
    let resolved = apply_resolutions(&raw, &resolution.sections);
    std::fs::write(&file, resolved)
        .map_err(|e| GitError::io(format!("failed to write {}", resolution.path), e))
}
