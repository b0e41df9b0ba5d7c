//! git::checkout
//!
//! Switching branches and restoring files.
//!
//! The transcript only tells part of the story, so HEAD is read before and
//! after the checkout and the result's branch, commit and detached state come
//! from those reads.

use tracing::instrument;

use super::error::GitError;
use super::exec;
use super::options::{flag, flag_with, GitOption};
use super::parse::checkout::{parse_checkout, CheckoutResult};
use super::parse::status::parse_branch_header;
use super::Git;

/// Branch or commit to check out.
pub fn branch(name: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![name.into()])
}

/// `-b <name>`
pub fn create_new(name: &str) -> GitOption {
    GitOption::Args(vec!["-b".into(), name.into()])
}

/// `-B <name>`: create, or reset an existing branch.
pub fn create_new_force(name: &str) -> GitOption {
    GitOption::Args(vec!["-B".into(), name.into()])
}

pub fn detach() -> GitOption {
    flag("--detach")
}

/// Discard local changes in the way.
pub fn force() -> GitOption {
    flag("--force")
}

/// Carry local changes over with a three-way merge.
pub fn merge() -> GitOption {
    flag("--merge")
}

/// `merge`, `diff3`, or `zdiff3`.
pub fn conflict(style: &str) -> GitOption {
    flag_with("--conflict", style)
}

pub fn patch() -> GitOption {
    flag("--patch")
}

/// Start an unborn branch `name` with no history.
pub fn orphan(name: &str) -> GitOption {
    GitOption::Args(vec!["--orphan".into(), name.into()])
}

pub fn track() -> GitOption {
    flag("--track")
}

/// Restore `paths` instead of switching branches.
pub fn files<I, S>(paths: I) -> GitOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    super::options::pathspec(paths)
}

impl Git {
    /// Check out a branch, a commit, or files.
    ///
    /// Untracked files in the way are reported with `success == false` and
    /// `untracked_conflicts`; other failures are errors.
    #[instrument(skip(self, opts))]
    pub fn checkout(&self, opts: &[GitOption]) -> Result<CheckoutResult, GitError> {
        let ambient = Git::ambient(opts);
        let cmd = self.build(["checkout"], opts);
        let previous = self.head_commit(&ambient)?;

        let mut result = match exec::execute_combined(&cmd) {
            Ok(out) => parse_checkout(&out),
            Err(GitError::Execution(err)) => {
                let parsed = parse_checkout(&format!("{}{}", err.stdout, err.stderr));
                if parsed.success {
                    return Err(GitError::Execution(err));
                }
                parsed
            }
            Err(e) => return Err(e),
        };
        result.previous_head = previous.map(String::from).unwrap_or_default();
        if !result.success {
            result.new_head = result.previous_head.clone();
            return Ok(result);
        }

        let new_head = self.head_commit(&ambient)?;
        result.new_head = new_head.map(String::from).unwrap_or_default();
        match self.abbrev_head(&ambient).as_str() {
            "HEAD" => {
                result.detached_head = true;
                result.branch.clear();
                result.commit = result.new_head.clone();
            }
            "" => {
                // Unborn branch, e.g. after --orphan
                result.detached_head = false;
                let header = parse_branch_header(&self.status_branch_raw(&ambient)?);
                if let Some(name) = header.and_then(|h| h.branch) {
                    result.branch = name;
                }
            }
            name => {
                result.detached_head = false;
                result.branch = name.to_string();
                result.commit = result.new_head.clone();
            }
        }

        if ["-b", "-B", "--orphan"].iter().any(|f| cmd.has_flag(f)) {
            result.new_branch = true;
        }
        if result.restored_count > 0 && result.restored_paths.is_empty() {
            result.restored_paths = cmd.pathspecs().to_vec();
        }
        Ok(result)
    }
}
