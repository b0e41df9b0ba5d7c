//! git::parse::merge
//!
//! Merge and pull outcomes.
//!
//! A conflicted merge is a normal outcome, not an error: the façade returns
//! a [`MergeResult`] with `success == false` and the conflicted paths.

use serde::Serialize;

use super::conflict::ConflictFile;
use super::stat::{parse_diffstat, DiffMode, DiffStat, StatSummary};

/// Outcome of `merge` or `pull`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeResult {
    pub success: bool,
    pub fast_forward: bool,
    /// New merge commit, when one was created
    pub merge_commit: Option<String>,
    pub merged_branch: String,
    /// Branch checked out when the merge ran
    pub base_branch: String,
    pub strategy: String,
    pub conflicted_paths: Vec<String>,
    pub conflicts: Vec<ConflictFile>,
    pub stats: StatSummary,
    pub diff_stats: Vec<DiffStat>,
    pub diff_modes: Vec<DiffMode>,
    /// Why git refused to merge, when it did
    pub abort_reason: Option<String>,
}

impl MergeResult {
    /// Fill `fast_forward` and the diffstat fields from a successful transcript.
    pub fn apply_transcript(&mut self, output: &str) {
        self.fast_forward = output.contains("Fast-forward");
        let report = parse_diffstat(output);
        self.stats = report.summary;
        self.diff_stats = report.files;
        self.diff_modes = report.modes;
    }

    /// True when nothing was merged because the branches were already merged.
    pub fn already_up_to_date(output: &str) -> bool {
        output.contains("Already up to date") || output.contains("Already up-to-date")
    }
}

/// True when a transcript reports content conflicts.
pub fn has_conflicts(output: &str) -> bool {
    output.lines().any(|l| l.starts_with("CONFLICT"))
}

/// Recognise refusals that leave the repository untouched.
///
/// Returns the reason to put in `abort_reason`.
pub fn refusal_reason(output: &str) -> Option<String> {
    const REFUSALS: [&str; 4] = [
        "Not possible to fast-forward",
        "Not possible to fast forward",
        "would be overwritten by merge",
        "refusing to merge unrelated histories",
    ];
    output
        .lines()
        .find(|l| REFUSALS.iter().any(|r| l.contains(r)))
        .map(|l| {
            l.trim_start_matches("fatal: ")
                .trim_start_matches("error: ")
                .trim()
                .to_string()
        })
}
