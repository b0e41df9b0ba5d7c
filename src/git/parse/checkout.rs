//! git::parse::checkout
//!
//! Checkout transcripts (stdout and stderr interleaved).
//!
//! git reports checkout outcomes only as English prose, so this parser is
//! phrase driven. Run the command under the C locale
//! ([`options::locale_c`](crate::git::options::locale_c) or the `pin_locale`
//! config setting) when the host may use another language. Recognised lines:
//!
//! | Phrase                                        | Effect                       |
//! |-----------------------------------------------|------------------------------|
//! | `Switched to branch 'X'`                      | `branch = X`                 |
//! | `Switched to a new branch 'X'`                | `branch = X`, `new_branch`   |
//! | `Switched to and reset branch 'X'`            | `branch = X`, `new_branch`   |
//! | `Already on 'X'`                              | `branch = X`                 |
//! | `HEAD is now at <sha> ...`                    | `commit`, `detached_head`    |
//! | `... set up to track 'R'`                     | `upstream_branch = R`        |
//! | `Your branch is ... 'R'`                      | `upstream_branch = R`        |
//! | `M\tpath` / `A\tpath` / `D\tpath`             | `modified_paths`             |
//! | `Updated N paths from ...`                    | `restored_count`             |
//! | `warning: ...`                                | `warning`                    |
//! | untracked files would be overwritten          | `untracked_conflicts`        |

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::lines;

static SWITCHED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Switched to (a new branch|and reset branch|branch) '([^']+)'").expect("valid regex")
});

static ALREADY_ON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Already on '([^']+)'").expect("valid regex"));

static HEAD_NOW_AT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^HEAD is now at ([0-9a-fA-F]+)").expect("valid regex"));

static TRACKING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"set up to track (?:remote branch )?'([^']+)'(?: from '([^']+)')?")
        .expect("valid regex")
});

static YOUR_BRANCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Your branch (?:is up to date with|is ahead of|is behind|and) '([^']+)'")
        .expect("valid regex")
});

static UPDATED_PATHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Updated (\d+) paths? from").expect("valid regex"));

static PATH_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[MAD]\t(.+)$").expect("valid regex"));

const UNTRACKED_OVERWRITE: &str = "untracked working tree files would be overwritten";

/// Outcome of a checkout.
///
/// `previous_head`, `new_head`, and (when the transcript did not name one)
/// `branch` are filled by the façade from `rev-parse` snapshots taken around
/// the command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutResult {
    pub success: bool,
    pub previous_head: String,
    pub new_head: String,
    /// Checked-out branch; empty when detached
    pub branch: String,
    /// Abbreviated commit from `HEAD is now at`, else the full new HEAD
    pub commit: String,
    pub detached_head: bool,
    pub new_branch: bool,
    pub modified_paths: Vec<String>,
    /// Paths restored from the index or a tree-ish
    pub restored_paths: Vec<String>,
    /// Count from `Updated N paths from ...`
    pub restored_count: usize,
    pub untracked_conflicts: Vec<String>,
    pub warning: String,
    pub upstream_branch: String,
}

/// Extract everything the transcript says.
///
/// `success` is true unless the transcript reports untracked files in the way.
pub fn parse_checkout(output: &str) -> CheckoutResult {
    let mut result = CheckoutResult {
        success: true,
        ..Default::default()
    };
    let mut in_untracked_list = false;
    let mut warnings = Vec::new();

    for line in lines(output) {
        if in_untracked_list {
            if let Some(path) = line.strip_prefix('\t') {
                result.untracked_conflicts.push(path.trim().to_string());
                continue;
            }
            in_untracked_list = false;
        }

        if line.contains(UNTRACKED_OVERWRITE) {
            result.success = false;
            in_untracked_list = true;
        } else if let Some(caps) = SWITCHED.captures(line) {
            result.branch = caps[2].to_string();
            result.new_branch = &caps[1] != "branch";
            result.detached_head = false;
        } else if let Some(caps) = ALREADY_ON.captures(line) {
            result.branch = caps[1].to_string();
        } else if let Some(caps) = HEAD_NOW_AT.captures(line) {
            result.commit = caps[1].to_string();
            result.detached_head = true;
        } else if let Some(caps) = TRACKING.captures(line) {
            result.upstream_branch = match caps.get(2) {
                Some(remote) => format!("{}/{}", remote.as_str(), &caps[1]),
                None => caps[1].to_string(),
            };
        } else if let Some(caps) = YOUR_BRANCH.captures(line) {
            if result.upstream_branch.is_empty() {
                result.upstream_branch = caps[1].to_string();
            }
        } else if let Some(caps) = UPDATED_PATHS.captures(line) {
            result.restored_count = caps[1].parse().unwrap_or(0);
        } else if let Some(caps) = PATH_LINE.captures(line) {
            result.modified_paths.push(super::unquote(&caps[1]));
        } else if let Some(warning) = line.strip_prefix("warning: ") {
            warnings.push(warning.trim());
        }
    }

    result.warning = warnings.join("\n");
    result
}
