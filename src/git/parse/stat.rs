//! git::parse::stat
//!
//! Diffstat tails printed by merge, pull, and `--stat`:
//!
//! ```text
//!  src/lib.rs | 4 ++--
//!  logo.png   | Bin 0 -> 1024 bytes
//!  2 files changed, 2 insertions(+), 2 deletions(-)
//!  create mode 100644 logo.png
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::lines;

static FILE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s(.+?)\s+\|\s+(?:(\d+)\s*([+\-]*)|Bin (\d+) -> (\d+) bytes)\s*$")
        .expect("valid regex")
});

static SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\d+) files? changed(?:, (\d+) insertions?\(\+\))?(?:, (\d+) deletions?\(-\))?",
    )
    .expect("valid regex")
});

static MODE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s(create|delete) mode (\d+) (.+)$").expect("valid regex")
});

static MODE_CHANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\smode change (\d+) => (\d+) (.+)$").expect("valid regex")
});

/// Totals from the `N files changed` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatSummary {
    pub files_changed: u32,
    pub insertions: u32,
    pub deletions: u32,
}

/// One per-file diffstat row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffStat {
    pub path: String,
    /// Changed line count; zero for binary files
    pub changes: u32,
    /// The `+`/`-` bar as printed (scaled by git, not a count)
    pub graph: String,
    pub binary: bool,
}

/// What happened to a file's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeAction {
    Create,
    Delete,
    Change,
}

/// A `create mode` / `delete mode` / `mode change` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffMode {
    pub action: ModeAction,
    /// The new mode (or removed mode for deletes)
    pub mode: String,
    /// Previous mode, for mode changes
    pub old_mode: Option<String>,
    pub path: String,
}

/// Everything recognised in a diffstat tail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStatReport {
    pub files: Vec<DiffStat>,
    pub modes: Vec<DiffMode>,
    pub summary: StatSummary,
}

/// Collect diffstat rows from anywhere in `output`; other lines are ignored.
pub fn parse_diffstat(output: &str) -> DiffStatReport {
    let mut report = DiffStatReport::default();
    for line in lines(output) {
        if let Some(caps) = SUMMARY.captures(line) {
            let num = |i| caps.get(i).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
            report.summary = StatSummary {
                files_changed: num(1),
                insertions: num(2),
                deletions: num(3),
            };
        } else if let Some(caps) = MODE_CHANGE.captures(line) {
            report.modes.push(DiffMode {
                action: ModeAction::Change,
                mode: caps[2].to_string(),
                old_mode: Some(caps[1].to_string()),
                path: caps[3].to_string(),
            });
        } else if let Some(caps) = MODE_LINE.captures(line) {
            let action = if &caps[1] == "create" {
                ModeAction::Create
            } else {
                ModeAction::Delete
            };
            report.modes.push(DiffMode {
                action,
                mode: caps[2].to_string(),
                old_mode: None,
                path: caps[3].to_string(),
            });
        } else if let Some(caps) = FILE_LINE.captures(line) {
            let binary = caps.get(4).is_some();
            report.files.push(DiffStat {
                path: caps[1].trim().to_string(),
                changes: caps
                    .get(2)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0),
                graph: caps.get(3).map_or("", |m| m.as_str()).to_string(),
                binary,
            });
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const PULL_TAIL: &str = "\
Updating 1a2b3c4..5d6e7f8
Fast-forward
 src/lib.rs | 4 ++--
 logo.png   | Bin 0 -> 1024 bytes
 2 files changed, 2 insertions(+), 2 deletions(-)
 create mode 100644 logo.png
 mode change 100644 => 100755 run.sh
";

    #[test]
    fn parses_all_rows() {
        let report = parse_diffstat(PULL_TAIL);
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].path, "src/lib.rs");
        assert_eq!(report.files[0].changes, 4);
        assert_eq!(report.files[0].graph, "++--");
        assert!(report.files[1].binary);
        assert_eq!(
            report.summary,
            StatSummary {
                files_changed: 2,
                insertions: 2,
                deletions: 2
            }
        );
        assert_eq!(report.modes.len(), 2);
        assert_eq!(report.modes[0].action, ModeAction::Create);
        assert_eq!(report.modes[0].path, "logo.png");
        assert_eq!(report.modes[1].old_mode.as_deref(), Some("100644"));
    }

    #[test]
    fn singular_and_partial_summaries() {
        let r = parse_diffstat(" 1 file changed, 1 insertion(+)\n");
        assert_eq!(r.summary.files_changed, 1);
        assert_eq!(r.summary.insertions, 1);
        assert_eq!(r.summary.deletions, 0);

        let r = parse_diffstat(" 3 files changed, 7 deletions(-)\n");
        assert_eq!(r.summary.deletions, 7);
        assert_eq!(r.summary.insertions, 0);
    }

    #[test]
    fn unrelated_text() {
        assert_eq!(parse_diffstat("Already up to date.\n"), DiffStatReport::default());
    }
}
