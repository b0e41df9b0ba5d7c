//! git::parse::status
//!
//! Porcelain v1 status listing (`git status --porcelain`).
//!
//! # Code table
//!
//! Each line starts with a two-letter `XY` code: `X` is the index column,
//! `Y` the worktree column. The entry's [`StatusCode`] is derived as follows:
//!
//! | `XY`                                   | Code        |
//! |----------------------------------------|-------------|
//! | `??`                                   | `Untracked` |
//! | `!!`                                   | `Ignored`   |
//! | `DD AU UD UA DU AA UU` (unmerged)      | `Updated`   |
//! | `X` in `A M D R C T U`                 | from `X`    |
//! | `X` blank, `Y` in `A M D R C T`        | from `Y`    |
//!
//! `T` (type change) reports as `Modified`. Combined codes such as `MM` or
//! `AM` take the index column; the raw code is kept on every entry so
//! callers can tell them apart.

use serde::Serialize;

use super::{lines, unquote};
use crate::git::error::GitError;

/// Change category of one status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCode {
    Untracked,
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    /// Unmerged: the path has conflicts.
    Updated,
    Ignored,
}

impl StatusCode {
    fn from_column(c: char) -> Option<Self> {
        match c {
            'A' => Some(StatusCode::Added),
            'M' | 'T' => Some(StatusCode::Modified),
            'D' => Some(StatusCode::Deleted),
            'R' => Some(StatusCode::Renamed),
            'C' => Some(StatusCode::Copied),
            'U' => Some(StatusCode::Updated),
            _ => None,
        }
    }

    /// Classify a two-letter `XY` code.
    pub fn from_xy(xy: &str) -> Option<Self> {
        let mut chars = xy.chars();
        let x = chars.next()?;
        let y = chars.next()?;
        match (x, y) {
            ('?', '?') => Some(StatusCode::Untracked),
            ('!', '!') => Some(StatusCode::Ignored),
            _ if is_unmerged(x, y) => Some(StatusCode::Updated),
            (' ', y) => Self::from_column(y).filter(|c| *c != StatusCode::Updated),
            (x, _) => Self::from_column(x),
        }
    }
}

fn is_unmerged(x: char, y: char) -> bool {
    matches!(
        (x, y),
        ('D', 'D') | ('A', 'U') | ('U', 'D') | ('U', 'A') | ('D', 'U') | ('A', 'A') | ('U', 'U')
    )
}

/// One line of the status listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub code: StatusCode,
    /// Path (the source path for renames and copies)
    pub path: String,
    /// Destination of a rename or copy
    pub rename_destination: Option<String>,
    /// The two-letter `XY` code as printed
    pub raw_code: String,
}

impl StatusEntry {
    /// Index column of the raw code.
    pub fn index_status(&self) -> char {
        self.raw_code.chars().next().unwrap_or(' ')
    }

    /// Worktree column of the raw code.
    pub fn worktree_status(&self) -> char {
        self.raw_code.chars().nth(1).unwrap_or(' ')
    }

    /// The path as it exists after the change.
    pub fn current_path(&self) -> &str {
        self.rename_destination.as_deref().unwrap_or(&self.path)
    }
}

/// Parse a porcelain v1 listing.
///
/// Yields one entry per non-empty line. `## ` branch header lines (from
/// `--branch`) are skipped; see [`parse_branch_header`].
///
/// # Errors
///
/// Returns a parse error for a line shorter than `XY path` or with an
/// unrecognised code.
pub fn parse_status(output: &str) -> Result<Vec<StatusEntry>, GitError> {
    let mut entries = Vec::new();
    for line in lines(output) {
        if line.is_empty() || line.starts_with("## ") {
            continue;
        }
        entries.push(parse_line(line)?);
    }
    Ok(entries)
}

fn parse_line(line: &str) -> Result<StatusEntry, GitError> {
    if line.len() < 4 || !line.is_char_boundary(2) || !line.is_char_boundary(3) {
        return Err(GitError::parse("status line", line));
    }
    let raw_code = &line[..2];
    let code = StatusCode::from_xy(raw_code).ok_or_else(|| GitError::parse("status code", line))?;
    let rest = &line[3..];

    let is_rename = raw_code.contains('R') || raw_code.contains('C');
    let (path, rename_destination) = match rest.split_once(" -> ") {
        Some((from, to)) if is_rename => (unquote(from), Some(unquote(to))),
        _ => (unquote(rest), None),
    };

    Ok(StatusEntry {
        code,
        path,
        rename_destination,
        raw_code: raw_code.to_string(),
    })
}

/// The `## ` header printed by `status --porcelain --branch`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchHeader {
    /// Current branch; `None` when detached
    pub branch: Option<String>,
    pub upstream: Option<String>,
    pub ahead: u32,
    pub behind: u32,
    /// The branch has no commits yet
    pub unborn: bool,
}

/// Parse the first `## ` header line in `output`, if any.
pub fn parse_branch_header(output: &str) -> Option<BranchHeader> {
    let line = lines(output).find_map(|l| l.strip_prefix("## "))?;

    for prefix in ["No commits yet on ", "Initial commit on "] {
        if let Some(branch) = line.strip_prefix(prefix) {
            return Some(BranchHeader {
                branch: Some(branch.trim().to_string()),
                unborn: true,
                ..Default::default()
            });
        }
    }

    if line.starts_with("HEAD (no branch)") {
        return Some(BranchHeader::default());
    }

    let (refs, tracking) = match line.split_once(" [") {
        Some((refs, rest)) => (refs, rest.trim_end_matches(']')),
        None => (line, ""),
    };
    let (branch, upstream) = match refs.split_once("...") {
        Some((b, u)) => (b, Some(u.trim().to_string())),
        None => (refs, None),
    };

    let mut header = BranchHeader {
        branch: Some(branch.trim().to_string()),
        upstream,
        ..Default::default()
    };
    for part in tracking.split(", ") {
        if let Some(n) = part.strip_prefix("ahead ") {
            header.ahead = n.trim().parse().unwrap_or(0);
        } else if let Some(n) = part.strip_prefix("behind ") {
            header.behind = n.trim().parse().unwrap_or(0);
        }
    }
    Some(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod codes {
        use super::*;

        #[test]
        fn basic_table() {
            assert_eq!(StatusCode::from_xy("??"), Some(StatusCode::Untracked));
            assert_eq!(StatusCode::from_xy("A "), Some(StatusCode::Added));
            assert_eq!(StatusCode::from_xy("M "), Some(StatusCode::Modified));
            assert_eq!(StatusCode::from_xy("D "), Some(StatusCode::Deleted));
            assert_eq!(StatusCode::from_xy("R "), Some(StatusCode::Renamed));
            assert_eq!(StatusCode::from_xy("C "), Some(StatusCode::Copied));
            assert_eq!(StatusCode::from_xy("U "), Some(StatusCode::Updated));
        }

        #[test]
        fn worktree_column_when_index_clean() {
            assert_eq!(StatusCode::from_xy(" M"), Some(StatusCode::Modified));
            assert_eq!(StatusCode::from_xy(" D"), Some(StatusCode::Deleted));
            assert_eq!(StatusCode::from_xy(" A"), Some(StatusCode::Added));
        }

        #[test]
        fn combined_codes_take_index() {
            assert_eq!(StatusCode::from_xy("MM"), Some(StatusCode::Modified));
            assert_eq!(StatusCode::from_xy("AM"), Some(StatusCode::Added));
            assert_eq!(StatusCode::from_xy("RM"), Some(StatusCode::Renamed));
        }

        #[test]
        fn unmerged_pairs() {
            for xy in ["DD", "AU", "UD", "UA", "DU", "AA", "UU"] {
                assert_eq!(StatusCode::from_xy(xy), Some(StatusCode::Updated), "{xy}");
            }
        }

        #[test]
        fn unknown() {
            assert_eq!(StatusCode::from_xy("XY"), None);
            assert_eq!(StatusCode::from_xy("  "), None);
            assert_eq!(StatusCode::from_xy("?"), None);
        }
    }

    mod listing {
        use super::*;

        #[test]
        fn parses_entries() {
            let out = "?? new.txt\nA  added.rs\n M src/lib.rs\nR  old.rs -> new.rs\nUU conflict.txt\n";
            let entries = parse_status(out).unwrap();
            assert_eq!(entries.len(), 5);
            assert_eq!(entries[0].code, StatusCode::Untracked);
            assert_eq!(entries[0].path, "new.txt");
            assert_eq!(entries[2].path, "src/lib.rs");
            assert_eq!(entries[2].worktree_status(), 'M');
            assert_eq!(entries[3].path, "old.rs");
            assert_eq!(entries[3].rename_destination.as_deref(), Some("new.rs"));
            assert_eq!(entries[3].current_path(), "new.rs");
            assert_eq!(entries[4].code, StatusCode::Updated);
        }

        #[test]
        fn arrow_in_plain_path_is_kept() {
            let entries = parse_status("?? a -> b\n").unwrap();
            assert_eq!(entries[0].path, "a -> b");
            assert!(entries[0].rename_destination.is_none());
        }

        #[test]
        fn quoted_paths() {
            let entries = parse_status("?? \"with space.txt\"\n").unwrap();
            assert_eq!(entries[0].path, "with space.txt");
        }

        #[test]
        fn skips_branch_header_and_blank_lines() {
            let out = "## main...origin/main\n\n M a\n";
            assert_eq!(parse_status(out).unwrap().len(), 1);
        }

        #[test]
        fn empty_output() {
            assert!(parse_status("").unwrap().is_empty());
        }

        #[test]
        fn short_line_is_error() {
            assert!(matches!(parse_status("M\n"), Err(GitError::Parse { .. })));
        }

        #[test]
        fn serializes_kebab_case() {
            let entries = parse_status("?? x\n").unwrap();
            let json = serde_json::to_value(&entries[0]).unwrap();
            assert_eq!(json["code"], "untracked");
        }
    }

    mod header {
        use super::*;

        #[test]
        fn unborn() {
            let h = parse_branch_header("## No commits yet on trunk\n").unwrap();
            assert_eq!(h.branch.as_deref(), Some("trunk"));
            assert!(h.unborn);

            let h = parse_branch_header("## Initial commit on master\n").unwrap();
            assert_eq!(h.branch.as_deref(), Some("master"));
        }

        #[test]
        fn tracking() {
            let h = parse_branch_header("## main...origin/main [ahead 2, behind 1]\n").unwrap();
            assert_eq!(h.branch.as_deref(), Some("main"));
            assert_eq!(h.upstream.as_deref(), Some("origin/main"));
            assert_eq!((h.ahead, h.behind), (2, 1));
        }

        #[test]
        fn detached() {
            let h = parse_branch_header("## HEAD (no branch)\n").unwrap();
            assert!(h.branch.is_none());
        }

        #[test]
        fn missing() {
            assert!(parse_branch_header(" M a\n").is_none());
        }
    }
}
