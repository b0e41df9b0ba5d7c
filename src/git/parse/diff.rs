//! git::parse::diff
//!
//! Unified diff output (`git diff`, `git show`, `git log -p`).
//!
//! # Algorithm
//!
//! 1. Split the text on file header lines `diff --<format> a/<old> b/<new>`.
//!    Combined diffs (`diff --cc <path>`) use the single path for both sides.
//! 2. Split each section at its first hunk marker `@@ -x[,y] +u[,v] @@`.
//!    Everything before it is the extended header; everything from it on is
//!    the contents.
//! 3. Re-scan the header line by line for modes, renames, copies,
//!    similarity, the `index` line, and binary markers.
//!
//! A section with no hunk is accepted only if its header says why (mode
//! change, rename, binary, empty new file); otherwise it is a parse error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::unquote;
use crate::git::error::GitError;

static FILE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^diff --(\S+) (.*)$").expect("valid regex")
});

static PATH_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"?a/(.+?)"? "?b/(.+?)"?$"#).expect("valid regex")
});

static HUNK_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^@@").expect("valid regex"));

static HUNK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@ ?(.*)$").expect("valid regex")
});

/// Optional extended header fields of one file diff.
///
/// Each field is present only if the header printed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffHeader {
    pub old_mode: Option<String>,
    pub new_mode: Option<String>,
    pub deleted_file_mode: Option<String>,
    pub new_file_mode: Option<String>,
    pub copy_from: Option<String>,
    pub copy_to: Option<String>,
    pub rename_from: Option<String>,
    pub rename_to: Option<String>,
    /// Percent
    pub similarity_index: Option<u8>,
    /// Percent
    pub dissimilarity_index: Option<u8>,
    /// The raw `index` line value, e.g. `83db48f..bf269f4 100644`
    pub index: Option<String>,
    /// `Binary files ... differ` or `GIT binary patch`
    pub binary: bool,
}

impl DiffHeader {
    fn explains_missing_hunk(&self) -> bool {
        self.binary
            || self.old_mode.is_some()
            || self.new_mode.is_some()
            || self.new_file_mode.is_some()
            || self.deleted_file_mode.is_some()
            || self.rename_from.is_some()
            || self.copy_from.is_some()
    }
}

/// A hunk range header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    /// Function context git prints after the closing `@@`
    pub heading: String,
}

/// One file's diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    /// The format tag after `diff --`, usually `git`
    pub format: String,
    pub old_path: String,
    pub new_path: String,
    pub header: DiffHeader,
    pub hunks: Vec<Hunk>,
    /// Raw text from the first hunk marker to the end of the section
    pub contents: String,
}

/// Parse every file diff in `output`.
///
/// Text before the first file header is ignored.
///
/// # Errors
///
/// Returns a parse error for a file header whose paths cannot be read, or
/// for a section that has neither hunks nor a header explaining their absence.
pub fn parse_diff(output: &str) -> Result<Vec<Diff>, GitError> {
    let headers: Vec<_> = FILE_HEADER.captures_iter(output).collect();
    let mut diffs = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        let section_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(output.len());
        let body = output[whole.end..section_end].trim_start_matches('\n');

        let format = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let paths = caps.get(2).map_or("", |m| m.as_str());
        let (old_path, new_path) = split_paths(&format, paths)
            .ok_or_else(|| GitError::parse("diff file header", &output[whole.clone()]))?;

        let (header_text, contents) = match HUNK_START.find(body) {
            Some(m) => (&body[..m.start()], &body[m.start()..]),
            None => (body, ""),
        };
        let header = parse_header(header_text);
        if contents.is_empty() && !header.explains_missing_hunk() {
            return Err(GitError::parse(
                "diff section without hunk",
                &output[whole.start..section_end],
            ));
        }

        diffs.push(Diff {
            format,
            old_path,
            new_path,
            header,
            hunks: parse_hunks(contents),
            contents: contents.to_string(),
        });
    }

    Ok(diffs)
}

fn split_paths(format: &str, paths: &str) -> Option<(String, String)> {
    if format == "cc" || format == "combined" {
        let path = unquote(paths.trim());
        return Some((path.clone(), path));
    }
    let caps = PATH_PAIR.captures(paths.trim())?;
    let old = unquote_inner(caps.get(1)?.as_str());
    let new = unquote_inner(caps.get(2)?.as_str());
    Some((old, new))
}

/// The path regex strips the surrounding quotes, so re-add them before unescaping.
fn unquote_inner(path: &str) -> String {
    if path.contains('\\') {
        unquote(&format!("\"{path}\""))
    } else {
        path.to_string()
    }
}

fn parse_header(text: &str) -> DiffHeader {
    let mut header = DiffHeader::default();
    for line in super::lines(text) {
        let owned = |s: &str| Some(s.trim().to_string());
        if let Some(v) = line.strip_prefix("old mode ") {
            header.old_mode = owned(v);
        } else if let Some(v) = line.strip_prefix("new mode ") {
            header.new_mode = owned(v);
        } else if let Some(v) = line.strip_prefix("deleted file mode ") {
            header.deleted_file_mode = owned(v);
        } else if let Some(v) = line.strip_prefix("new file mode ") {
            header.new_file_mode = owned(v);
        } else if let Some(v) = line.strip_prefix("copy from ") {
            header.copy_from = Some(unquote(v.trim()));
        } else if let Some(v) = line.strip_prefix("copy to ") {
            header.copy_to = Some(unquote(v.trim()));
        } else if let Some(v) = line.strip_prefix("rename from ") {
            header.rename_from = Some(unquote(v.trim()));
        } else if let Some(v) = line.strip_prefix("rename to ") {
            header.rename_to = Some(unquote(v.trim()));
        } else if let Some(v) = line.strip_prefix("similarity index ") {
            header.similarity_index = percent(v);
        } else if let Some(v) = line.strip_prefix("dissimilarity index ") {
            header.dissimilarity_index = percent(v);
        } else if let Some(v) = line.strip_prefix("index ") {
            header.index = owned(v);
        } else if line.starts_with("Binary files ") || line == "GIT binary patch" {
            header.binary = true;
        }
    }
    header
}

fn percent(value: &str) -> Option<u8> {
    value.trim().trim_end_matches('%').parse().ok()
}

fn parse_hunks(contents: &str) -> Vec<Hunk> {
    super::lines(contents)
        .filter_map(|line| HUNK_HEADER.captures(line))
        .map(|caps| {
            let num = |i: usize, default: u32| {
                caps.get(i)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(default)
            };
            Hunk {
                old_start: num(1, 0),
                old_lines: num(2, 1),
                new_start: num(3, 0),
                new_lines: num(4, 1),
                heading: caps.get(5).map_or("", |m| m.as_str()).to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODIFY: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 83db48f..bf269f4 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@ fn main()
 line one
+line added
 line two
 line three
";

    #[test]
    fn single_modification() {
        let diffs = parse_diff(MODIFY).unwrap();
        assert_eq!(diffs.len(), 1);
        let d = &diffs[0];
        assert_eq!(d.format, "git");
        assert_eq!(d.old_path, "src/lib.rs");
        assert_eq!(d.new_path, "src/lib.rs");
        assert_eq!(d.header.index.as_deref(), Some("83db48f..bf269f4 100644"));
        assert_eq!(d.hunks.len(), 1);
        assert_eq!(d.hunks[0].old_start, 1);
        assert_eq!(d.hunks[0].new_lines, 4);
        assert_eq!(d.hunks[0].heading, "fn main()");
        assert!(d.contents.starts_with("@@ -1,3 +1,4 @@"));
        assert!(d.contents.contains("+line added"));
    }

    #[test]
    fn multiple_files_and_single_line_hunks() {
        let text = format!(
            "{MODIFY}diff --git a/b.txt b/b.txt\nnew file mode 100644\nindex 0000000..e69de29\n--- /dev/null\n+++ b/b.txt\n@@ -0,0 +1 @@\n+x\n"
        );
        let diffs = parse_diff(&text).unwrap();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[1].header.new_file_mode.as_deref(), Some("100644"));
        assert_eq!(diffs[1].hunks[0].new_lines, 1);
        assert_eq!(diffs[1].hunks[0].old_start, 0);
    }

    #[test]
    fn pure_rename_has_no_hunk() {
        let text = "diff --git a/old.txt b/new.txt\nsimilarity index 100%\nrename from old.txt\nrename to new.txt\n";
        let diffs = parse_diff(text).unwrap();
        assert_eq!(diffs[0].old_path, "old.txt");
        assert_eq!(diffs[0].new_path, "new.txt");
        assert_eq!(diffs[0].header.similarity_index, Some(100));
        assert_eq!(diffs[0].header.rename_to.as_deref(), Some("new.txt"));
        assert!(diffs[0].hunks.is_empty());
    }

    #[test]
    fn mode_change_and_binary() {
        let text = "diff --git a/run.sh b/run.sh\nold mode 100644\nnew mode 100755\ndiff --git a/img.png b/img.png\nindex 1111111..2222222 100644\nBinary files a/img.png and b/img.png differ\n";
        let diffs = parse_diff(text).unwrap();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].header.new_mode.as_deref(), Some("100755"));
        assert!(diffs[1].header.binary);
    }

    #[test]
    fn section_without_hunk_or_reason_is_error() {
        let text = "diff --git a/x b/x\nindex 1111111..2222222 100644\n";
        assert!(matches!(parse_diff(text), Err(GitError::Parse { .. })));
    }

    #[test]
    fn quoted_paths_with_spaces() {
        let text = "diff --git \"a/with space.txt\" \"b/with space.txt\"\nnew file mode 100644\n";
        let diffs = parse_diff(text).unwrap();
        assert_eq!(diffs[0].old_path, "with space.txt");
        assert_eq!(diffs[0].new_path, "with space.txt");
    }

    #[test]
    fn combined_diff() {
        let text = "diff --cc f\nindex 1,2..3\n@@@ -1,1 -1,1 +1,1 @@@\n- a\n -b\n++c\n";
        let diffs = parse_diff(text).unwrap();
        assert_eq!(diffs[0].format, "cc");
        assert_eq!(diffs[0].old_path, "f");
        assert!(diffs[0].hunks.is_empty());
        assert!(diffs[0].contents.starts_with("@@@"));
    }

    #[test]
    fn leading_text_ignored_and_empty_input() {
        assert!(parse_diff("").unwrap().is_empty());
        let text = format!("commit abc\n\n    msg\n\n{MODIFY}");
        assert_eq!(parse_diff(&text).unwrap().len(), 1);
    }
}
