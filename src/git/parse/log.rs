//! git::parse::log
//!
//! Commit records from `git log` and `git show`.
//!
//! # Shapes
//!
//! - **Record-delimited** ([`LOG_FORMAT`]): what the façade asks for by
//!   default. Each record opens with `\x1e` and closes its header block with
//!   `\x1f`; fields are tagged lines. Anything git prints after the `\x1f`
//!   (stat, patch) belongs to that record.
//! - **Pretty** (`fuller`, `full`, `medium`, `short`): the human format with
//!   `Key: value` headers and a four-space indented message.
//! - **Raw** (`--format=raw`): plumbing headers with epoch timestamps.
//!
//! Author and committer are kept as `Name <email>` strings.

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::diff::{parse_diff, Diff};
use super::lines;
use crate::git::error::GitError;

/// Opens a record.
pub const RECORD_START: char = '\x1e';
/// Closes a record's header block.
pub const RECORD_END: char = '\x1f';

/// The `--pretty` value the façade uses for record-delimited output.
pub const LOG_FORMAT: &str = "format:%x1ecommit %H%ntree %T%nparents %P%nauthor %an <%ae>%nauthor-date %ai%ncommitter %cn <%ce>%ncommitter-date %ci%nmessage %B%x1f";

/// `%ai` / `%ci`
const ISO_DATE: &str = "%Y-%m-%d %H:%M:%S %z";
/// Default pretty date, e.g. `Thu Jan 4 10:00:00 2024 +0100`
const PRETTY_DATE: &str = "%a %b %e %H:%M:%S %Y %z";

static DIFF_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^diff --").expect("valid regex"));

static COMMIT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^commit ([0-9a-fA-F]+)(?: \(from [0-9a-fA-F]+\))?(?: \((.*)\))?$")
        .expect("valid regex")
});

static PRETTY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+):\s+(.*)$").expect("valid regex"));

/// One commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub commit_id: String,
    /// Empty when the format does not print it
    pub tree_id: String,
    /// First parent; empty for a root commit
    pub parent_id: String,
    pub parent_ids: Vec<String>,
    /// `Name <email>`
    pub author: String,
    pub author_time: Option<DateTime<FixedOffset>>,
    /// `Name <email>`; empty when the format omits it
    pub committer: String,
    pub commit_time: Option<DateTime<FixedOffset>>,
    pub message: String,
    /// Patch output attached to the commit, if any
    pub diffs: Vec<Diff>,
}

impl LogEntry {
    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// True for a commit with more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    fn set_parents(&mut self, parents: &str) {
        self.parent_ids = parents.split_whitespace().map(str::to_string).collect();
        self.parent_id = self.parent_ids.first().cloned().unwrap_or_default();
    }
}

/// Which parser a log invocation's output needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogShape {
    Records,
    Pretty,
    Raw,
    /// Output this module cannot turn into records
    Unsupported,
}

impl LogShape {
    /// Classify a `--pretty`/`--format` value.
    pub fn from_format(value: &str) -> Self {
        match value {
            "fuller" | "full" | "medium" | "short" => LogShape::Pretty,
            "raw" => LogShape::Raw,
            v if v == LOG_FORMAT || v == &LOG_FORMAT["format:".len()..] => LogShape::Records,
            _ => LogShape::Unsupported,
        }
    }
}

/// Parse record-delimited output produced with [`LOG_FORMAT`].
///
/// The number of entries equals the number of [`RECORD_START`] sentinels.
///
/// # Errors
///
/// Returns a parse error if a record is not closed by [`RECORD_END`], a
/// date does not parse, or attached patch text is malformed.
pub fn parse_records(output: &str) -> Result<Vec<LogEntry>, GitError> {
    let mut entries = Vec::new();
    for chunk in output.split(RECORD_START).skip(1) {
        let (head, tail) = chunk
            .split_once(RECORD_END)
            .ok_or_else(|| GitError::parse("log record", chunk))?;
        let mut entry = parse_record_head(head)?;
        entry.diffs = trailing_diffs(tail)?;
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_record_head(head: &str) -> Result<LogEntry, GitError> {
    let mut entry = LogEntry::default();
    let mut rest = head;
    while !rest.is_empty() {
        if let Some(message) = rest.strip_prefix("message ") {
            entry.message = message.trim_end_matches('\n').to_string();
            break;
        }
        let (line, next) = rest.split_once('\n').unwrap_or((rest, ""));
        rest = next;
        let line = line.trim_end_matches('\r');
        if let Some(v) = line.strip_prefix("commit ") {
            entry.commit_id = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("tree ") {
            entry.tree_id = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("parents") {
            entry.set_parents(v);
        } else if let Some(v) = line.strip_prefix("author-date ") {
            entry.author_time = Some(parse_date(v, ISO_DATE)?);
        } else if let Some(v) = line.strip_prefix("author ") {
            entry.author = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("committer-date ") {
            entry.commit_time = Some(parse_date(v, ISO_DATE)?);
        } else if let Some(v) = line.strip_prefix("committer ") {
            entry.committer = v.trim().to_string();
        }
    }
    if entry.commit_id.is_empty() {
        return Err(GitError::parse("log record without commit id", head));
    }
    Ok(entry)
}

/// Parse `fuller`, `full`, `medium`, `short`, or `raw` output.
///
/// # Errors
///
/// Returns a parse error if no `commit` line is present in non-empty
/// output, or a date does not parse.
pub fn parse_pretty(output: &str) -> Result<Vec<LogEntry>, GitError> {
    let starts: Vec<_> = COMMIT_LINE.find_iter(output).map(|m| m.start()).collect();
    if starts.is_empty() {
        if output.trim().is_empty() {
            return Ok(Vec::new());
        }
        return Err(GitError::parse("log output without commit line", output));
    }

    let mut entries = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(output.len());
        entries.push(parse_pretty_block(&output[start..end])?);
    }
    Ok(entries)
}

fn parse_pretty_block(block: &str) -> Result<LogEntry, GitError> {
    let mut entry = LogEntry::default();
    let mut iter = lines(block);

    if let Some(first) = iter.next() {
        if let Some(caps) = COMMIT_LINE.captures(first) {
            entry.commit_id = caps[1].to_string();
        }
    }

    // Header lines up to the first blank line
    for line in iter.by_ref() {
        if line.is_empty() {
            break;
        }
        if let Some(v) = line.strip_prefix("tree ") {
            entry.tree_id = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("parent ") {
            entry.parent_ids.push(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix("author ") {
            let (who, when) = split_raw_identity(v)?;
            entry.author = who;
            entry.author_time = when;
        } else if let Some(v) = line.strip_prefix("committer ") {
            let (who, when) = split_raw_identity(v)?;
            entry.committer = who;
            entry.commit_time = when;
        } else if let Some(caps) = PRETTY_HEADER.captures(line) {
            let value = caps[2].trim();
            match &caps[1] {
                "Merge" => entry.set_parents(value),
                "Author" => entry.author = value.to_string(),
                "Commit" => entry.committer = value.to_string(),
                "AuthorDate" | "Date" => entry.author_time = Some(parse_date(value, PRETTY_DATE)?),
                "CommitDate" => entry.commit_time = Some(parse_date(value, PRETTY_DATE)?),
                _ => {}
            }
        }
    }
    entry.parent_id = entry.parent_ids.first().cloned().unwrap_or_default();

    // Indented message; blank lines inside it are kept
    let mut message = Vec::new();
    let mut rest = Vec::new();
    for line in iter {
        if !rest.is_empty() {
            rest.push(line);
        } else if let Some(text) = line.strip_prefix("    ") {
            message.push(text);
        } else if line.is_empty() {
            message.push("");
        } else {
            rest.push(line);
        }
    }
    while message.last() == Some(&"") {
        message.pop();
    }
    entry.message = message.join("\n");
    entry.diffs = trailing_diffs(&rest.join("\n"))?;
    Ok(entry)
}

/// `Name <email> 1700000000 +0100`
fn split_raw_identity(value: &str) -> Result<(String, Option<DateTime<FixedOffset>>), GitError> {
    let value = value.trim();
    let Some(close) = value.rfind('>') else {
        return Ok((value.to_string(), None));
    };
    let who = value[..=close].to_string();
    let stamp = value[close + 1..].trim();
    if stamp.is_empty() {
        return Ok((who, None));
    }
    let when = DateTime::parse_from_str(stamp, "%s %z")
        .map_err(|_| GitError::parse("raw log timestamp", stamp))?;
    Ok((who, Some(when)))
}

fn parse_date(value: &str, format: &str) -> Result<DateTime<FixedOffset>, GitError> {
    DateTime::parse_from_str(value.trim(), format)
        .map_err(|_| GitError::parse("log date", value.trim()))
}

fn trailing_diffs(tail: &str) -> Result<Vec<Diff>, GitError> {
    match DIFF_START.find(tail) {
        Some(m) => parse_diff(&tail[m.start()..]),
        None => Ok(Vec::new()),
    }
}
