//! git::parse::reflog
//!
//! `git reflog show` output: `<sha> <selector>: <action>: <message>`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::lines;

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9a-fA-F]+)(?: \([^)]*\))? (\S+@\{[^}]+\}): (?:([^:]+): )?(.*)$")
        .expect("valid regex")
});

/// One reflog line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflogEntry {
    /// Abbreviated object id
    pub commit: String,
    /// `HEAD@{0}`
    pub selector: String,
    /// `commit`, `checkout`, `merge alt`, ...
    pub action: String,
    pub message: String,
}

/// Parse reflog lines; lines that do not match are skipped.
pub fn parse_reflog(output: &str) -> Vec<ReflogEntry> {
    lines(output)
        .filter_map(|line| ENTRY.captures(line))
        .map(|caps| ReflogEntry {
            commit: caps[1].to_string(),
            selector: caps[2].to_string(),
            action: caps.get(3).map_or("", |m| m.as_str()).to_string(),
            message: caps[4].to_string(),
        })
        .collect()
}
