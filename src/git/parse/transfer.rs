//! git::parse::transfer
//!
//! Push and fetch transcripts.
//!
//! git prints one header per remote (`From <url>` for fetch, `To <url>` for
//! push) followed by one line per reference:
//!
//! ```text
//! From /srv/repo.git
//!  * [new branch]      main       -> origin/main
//!    1a2b3c4..5d6e7f8  dev        -> origin/dev
//!  + 9a8b7c6...1f2e3d4 wip        -> origin/wip  (forced update)
//!  ! [rejected]        main       -> main  (non-fast-forward)
//! ```
//!
//! `push --porcelain` prints the same information tab-separated on stdout;
//! both layouts are accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::lines;
use super::remote::Remote;

static REF_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:([+\-t*!=])\s+)?(\[[^\]]+\]|\S+)\s+(\S+)\s+->\s+(\S+)(?:\s+\((.*)\))?\s*$")
        .expect("valid regex")
});

static DELETED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s+\[deleted\]\s+(\S+)\s*$").expect("valid regex"));

static PORCELAIN_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ +\-*!=])\t([^:\t]*):([^\t]*)\t(.*?)(?: \((.*)\))?$").expect("valid regex")
});

/// What happened to one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefStatus {
    FastForward,
    ForcedUpdate,
    Pruned,
    TagUpdate,
    New,
    Rejected,
    UpToDate,
    Unspecified,
}

impl RefStatus {
    /// Map git's single status character.
    ///
    /// A missing character (a plain space) is a fast-forward.
    pub fn from_flag(flag: Option<char>) -> Self {
        match flag {
            None | Some(' ') => RefStatus::FastForward,
            Some('+') => RefStatus::ForcedUpdate,
            Some('-') => RefStatus::Pruned,
            Some('t') => RefStatus::TagUpdate,
            Some('*') => RefStatus::New,
            Some('!') => RefStatus::Rejected,
            Some('=') => RefStatus::UpToDate,
            Some(_) => RefStatus::Unspecified,
        }
    }
}

/// One reference line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefTransition {
    pub status: RefStatus,
    /// `[new branch]`, `1a2b3c4..5d6e7f8`, ...
    pub summary: String,
    pub from: String,
    pub to: String,
    /// Trailing parenthesised phrase, e.g. `non-fast-forward`
    pub reason: Option<String>,
}

/// Parse a single reference line, in either human or porcelain layout.
pub fn parse_ref_line(line: &str) -> Option<RefTransition> {
    if let Some(caps) = PORCELAIN_LINE.captures(line) {
        return Some(RefTransition {
            status: RefStatus::from_flag(caps[1].chars().next()),
            summary: caps[4].trim().to_string(),
            from: caps[2].to_string(),
            to: caps[3].to_string(),
            reason: caps.get(5).map(|m| m.as_str().to_string()),
        });
    }
    if let Some(caps) = DELETED_LINE.captures(line) {
        return Some(RefTransition {
            status: RefStatus::Pruned,
            summary: "[deleted]".into(),
            from: caps[1].to_string(),
            to: String::new(),
            reason: None,
        });
    }
    let caps = REF_LINE.captures(line)?;
    Some(RefTransition {
        status: RefStatus::from_flag(caps.get(1).and_then(|m| m.as_str().chars().next())),
        summary: caps[2].to_string(),
        from: caps[3].to_string(),
        to: caps[4].to_string(),
        reason: caps
            .get(5)
            .map(|m| m.as_str().trim().to_string())
            .filter(|r| !r.is_empty()),
    })
}

/// Parse a full push or fetch transcript into one [`Remote`] per header.
///
/// The remote's `name` and `url` are both the header value. Lines before the
/// first header, progress output, and hints are ignored.
pub fn parse_transcript(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in lines(output) {
        let header = line
            .strip_prefix("From ")
            .or_else(|| line.strip_prefix("To "));
        if let Some(url) = header {
            let url = url.trim().to_string();
            remotes.push(Remote {
                name: url.clone(),
                url,
                refs: Vec::new(),
            });
            continue;
        }
        let Some(current) = remotes.last_mut() else {
            continue;
        };
        if let Some(transition) = parse_ref_line(line) {
            current.refs.push(transition);
        }
    }
    remotes
}
