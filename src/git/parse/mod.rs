//! git::parse
//!
//! Pure parsers from captured git output to typed records.
//!
//! Parsers hold no state and never spawn processes; the façade methods feed
//! them text. Most of git's human output is not a stable format, so each
//! parser documents the shape it accepts and returns
//! [`GitError::Parse`](crate::git::GitError::Parse)
//! carrying the offending text when that shape is violated.
//!
//! # Modules
//!
//! - [`status`]: porcelain v1 status listing
//! - [`log`]: record-delimited and `fuller`/`medium`/`raw` log output
//! - [`diff`]: unified diffs and their extended headers
//! - [`stat`]: diffstat tails (`N files changed`, `create mode`)
//! - [`transfer`]: push/fetch transcripts and ref transitions
//! - [`remote`]: `remote -v` listing
//! - [`branch`]: `branch --list` listing
//! - [`checkout`]: checkout/switch transcript phrases
//! - [`merge`]: merge outcome records
//! - [`conflict`]: conflict marker sections inside files
//! - [`config`]: `config --list --show-origin --show-scope`
//! - [`reflog`]: reflog listing

pub mod branch;
pub mod checkout;
pub mod config;
pub mod conflict;
pub mod diff;
pub mod log;
pub mod merge;
pub mod reflog;
pub mod remote;
pub mod stat;
pub mod status;
pub mod transfer;

/// Undo git's C-style path quoting (`"a\tb"`, `"caf\303\251"`).
///
/// Unquoted input is returned as is.
pub fn unquote(path: &str) -> String {
    let inner = match path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return path.to_string(),
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut iter = inner.bytes().peekable();
    while let Some(b) = iter.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        match iter.next() {
            Some(b'n') => bytes.push(b'\n'),
            Some(b't') => bytes.push(b'\t'),
            Some(b'r') => bytes.push(b'\r'),
            Some(b'a') => bytes.push(0x07),
            Some(b'b') => bytes.push(0x08),
            Some(b'f') => bytes.push(0x0c),
            Some(b'v') => bytes.push(0x0b),
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match iter.peek() {
                        Some(&n @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(n - b'0');
                            iter.next();
                        }
                        _ => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Lines with trailing `\r` removed.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(|l| l.trim_end_matches('\r'))
}
