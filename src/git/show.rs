//! git::show

use tracing::instrument;

use super::error::GitError;
use super::log::{parse_shape, prepare_format};
use super::options::{flag, flag_with, GitOption};
use super::parse::log::{LogEntry, LogShape};
use super::Git;

pub fn format(value: &str) -> GitOption {
    flag_with("--format", value)
}

pub fn pretty(value: &str) -> GitOption {
    flag_with("--pretty", value)
}

pub fn oneline() -> GitOption {
    flag("--oneline")
}

pub fn short() -> GitOption {
    pretty("short")
}

pub fn medium() -> GitOption {
    pretty("medium")
}

pub fn full() -> GitOption {
    pretty("full")
}

pub fn fuller() -> GitOption {
    pretty("fuller")
}

pub fn raw() -> GitOption {
    pretty("raw")
}

pub fn stat() -> GitOption {
    flag("--stat")
}

pub fn name_only() -> GitOption {
    flag("--name-only")
}

pub fn name_status() -> GitOption {
    flag("--name-status")
}

pub fn no_patch() -> GitOption {
    flag("--no-patch")
}

pub fn patch() -> GitOption {
    flag("--patch")
}

pub fn abbrev_commit() -> GitOption {
    flag("--abbrev-commit")
}

impl Git {
    /// One commit with its patch attached as [`LogEntry::diffs`].
    ///
    /// `object` may be anything that peels to a commit; an annotated tag's
    /// own header is skipped.
    ///
    /// # Errors
    ///
    /// Fails for an unknown object, a format without records, or output
    /// holding no commit (a tree or blob).
    #[instrument(skip(self, opts))]
    pub fn show(&self, object: &str, opts: &[GitOption]) -> Result<LogEntry, GitError> {
        let mut cmd = self.build(["show", "--no-color", "--no-ext-diff"], opts);
        cmd.push_positional(object);
        let shape = prepare_format(&mut cmd);
        if shape == LogShape::Unsupported {
            return Err(GitError::parse(
                "show format without commit records",
                cmd.argv().join(" "),
            ));
        }
        let out = self.execute(&cmd)?;
        parse_shape(shape, &out)?
            .into_iter()
            .next()
            .ok_or_else(|| GitError::parse("show output without commit", out))
    }
}
