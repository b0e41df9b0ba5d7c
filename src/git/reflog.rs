//! git::reflog
//!
//! The subcommand (`show`, `expire`, `delete`, `exists`) is chosen with an
//! option; `show` is the default.

use tracing::instrument;

use super::command::Command;
use super::error::GitError;
use super::options::{flag, flag_with, GitOption};
use super::parse::reflog::{parse_reflog, ReflogEntry};
use super::repo::is_silent_miss;
use super::Git;

const ACTIONS: [&str; 4] = ["show", "expire", "delete", "exists"];

fn action(name: &str) -> GitOption {
    GitOption::InsertAfterVerb(vec![name.to_string()])
}

pub fn show() -> GitOption {
    action("show")
}

/// Prune old entries; combine with [`expire_time`] and [`all`].
pub fn expire() -> GitOption {
    action("expire")
}

/// Delete single entries named by [`reference`] (`HEAD@{2}`).
pub fn delete() -> GitOption {
    action("delete")
}

pub fn exists() -> GitOption {
    action("exists")
}

/// Expire every ref's log.
pub fn all() -> GitOption {
    flag("--all")
}

/// `--expire=<time>` (`now`, `90.days`, ...)
pub fn expire_time(when: &str) -> GitOption {
    flag_with("--expire", when)
}

pub fn expire_unreachable(when: &str) -> GitOption {
    flag_with("--expire-unreachable", when)
}

/// The ref or entry to act on; HEAD otherwise.
pub fn reference(name: impl Into<String>) -> GitOption {
    GitOption::Positional(vec![name.into()])
}

/// The subcommand following `reflog`, if one was chosen.
fn chosen_action(cmd: &Command) -> Option<&str> {
    let args = cmd.args();
    let verb = args.iter().position(|a| a == "reflog")?;
    args.get(verb + 1)
        .map(String::as_str)
        .filter(|a| ACTIONS.contains(a))
}

impl Git {
    /// Read or maintain reflogs.
    ///
    /// `show` returns the entries, newest first. The other actions print
    /// nothing and return an empty list.
    ///
    /// # Errors
    ///
    /// `exists` on a ref without a log fails; use [`Git::reflog_exists`] for
    /// a boolean.
    #[instrument(skip(self, opts))]
    pub fn reflog(&self, opts: &[GitOption]) -> Result<Vec<ReflogEntry>, GitError> {
        let mut cmd = self.build(["reflog"], opts);
        let showing = match chosen_action(&cmd) {
            None => {
                cmd.insert_after_verb(["show"]);
                true
            }
            Some(a) => a == "show",
        };
        if showing {
            cmd.push_arg("--no-color");
        }
        let out = self.execute(&cmd)?;
        Ok(if showing { parse_reflog(&out) } else { Vec::new() })
    }

    /// Whether `reference` has a reflog.
    #[instrument(skip(self, opts))]
    pub fn reflog_exists(&self, reference: &str, opts: &[GitOption]) -> Result<bool, GitError> {
        match self.run(["reflog", "exists", reference], opts) {
            Ok(_) => Ok(true),
            Err(e) if is_silent_miss(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(opts: &[GitOption]) -> Command {
        let mut cmd = Command::new("git", ["reflog"]);
        GitOption::apply_all(opts, &mut cmd);
        cmd
    }

    #[test]
    fn action_follows_verb() {
        let cmd = applied(&[all(), expire_time("now"), expire()]);
        assert_eq!(cmd.args(), &["reflog", "expire", "--all", "--expire=now"]);
        assert_eq!(chosen_action(&cmd), Some("expire"));
    }

    #[test]
    fn no_action_chosen() {
        assert_eq!(chosen_action(&applied(&[reference("main")])), None);
    }
}
