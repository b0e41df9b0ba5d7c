//! git::command
//!
//! The mutable description of a single `git` invocation.
//!
//! # Argument layout
//!
//! The final argument vector is assembled from three ordered parts:
//!
//! ```text
//! [-c k=v ...] <verb> [options ...] [positionals ...] [-- pathspecs ...]
//! ```
//!
//! Options append to the first part, so operation flags always land before
//! refs and paths regardless of the order the caller listed them in. Global
//! `-c` pairs are inserted at the front of the first part, ahead of the verb.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default per-command deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A single `git` invocation under construction.
///
/// Created per call by the façade, mutated only through
/// [`GitOption`](super::options::GitOption) application, and consumed once by
/// the executor.
///
/// # Example
///
/// ```
/// use gitfacade::git::command::Command;
///
/// let mut cmd = Command::new("/usr/bin/git", ["commit", "-m", "msg"]);
/// cmd.push_arg("--signoff");
/// cmd.prepend_config("user.name", "Q");
/// assert_eq!(
///     cmd.argv(),
///     vec!["-c", "user.name=Q", "commit", "-m", "msg", "--signoff"]
/// );
/// assert_eq!(cmd.subcommand(), Some("commit"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    binary: PathBuf,
    args: Vec<String>,
    positionals: Vec<String>,
    pathspecs: Vec<String>,
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
    stdin: Option<String>,
    timeout: Duration,
    stderr_is_primary: bool,
}

impl Command {
    /// Create a command seeded with a verb and its leading arguments.
    pub fn new<I, S>(binary: impl Into<PathBuf>, seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            binary: binary.into(),
            args: seed.into_iter().map(Into::into).collect(),
            positionals: Vec::new(),
            pathspecs: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
            stdin: None,
            timeout: DEFAULT_TIMEOUT,
            stderr_is_primary: false,
        }
    }

    /// Create a command with no arguments at all.
    pub fn empty(binary: impl Into<PathBuf>) -> Self {
        Self::new(binary, std::iter::empty::<String>())
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Option and verb arguments, excluding positionals and pathspecs.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn pathspecs(&self) -> &[String] {
        &self.pathspecs
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a successful run reports stderr as its output.
    pub fn stderr_is_primary(&self) -> bool {
        self.stderr_is_primary
    }

    /// The full argument vector handed to the binary.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(
            self.args.len() + self.positionals.len() + self.pathspecs.len() + 1,
        );
        argv.extend(self.args.iter().cloned());
        argv.extend(self.positionals.iter().cloned());
        if !self.pathspecs.is_empty() {
            argv.push("--".to_string());
            argv.extend(self.pathspecs.iter().cloned());
        }
        argv
    }

    /// The verb: the first argument that is not part of a `-c key=value` pair.
    pub fn subcommand(&self) -> Option<&str> {
        let mut iter = self.args.iter();
        while let Some(arg) = iter.next() {
            if arg == "-c" {
                iter.next();
                continue;
            }
            return Some(arg);
        }
        None
    }

    /// True if any option argument equals `flag` or starts with `flag=`.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|a| {
            a == flag
                || a
                    .strip_prefix(flag)
                    .is_some_and(|rest| rest.starts_with('='))
        })
    }

    /// The value of the last `--flag=value` or `--flag value` occurrence.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        let mut found = None;
        let mut iter = self.args.iter().peekable();
        while let Some(arg) = iter.next() {
            if let Some(rest) = arg.strip_prefix(flag) {
                if let Some(value) = rest.strip_prefix('=') {
                    found = Some(value);
                } else if rest.is_empty() {
                    if let Some(next) = iter.peek() {
                        found = Some(next.as_str());
                    }
                }
            }
        }
        found
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Set or overwrite an environment overlay entry.
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.insert(key.into(), value.into());
    }

    /// Append a config pair through git's `GIT_CONFIG_COUNT` environment.
    ///
    /// The pair takes the next free index, so pairs set earlier survive.
    pub fn push_env_config(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let index = self
            .env
            .get("GIT_CONFIG_COUNT")
            .and_then(|count| count.trim().parse::<usize>().ok())
            .unwrap_or(0);
        self.set_env(format!("GIT_CONFIG_KEY_{index}"), key);
        self.set_env(format!("GIT_CONFIG_VALUE_{index}"), value);
        self.set_env("GIT_CONFIG_COUNT", (index + 1).to_string());
    }

    pub fn set_working_dir(&mut self, dir: impl Into<PathBuf>) {
        self.working_dir = Some(dir.into());
    }

    pub fn set_stdin(&mut self, input: impl Into<String>) {
        self.stdin = Some(input.into());
    }

    pub fn set_stderr_primary(&mut self, primary: bool) {
        self.stderr_is_primary = primary;
    }

    pub fn push_arg(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    pub fn push_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
    }

    /// Replace the option argument vector wholesale.
    pub fn replace_args(&mut self, args: Vec<String>) {
        self.args = args;
    }

    pub fn push_positional(&mut self, value: impl Into<String>) {
        self.positionals.push(value.into());
    }

    /// Insert a positional at `index`, clamped to the current length.
    pub fn insert_positional(&mut self, index: usize, value: impl Into<String>) {
        let index = index.min(self.positionals.len());
        self.positionals.insert(index, value.into());
    }

    pub fn push_pathspec(&mut self, path: impl Into<String>) {
        self.pathspecs.push(path.into());
    }

    /// Insert arguments directly after the verb (`reflog expire`, `remote add`).
    ///
    /// Without a verb the arguments are appended.
    pub fn insert_after_verb<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let position = self.verb_index().map(|i| i + 1).unwrap_or(self.args.len());
        let tail = self.args.split_off(position);
        self.args.extend(args.into_iter().map(Into::into));
        self.args.extend(tail);
    }

    /// Insert `-c key=value` ahead of everything else.
    ///
    /// A command with no arguments is left untouched.
    pub fn prepend_config(&mut self, key: &str, value: &str) {
        if self.args.is_empty() {
            return;
        }
        let mut args = Vec::with_capacity(self.args.len() + 2);
        args.push("-c".to_string());
        args.push(format!("{key}={value}"));
        args.extend(self.args.drain(..));
        self.replace_args(args);
    }

    fn verb_index(&self) -> Option<usize> {
        let mut i = 0;
        while i < self.args.len() {
            if self.args[i] == "-c" {
                i += 2;
                continue;
            }
            return Some(i);
        }
        None
    }
}
