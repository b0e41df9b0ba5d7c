//! session
//!
//! A persistent attachment to one repository.
//!
//! # Overview
//!
//! A [`Session`] wraps a [`Git`] façade bound to a repository and keeps a
//! [`SessionConfig`] in that repository's local config. Write-path verbs
//! called through the session (commit, merge, pull, rebase, revert, tag,
//! clone) run with the session identity in the environment, so author and
//! committer do not depend on the host's git configuration.
//!
//! # Lifecycle
//!
//! ```text
//! (fresh) --new--> attached --destroy--> destroyed
//!                     ^  |
//!                     +--+ new / load (idempotent)
//! ```
//!
//! [`Session::new`] on a path that already holds a session keeps its id and
//! creation time and overlays the supplied options.
//! [`Session::destroy`] removes the session section only; the repository and
//! `user.*` settings stay.
//!
//! # Example
//!
//! ```no_run
//! use gitfacade::session::{options::*, Session};
//!
//! let session = Session::new(
//!     "/tmp/S",
//!     &[with_user("A", "a@x"), with_metadata("track", "git-basics")],
//! )?;
//! std::fs::write("/tmp/S/README", "# A\n").unwrap();
//! session.git().add(&["README"], &[])?;
//! session.commit("initial", &[])?;
//!
//! let loaded = Session::load("/tmp/S")?;
//! assert_eq!(loaded.config().metadata["track"], "git-basics");
//! # Ok::<(), gitfacade::Error>(())
//! ```

pub mod config;
pub mod options;

pub use config::SessionConfig;
pub use options::SessionOption;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::core::types::UtcTimestamp;
use crate::git::config as git_config;
use crate::git::error::{GitError, SessionError};
use crate::git::options::{self as git_options, GitOption};
use crate::git::parse::merge::MergeResult;
use crate::git::Git;

/// Summary of a stored session, for display or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub created: UtcTimestamp,
    pub working_dir: PathBuf,
    pub metadata: BTreeMap<String, String>,
    /// Whether the repository still carries this session
    pub is_valid: bool,
}

impl SessionInfo {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A repository with persistent identity and metadata.
#[derive(Debug, Clone)]
pub struct Session {
    git: Git,
    config: SessionConfig,
}

impl Session {
    /// Create or attach to a session at `path` using a default façade.
    ///
    /// A missing directory is created and initialised. An existing
    /// repository root is attached; any other directory is initialised.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotFound`] without git, [`GitError::Session`] for
    /// invalid metadata keys, and the child's error if a config write fails.
    pub fn new(path: impl AsRef<Path>, opts: &[SessionOption]) -> Result<Self, GitError> {
        Self::new_with(Git::new()?, path, opts)
    }

    /// [`Session::new`] with a caller-supplied façade.
    #[instrument(skip(git, path, opts), fields(path = %path.as_ref().display()))]
    pub fn new_with(
        git: Git,
        path: impl AsRef<Path>,
        opts: &[SessionOption],
    ) -> Result<Self, GitError> {
        let path = SessionOption::working_dir(opts)
            .cloned()
            .unwrap_or_else(|| path.as_ref().to_path_buf());
        let git = git.with_workdir(&path);
        attach_or_init(&git, &path)?;

        let mut config = match read_config(&git, &path) {
            Ok(existing) => {
                debug!(session_id = %existing.session_id, "attaching to existing session");
                existing
            }
            Err(GitError::Session(
                SessionError::NotASession { .. } | SessionError::MissingSessionId { .. },
            )) => SessionConfig::new(&path),
            Err(e) => return Err(e),
        };
        config.working_dir = path;
        for opt in opts {
            opt.apply(&mut config)?;
        }

        let session = Self { git, config };
        session.flush()?;
        info!(session_id = %session.config.session_id, "session ready");
        Ok(session)
    }

    /// Load the session stored at `path`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotASession`] when `path` is not a repository or has
    ///   no session section
    /// - [`SessionError::MissingSessionId`] when the section has no id
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GitError> {
        Self::load_with(Git::new()?, path)
    }

    /// [`Session::load`] with a caller-supplied façade.
    #[instrument(skip(git, path), fields(path = %path.as_ref().display()))]
    pub fn load_with(git: Git, path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let git = git.with_workdir(path);
        let config = read_config(&git, path)?;
        Ok(Self { git, config })
    }

    /// Whether `path` holds a loadable session.
    ///
    /// # Errors
    ///
    /// Only failures unrelated to the session itself (git missing, I/O).
    pub fn validate(path: impl AsRef<Path>) -> Result<bool, GitError> {
        match Self::load(path) {
            Ok(session) => Ok(session.is_valid()),
            Err(GitError::Session(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Describe the session stored at `path`.
    pub fn info(path: impl AsRef<Path>) -> Result<SessionInfo, GitError> {
        let session = Self::load(path)?;
        let config = session.config();
        Ok(SessionInfo {
            session_id: config.session_id.clone(),
            user_id: config.user_id.clone(),
            user_name: config.user_name.clone(),
            user_email: config.user_email.clone(),
            created: config.created,
            working_dir: config.working_dir.clone(),
            metadata: config.metadata.clone(),
            is_valid: session.is_valid(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.config.user_id
    }

    /// The façade bound to the session's repository.
    pub fn git(&self) -> &Git {
        &self.git
    }

    /// True while the repository still carries this session.
    pub fn is_valid(&self) -> bool {
        read_config(&self.git, &self.config.working_dir)
            .map(|stored| stored.session_id == self.config.session_id)
            .unwrap_or(false)
    }

    /// Change the identity in the session section and in `user.*`.
    #[instrument(skip(self))]
    pub fn update_user(&mut self, name: &str, email: &str) -> Result<(), GitError> {
        self.config.set_user(name, email);
        self.flush()
    }

    /// Store one metadata pair.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<(), GitError> {
        let key = self.config.set_metadata(key, value)?;
        self.git
            .set_config(&self.key(&key), value, &[git_config::local()])?;
        Ok(())
    }

    /// Remove one metadata pair; returns the old value.
    pub fn remove_metadata(&mut self, key: &str) -> Result<Option<String>, GitError> {
        let key = config::normalize_metadata_key(key)?;
        let old = self.config.metadata.remove(&key);
        if old.is_some() {
            self.git.unset_config(&self.key(&key), &[git_config::local()])?;
        }
        Ok(old)
    }

    /// Make sure the repository exists and holds the current config.
    #[instrument(skip(self))]
    pub fn init_repository(&self) -> Result<(), GitError> {
        attach_or_init(&self.git, &self.config.working_dir)?;
        self.flush()
    }

    /// Remove the session section.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotASession`] when no section is stored.
    #[instrument(skip(self), fields(session_id = %self.config.session_id))]
    pub fn destroy(&self) -> Result<(), GitError> {
        let section = self.git.session_section();
        let stored = self
            .git
            .get_config_regexp(&section_pattern(section), &[git_config::local()])?;
        if stored.is_empty() {
            return Err(SessionError::NotASession {
                path: self.config.working_dir.clone(),
            }
            .into());
        }
        self.git
            .remove_config_section(section, &[git_config::local()])?;
        info!("session destroyed");
        Ok(())
    }

    /// `opts` with the session identity in front.
    pub fn with_identity(&self, opts: &[GitOption]) -> Vec<GitOption> {
        let mut all = Vec::with_capacity(opts.len() + 1);
        if !self.config.user_name.is_empty() && !self.config.user_email.is_empty() {
            all.push(git_options::identity(
                self.config.user_name.clone(),
                self.config.user_email.clone(),
            ));
        }
        all.extend_from_slice(opts);
        all
    }

    pub fn commit(&self, message: &str, opts: &[GitOption]) -> Result<String, GitError> {
        self.git.commit(message, &self.with_identity(opts))
    }

    pub fn merge(&self, opts: &[GitOption]) -> Result<MergeResult, GitError> {
        self.git.merge(&self.with_identity(opts))
    }

    pub fn merge_continue(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.git.merge_continue(&self.with_identity(opts))
    }

    pub fn pull(&self, opts: &[GitOption]) -> Result<MergeResult, GitError> {
        self.git.pull(&self.with_identity(opts))
    }

    pub fn rebase(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.git.rebase(&self.with_identity(opts))
    }

    pub fn revert(&self, opts: &[GitOption]) -> Result<String, GitError> {
        self.git.revert(&self.with_identity(opts))
    }

    pub fn tag(&self, name: &str, opts: &[GitOption]) -> Result<String, GitError> {
        self.git.tag(name, &self.with_identity(opts))
    }

    /// Clone `url` into `destination` with the session identity.
    pub fn clone_repo(
        &self,
        url: &str,
        destination: impl AsRef<Path>,
        opts: &[GitOption],
    ) -> Result<String, GitError> {
        self.git
            .clone_repo(url, destination, &self.with_identity(opts))
    }

    fn key(&self, name: &str) -> String {
        format!("{}.{name}", self.git.session_section())
    }

    /// Write every field and metadata pair, plus `user.name` and `user.email`.
    fn flush(&self) -> Result<(), GitError> {
        let local = [git_config::local()];
        for (name, value) in self.config.entries() {
            self.git.set_config(&self.key(&name), &value, &local)?;
        }
        if !self.config.user_name.is_empty() {
            self.git
                .set_config("user.name", &self.config.user_name, &local)?;
        }
        if !self.config.user_email.is_empty() {
            self.git
                .set_config("user.email", &self.config.user_email, &local)?;
        }
        debug!(session_id = %self.config.session_id, "session config written");
        Ok(())
    }
}

fn section_pattern(section: &str) -> String {
    format!("^{}\\.", section.to_ascii_lowercase())
}

/// Create, initialise, or attach to the repository at `path`.
fn attach_or_init(git: &Git, path: &Path) -> Result<(), GitError> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .map_err(|e| GitError::io(format!("failed to create {}", path.display()), e))?;
        git.init(".", &[])?;
        return Ok(());
    }
    if is_repository_root(git, path)? {
        return Ok(());
    }
    git.init(".", &[])?;
    Ok(())
}

/// True when `path` is the top of a working tree or a bare repository.
///
/// A directory nested inside another repository is not a root.
fn is_repository_root(git: &Git, path: &Path) -> Result<bool, GitError> {
    if !git.is_repository(&[])? {
        return Ok(false);
    }
    if git.is_bare_repository(&[])? {
        return Ok(true);
    }
    let top = git.toplevel(&[])?;
    Ok(same_path(&top, path))
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Read the session section of the repository at `path`.
fn read_config(git: &Git, path: &Path) -> Result<SessionConfig, GitError> {
    let not_a_session = || SessionError::NotASession {
        path: path.to_path_buf(),
    };
    if !path.is_dir() || !git.is_repository(&[])? {
        return Err(not_a_session().into());
    }

    let section = git.session_section().to_ascii_lowercase();
    let prefix = format!("{section}.");
    let local = [git_config::local()];
    let entries = git
        .get_config_regexp(&section_pattern(&section), &local)?
        .into_iter()
        .filter_map(|(key, value)| {
            key.to_ascii_lowercase()
                .strip_prefix(&prefix)
                .map(|name| (name.to_string(), value))
        });
    let mut config = SessionConfig::from_entries(path, entries)?;
    config.working_dir = path.to_path_buf();

    if config.user_name.is_empty() {
        config.user_name = git.get_config("user.name", &local)?.unwrap_or_default();
    }
    if config.user_email.is_empty() {
        config.user_email = git.get_config("user.email", &local)?.unwrap_or_default();
    }
    Ok(config)
}
