//! session::options
//!
//! Options accepted by [`Session::new`](super::Session::new).

use std::path::PathBuf;

use super::config::SessionConfig;
use crate::git::error::SessionError;

/// Metadata keys written by [`with_instruqt`].
pub const INSTRUQT_TRACK: &str = "instruqt-track";
pub const INSTRUQT_CHALLENGE: &str = "instruqt-challenge";
pub const INSTRUQT_PARTICIPANT: &str = "instruqt-participant";

/// A change applied to a [`SessionConfig`] when a session is created or attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOption {
    /// Identity for commits; also written to `user.name` and `user.email`.
    User { name: String, email: String },
    /// Replace the derived user id.
    UserId(String),
    /// Lab-platform context stored as three metadata keys.
    Instruqt {
        track: String,
        challenge: String,
        participant: String,
    },
    /// One caller metadata pair.
    Metadata(String, String),
    /// Put the session here instead of the path given to the constructor.
    WorkingDir(PathBuf),
}

impl SessionOption {
    /// Apply to `config`.
    ///
    /// `WorkingDir` is resolved by the constructor and ignored here.
    ///
    /// # Errors
    ///
    /// Rejects metadata keys that are invalid or reserved.
    pub fn apply(&self, config: &mut SessionConfig) -> Result<(), SessionError> {
        match self {
            SessionOption::User { name, email } => config.set_user(name, email),
            SessionOption::UserId(id) => config.user_id = id.clone(),
            SessionOption::Instruqt {
                track,
                challenge,
                participant,
            } => {
                config.set_metadata(INSTRUQT_TRACK, track)?;
                config.set_metadata(INSTRUQT_CHALLENGE, challenge)?;
                config.set_metadata(INSTRUQT_PARTICIPANT, participant)?;
            }
            SessionOption::Metadata(key, value) => {
                config.set_metadata(key, value)?;
            }
            SessionOption::WorkingDir(_) => {}
        }
        Ok(())
    }

    /// The last working directory in `opts`, if any.
    pub(crate) fn working_dir(opts: &[SessionOption]) -> Option<&PathBuf> {
        opts.iter().rev().find_map(|o| match o {
            SessionOption::WorkingDir(dir) => Some(dir),
            _ => None,
        })
    }
}

pub fn with_user(name: impl Into<String>, email: impl Into<String>) -> SessionOption {
    SessionOption::User {
        name: name.into(),
        email: email.into(),
    }
}

pub fn with_user_id(id: impl Into<String>) -> SessionOption {
    SessionOption::UserId(id.into())
}

pub fn with_instruqt(
    track: impl Into<String>,
    challenge: impl Into<String>,
    participant: impl Into<String>,
) -> SessionOption {
    SessionOption::Instruqt {
        track: track.into(),
        challenge: challenge.into(),
        participant: participant.into(),
    }
}

pub fn with_metadata(key: impl Into<String>, value: impl Into<String>) -> SessionOption {
    SessionOption::Metadata(key.into(), value.into())
}

pub fn with_working_dir(dir: impl Into<PathBuf>) -> SessionOption {
    SessionOption::WorkingDir(dir.into())
}
