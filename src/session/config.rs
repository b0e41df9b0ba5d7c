//! session::config
//!
//! The persisted half of a session.
//!
//! A session is stored as one section of the repository's local config
//! (`[gitfacade]` by default):
//!
//! ```text
//! [gitfacade]
//!     user-name = A
//!     user-email = a@x
//!     user-id = 5f1c0e3a9b2d4c6e
//!     session-id = 0b9f6a1e-...
//!     created = 2024-01-04T10:00:00Z
//!     working-dir = /tmp/S
//!     track = git-basics
//! ```
//!
//! Every key that is not a session field is caller metadata.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::config::schema::is_valid_section_name;
use crate::core::types::UtcTimestamp;
use crate::git::error::SessionError;

pub const KEY_USER_NAME: &str = "user-name";
pub const KEY_USER_EMAIL: &str = "user-email";
pub const KEY_USER_ID: &str = "user-id";
pub const KEY_SESSION_ID: &str = "session-id";
pub const KEY_CREATED: &str = "created";
pub const KEY_WORKING_DIR: &str = "working-dir";

/// Keys that hold session fields and cannot be used for metadata.
pub const RESERVED_KEYS: [&str; 6] = [
    KEY_USER_NAME,
    KEY_USER_EMAIL,
    KEY_USER_ID,
    KEY_SESSION_ID,
    KEY_CREATED,
    KEY_WORKING_DIR,
];

/// Hex characters kept from the email digest.
const USER_ID_LEN: usize = 16;

/// Session state as stored in the repository config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub user_name: String,
    pub user_email: String,
    /// Stable id derived from the email unless set explicitly
    pub user_id: String,
    pub session_id: String,
    /// Second resolution
    pub created: UtcTimestamp,
    pub working_dir: PathBuf,
    pub metadata: BTreeMap<String, String>,
}

impl SessionConfig {
    /// A fresh session with a new id, created now.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            user_name: String::new(),
            user_email: String::new(),
            user_id: String::new(),
            session_id: Uuid::new_v4().to_string(),
            created: UtcTimestamp::now(),
            working_dir: working_dir.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Set the identity.
    ///
    /// A user id that was derived from the previous email (or never set)
    /// follows the new email; an explicitly chosen id is kept.
    pub fn set_user(&mut self, name: &str, email: &str) {
        let derived = self.user_id.is_empty() || self.user_id == derive_user_id(&self.user_email);
        self.user_name = name.to_string();
        self.user_email = email.to_string();
        if derived {
            self.user_id = derive_user_id(email);
        }
    }

    /// Insert a metadata pair; the key is lowercased.
    ///
    /// # Errors
    ///
    /// Rejects keys git cannot store and keys reserved for session fields.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<String, SessionError> {
        let key = normalize_metadata_key(key)?;
        self.metadata.insert(key.clone(), value.to_string());
        Ok(key)
    }

    /// Section entries to write, as `(key, value)`.
    ///
    /// Empty session fields are skipped; every metadata pair is kept, empty
    /// values included.
    pub fn entries(&self) -> Vec<(String, String)> {
        let fields = [
            (KEY_USER_NAME, self.user_name.clone()),
            (KEY_USER_EMAIL, self.user_email.clone()),
            (KEY_USER_ID, self.user_id.clone()),
            (KEY_SESSION_ID, self.session_id.clone()),
            (KEY_CREATED, self.created.to_rfc3339()),
            (KEY_WORKING_DIR, self.working_dir.display().to_string()),
        ];
        fields
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.to_string(), v))
            .chain(self.metadata.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }

    /// Rebuild from section entries, keys without the section prefix.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotASession`] when there are no entries
    /// - [`SessionError::MissingSessionId`] when no session id is stored
    /// - [`SessionError::InvalidTimestamp`] when `created` is missing or malformed
    pub fn from_entries<I>(path: &Path, entries: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields: BTreeMap<String, String> = entries.into_iter().collect();
        if fields.is_empty() {
            return Err(SessionError::NotASession {
                path: path.to_path_buf(),
            });
        }

        let session_id = fields
            .remove(KEY_SESSION_ID)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SessionError::MissingSessionId {
                path: path.to_path_buf(),
            })?;
        let created_raw = fields.remove(KEY_CREATED).unwrap_or_default();
        let created = UtcTimestamp::parse(&created_raw)
            .map_err(|_| SessionError::InvalidTimestamp { value: created_raw })?;
        let working_dir = fields
            .remove(KEY_WORKING_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf());

        Ok(Self {
            user_name: fields.remove(KEY_USER_NAME).unwrap_or_default(),
            user_email: fields.remove(KEY_USER_EMAIL).unwrap_or_default(),
            user_id: fields.remove(KEY_USER_ID).unwrap_or_default(),
            session_id,
            created,
            working_dir,
            metadata: fields,
        })
    }
}

/// First 16 hex characters of the SHA-256 of the trimmed, lowercased email.
pub fn derive_user_id(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(USER_ID_LEN);
    id
}

/// Lowercase `key` and check it can be stored as a metadata key.
///
/// # Errors
///
/// Returns [`SessionError::InvalidMetadataKey`] unless the key starts with a
/// letter and holds only letters, digits and `-`, and
/// [`SessionError::ReservedMetadataKey`] for session field names.
pub fn normalize_metadata_key(key: &str) -> Result<String, SessionError> {
    let key = key.trim().to_ascii_lowercase();
    if !is_valid_section_name(&key) {
        return Err(SessionError::InvalidMetadataKey { key });
    }
    if RESERVED_KEYS.contains(&key.as_str()) {
        return Err(SessionError::ReservedMetadataKey { key });
    }
    Ok(key)
}
