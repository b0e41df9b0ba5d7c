//! core::types
//!
//! Strong types for values the git tool guarantees the shape of.
//!
//! # Types
//!
//! - [`BranchName`] - Validated Git branch name
//! - [`Oid`] - Git object identifier (SHA)
//! - [`RefName`] - Validated Git reference name
//! - [`UtcTimestamp`] - RFC3339 timestamp with one-second resolution
//!
//! # Validation
//!
//! These types enforce validity at construction time. Output that may carry
//! abbreviated or decorated ids (log transcripts, push summaries) stays a
//! plain `String`; only values read back through `rev-parse` and similar
//! plumbing are lifted into these types.
//!
//! # Examples
//!
//! ```
//! use gitfacade::core::types::{BranchName, Oid, RefName};
//!
//! let branch = BranchName::new("feature/my-branch").unwrap();
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let tag = RefName::for_tag("v1.0").unwrap();
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(Oid::new("not-a-sha").is_err());
//! assert_eq!(branch.as_str(), "feature/my-branch");
//! assert_eq!(oid.as_str().len(), 40);
//! assert_eq!(tag.as_str(), "refs/tags/v1.0");
//! ```

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Characters git refuses anywhere in a ref name.
const INVALID_REF_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];

/// Shared check-ref-format rules for branch and ref names.
///
/// Returns a description of the first violated rule.
fn check_ref_format(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("cannot be empty".into());
    }
    if name == "@" {
        return Err("cannot be '@' (reserved)".into());
    }
    if name.starts_with('/') {
        return Err("cannot start with '/'".into());
    }
    if name.ends_with('/') {
        return Err("cannot end with '/'".into());
    }
    if name.ends_with(".lock") {
        return Err("cannot end with '.lock'".into());
    }
    for pattern in ["..", "@{", "//"] {
        if name.contains(pattern) {
            return Err(format!("cannot contain '{pattern}'"));
        }
    }
    for c in INVALID_REF_CHARS {
        if name.contains(c) {
            return Err(format!("cannot contain '{c}'"));
        }
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Err("cannot contain control characters".into());
    }
    for component in name.split('/') {
        if component.starts_with('.') {
            return Err("path component cannot start with '.'".into());
        }
        if component.ends_with(".lock") {
            return Err("path component cannot end with '.lock'".into());
        }
    }
    Ok(())
}

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`)
/// and additionally cannot start with `-`, so they are never mistaken for a
/// flag when placed on a command line.
///
/// # Example
///
/// ```
/// use gitfacade::core::types::BranchName;
///
/// let name = BranchName::new("feature/my-branch").unwrap();
/// assert_eq!(name.as_str(), "feature/my-branch");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("-f").is_err());
/// assert!(BranchName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '-'".into(),
            ));
        }
        check_ref_format(&name)
            .map_err(|rule| TypeError::InvalidBranchName(format!("branch name {rule}")))?;
        Ok(Self(name))
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use gitfacade::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// Surrounding whitespace is trimmed (plumbing output ends in a newline)
    /// and the OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a full hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().trim().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git reference name.
///
/// # Example
///
/// ```
/// use gitfacade::core::types::RefName;
///
/// assert_eq!(RefName::for_tag("v1.0").unwrap().as_str(), "refs/tags/v1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(String);

impl RefName {
    /// Create a new validated ref name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_ref_format(&name)
            .map_err(|rule| TypeError::InvalidRefName(format!("ref name {rule}")))?;
        Ok(Self(name))
    }

    /// Create a ref name for a tag (`refs/tags/<tag>`).
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRefName` if the tag name is not a valid ref component.
    pub fn for_tag(tag: &str) -> Result<Self, TypeError> {
        Self::new(format!("refs/tags/{tag}"))
    }

    /// Get the ref name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RefName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RefName> for String {
    fn from(name: RefName) -> Self {
        name.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp truncated to whole seconds.
///
/// Rendered as RFC3339 with a `Z` suffix, which is the form stored in
/// repository configuration. Truncation at construction keeps a value equal
/// to itself after a write/read round trip.
///
/// # Example
///
/// ```
/// use gitfacade::core::types::UtcTimestamp;
///
/// let ts = UtcTimestamp::parse("2024-05-01T12:30:00Z").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-05-01T12:30:00Z");
/// assert_eq!(UtcTimestamp::parse(&ts.to_rfc3339()).unwrap(), ts);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UtcTimestamp(DateTime<Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Drop sub-second precision.
    fn from_datetime(dt: DateTime<Utc>) -> Self {
        let secs = dt.timestamp();
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or(dt))
    }

    /// Parse an RFC3339 timestamp in any offset.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTimestamp` if the value is not RFC3339.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        DateTime::parse_from_rfc3339(value.trim())
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|e| TypeError::InvalidTimestamp(format!("'{value}': {e}")))
    }

    /// Render as RFC3339 with second resolution.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}
