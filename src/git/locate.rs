//! git::locate
//!
//! Resolves the `git` executable once, at façade construction.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::GitError;

/// Name searched for on `PATH` when no explicit binary is configured.
pub const GIT_BINARY: &str = "git";

/// Resolve `binary` to an absolute executable path.
///
/// A bare name is searched on `PATH`; a path is checked directly.
///
/// # Errors
///
/// Returns [`GitError::NotFound`] if nothing executable matches.
pub fn locate(binary: &Path) -> Result<PathBuf, GitError> {
    let resolved = which::which(binary).map_err(|_| GitError::NotFound {
        binary: binary.display().to_string(),
    })?;
    debug!(binary = %resolved.display(), "located git");
    Ok(resolved)
}
