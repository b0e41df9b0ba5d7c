//! gitfacade - a typed façade over the git command-line tool
//!
//! gitfacade runs the `git` executable for every operation and turns its
//! output into typed records. It never reads repository files itself, so
//! whatever git supports (bare repositories, worktrees, SHA-256 object
//! formats) works unchanged.
//!
//! # Architecture
//!
//! - [`git`] - the façade: command builder, option layer, executor, parsers,
//!   and one module per verb
//! - [`session`] - persistent identity and metadata stored in a repository's
//!   config, with identity applied to every write-path call
//! - [`core`] - strong domain types and façade configuration
//!
//! # Guarantees
//!
//! 1. Every child process runs under a deadline (120 seconds by default)
//! 2. Non-zero exits surface as errors carrying argv, exit code and both
//!    streams, except outcomes the caller must handle as data (merge conflicts)
//! 3. Environment overlays such as forwarded tokens never appear in argv or logs
//!
//! # Example
//!
//! ```no_run
//! use gitfacade::git::{commit, options, Git};
//!
//! let git = Git::open("/path/to/repo")?;
//! for entry in git.status(&[])? {
//!     println!("{:?} {}", entry.code, entry.path);
//! }
//! git.commit(
//!     "chore: empty",
//!     &[commit::allow_empty(), options::identity("J Doe", "j@d")],
//! )?;
//! # Ok::<(), gitfacade::Error>(())
//! ```

pub mod core;
pub mod git;
pub mod session;

/// The crate-wide error type.
pub type Error = git::GitError;

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
