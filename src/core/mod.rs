//! core
//!
//! Domain types and façade configuration shared by the `git` and `session`
//! layers. Nothing in here spawns processes.

pub mod config;
pub mod types;
