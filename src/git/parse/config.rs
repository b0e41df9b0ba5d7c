//! git::parse::config
//!
//! `git config` listings.

use serde::Serialize;

use super::lines;

/// Where a config value was defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigScope {
    Local,
    Global,
    System,
    Worktree,
    /// `-c` on the command line or `GIT_CONFIG_*`
    Command,
    Unknown,
}

impl ConfigScope {
    pub fn parse(value: &str) -> Self {
        match value {
            "local" => ConfigScope::Local,
            "global" => ConfigScope::Global,
            "system" => ConfigScope::System,
            "worktree" => ConfigScope::Worktree,
            "command" => ConfigScope::Command,
            _ => ConfigScope::Unknown,
        }
    }
}

/// One `key=value` pair with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub scope: ConfigScope,
    /// File the value came from, `file:` prefix removed
    pub source_file: String,
}

/// Parse `config --list --show-scope --show-origin`.
///
/// Lines are `<scope>\t<origin>\t<key>=<value>`. Lines without three
/// tab-separated fields are skipped. A key without `=` has an empty value.
pub fn parse_config_list(output: &str) -> Vec<ConfigEntry> {
    lines(output)
        .filter_map(|line| {
            let mut fields = line.splitn(3, '\t');
            let scope = fields.next()?;
            let origin = fields.next()?;
            let pair = fields.next()?;
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            Some(ConfigEntry {
                key: key.to_string(),
                value: value.to_string(),
                scope: ConfigScope::parse(scope),
                source_file: origin.strip_prefix("file:").unwrap_or(origin).to_string(),
            })
        })
        .collect()
}

/// Parse `config --null --get-regexp` output into `(key, value)` pairs.
///
/// Records are NUL-terminated; the key and value are separated by the first
/// newline so multi-line values survive.
pub fn parse_null_pairs(output: &str) -> Vec<(String, String)> {
    output
        .split('\0')
        .filter(|r| !r.is_empty())
        .map(|record| {
            let (key, value) = record.split_once('\n').unwrap_or((record, ""));
            (key.to_string(), value.to_string())
        })
        .collect()
}
