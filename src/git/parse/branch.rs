//! git::parse::branch
//!
//! `git branch --list` output.

use serde::Serialize;

use super::lines;

/// A branch in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    /// Marked with `*`: checked out in this worktree
    pub active: bool,
}

/// Parse `branch --list` output, including `-a`, `-r`, and `-v` variants.
///
/// The name is the first token after the marker column. A detached HEAD
/// line keeps its parenthesised description, e.g. `(HEAD detached at 1a2b3c4)`.
/// Symbolic remote refs (`origin/HEAD -> origin/main`) keep only the left side.
pub fn parse_branch_list(output: &str) -> Vec<Branch> {
    lines(output)
        .filter(|l| l.len() > 2)
        .map(|line| {
            let marker = line.chars().next().unwrap_or(' ');
            let rest = line.get(2..).unwrap_or("").trim_start();
            let name = if rest.starts_with('(') {
                match rest.find(')') {
                    Some(end) => &rest[..=end],
                    None => rest,
                }
            } else {
                rest.split_whitespace().next().unwrap_or(rest)
            };
            Branch {
                name: name.to_string(),
                active: marker == '*',
            }
        })
        .filter(|b| !b.name.is_empty())
        .collect()
}

/// Parse a one-name-per-line listing (`tag --list`, `for-each-ref`).
pub fn parse_name_list(output: &str) -> Vec<String> {
    lines(output)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_active() {
        let branches = parse_branch_list("  alt\n* main\n+ wt-branch\n");
        assert_eq!(branches.len(), 3);
        assert_eq!(branches[0], Branch { name: "alt".into(), active: false });
        assert!(branches[1].active);
        assert!(!branches[2].active);
        assert_eq!(branches[2].name, "wt-branch");
    }

    #[test]
    fn verbose_and_remote_listing() {
        let out = "* main 1a2b3c4 [origin/main] initial\n  remotes/origin/HEAD -> origin/main\n  remotes/origin/main 1a2b3c4 initial\n";
        let branches = parse_branch_list(out);
        assert_eq!(branches[0].name, "main");
        assert_eq!(branches[1].name, "remotes/origin/HEAD");
        assert_eq!(branches[2].name, "remotes/origin/main");
    }

    #[test]
    fn detached_head() {
        let branches = parse_branch_list("* (HEAD detached at 1a2b3c4)\n  main\n");
        assert_eq!(branches[0].name, "(HEAD detached at 1a2b3c4)");
        assert!(branches[0].active);
    }

    #[test]
    fn empty() {
        assert!(parse_branch_list("").is_empty());
        assert!(parse_name_list("\n").is_empty());
    }

    #[test]
    fn names() {
        assert_eq!(parse_name_list("v1.0\nv1.1\n"), vec!["v1.0", "v1.1"]);
    }
}
