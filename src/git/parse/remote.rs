//! git::parse::remote
//!
//! `git remote -v` listing.

use serde::Serialize;

use super::lines;
use super::transfer::RefTransition;

/// A remote repository.
///
/// `refs` is filled only when the value comes from a push or fetch
/// transcript; a plain listing carries name and URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
    pub refs: Vec<RefTransition>,
}

/// Parse `remote -v` (or plain `remote`) output.
///
/// Each remote appears once, in listing order. The fetch URL wins over the
/// push URL when both are printed.
pub fn parse_remote_list(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in lines(output) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, rest) = line
            .split_once(|c: char| c == '\t' || c == ' ')
            .unwrap_or((line, ""));
        let rest = rest.trim();
        let (url, kind) = match rest.rsplit_once(' ') {
            Some((url, kind)) if kind.starts_with('(') => (url.trim(), kind),
            _ => (rest, ""),
        };

        match remotes.iter_mut().find(|r| r.name == name) {
            Some(existing) => {
                if kind == "(fetch)" || existing.url.is_empty() {
                    existing.url = url.to_string();
                }
            }
            None => remotes.push(Remote {
                name: name.to_string(),
                url: url.to_string(),
                refs: Vec::new(),
            }),
        }
    }
    remotes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_fetch_and_push() {
        let out = "origin\t/srv/a.git (fetch)\norigin\t/srv/a-push.git (push)\nupstream\thttps://example.com/u.git (fetch)\nupstream\thttps://example.com/u.git (push)\n";
        let remotes = parse_remote_list(out);
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url, "/srv/a.git");
        assert_eq!(remotes[1].url, "https://example.com/u.git");
        assert!(remotes[0].refs.is_empty());
    }

    #[test]
    fn push_listed_first_is_replaced_by_fetch() {
        let out = "o\tpush-url (push)\no\tfetch-url (fetch)\n";
        assert_eq!(parse_remote_list(out)[0].url, "fetch-url");
    }

    #[test]
    fn names_only() {
        let remotes = parse_remote_list("origin\nupstream\n");
        assert_eq!(remotes.len(), 2);
        assert!(remotes[1].url.is_empty());
    }

    #[test]
    fn empty() {
        assert!(parse_remote_list("").is_empty());
    }
}
