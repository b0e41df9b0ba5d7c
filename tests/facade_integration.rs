//! Integration tests for the git façade.
//!
//! These tests drive a real `git` binary against repositories created in
//! temporary directories. Every fixture sets a local identity and disables
//! signing so results do not depend on the host's configuration.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use gitfacade::git::parse::conflict::ConflictResolution;
use gitfacade::git::parse::status::StatusCode;
use gitfacade::git::parse::transfer::RefStatus;
use gitfacade::git::{
    branch, checkout, commit, config, diff, fetch, init, log, merge, options, push, rebase,
    reflog, revert, tag, Git, GitError, MergeState,
};

/// Route façade logs to the test harness; `RUST_LOG=gitfacade=debug` shows argv.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A repository in a temporary directory.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// An initialised repository with no commits, on branch `main`.
    fn empty() -> Self {
        init_tracing();
        let dir = TempDir::new().expect("failed to create temp dir");
        Git::new()
            .expect("git not found")
            .init(dir.path(), &[init::initial_branch("main")])
            .expect("init failed");
        configure(&Git::open(dir.path()).unwrap());
        Self { dir }
    }

    /// A repository with one commit adding `README.md`.
    fn new() -> Self {
        let repo = Self::empty();
        repo.commit_file("README.md", "# Test Repo\n", "initial");
        repo
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    fn write(&self, path: &str, content: &str) {
        std::fs::write(self.path().join(path), content).unwrap();
    }

    fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).unwrap()
    }

    fn commit_file(&self, path: &str, content: &str, message: &str) {
        self.write(path, content);
        let git = self.git();
        git.add(&[path], &[]).unwrap();
        git.commit(message, &[]).unwrap();
    }

    fn head(&self) -> String {
        self.git().head_commit(&[]).unwrap().unwrap().to_string()
    }
}

/// Local identity and no signing.
fn configure(git: &Git) {
    for (key, value) in [
        ("user.name", "Test User"),
        ("user.email", "test@example.com"),
        ("commit.gpgsign", "false"),
        ("tag.gpgsign", "false"),
    ] {
        git.set_config(key, value, &[config::local()]).unwrap();
    }
}

/// A bare repository `bare.git` and a clone of it in `work`, with one pushed commit.
struct Remotes {
    root: TempDir,
}

impl Remotes {
    fn new() -> Self {
        init_tracing();
        let root = TempDir::new().unwrap();
        let git = Git::new().unwrap();
        let bare = root.path().join("bare.git");
        git.init(&bare, &[init::bare(), init::initial_branch("main")])
            .unwrap();
        let remotes = Self { root };
        let work = remotes.clone_into("work");
        std::fs::write(work.workdir().unwrap().join("a.txt"), "a\n").unwrap();
        work.add(&["a.txt"], &[]).unwrap();
        work.commit("first", &[]).unwrap();
        work.push(&[push::remote("origin"), push::branch("HEAD:refs/heads/main")])
            .unwrap();
        remotes
    }

    fn bare(&self) -> PathBuf {
        self.root.path().join("bare.git")
    }

    fn clone_into(&self, name: &str) -> Git {
        let dest = self.root.path().join(name);
        Git::new()
            .unwrap()
            .clone_repo(&self.bare().display().to_string(), &dest, &[])
            .unwrap();
        let git = Git::open(&dest).unwrap();
        configure(&git);
        git
    }
}

fn commit_in(git: &Git, file: &str, content: &str, message: &str) {
    std::fs::write(git.workdir().unwrap().join(file), content).unwrap();
    git.add(&[file], &[]).unwrap();
    git.commit(message, &[]).unwrap();
}

mod scenarios {
    use super::*;

    #[test]
    fn init_in_empty_directory() {
        let repo = TestRepo::empty();
        let git = repo.git();
        assert!(git.status(&[]).unwrap().is_empty());
        assert!(git.list_branches(&[]).unwrap().is_empty());
        assert!(git.list_tags(&[]).unwrap().is_empty());
    }

    #[test]
    fn commit_with_explicit_identity() {
        let repo = TestRepo::empty();
        let git = repo.git();
        repo.write("README", "# A");
        git.add(&["README"], &[]).unwrap();
        git.commit("initial", &[options::identity("J Doe", "j@d")])
            .unwrap();

        let entries = git.log(&[log::max_count(1)]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].author, "J Doe <j@d>");
        assert_eq!(entries[0].committer, "J Doe <j@d>");
        assert_eq!(entries[0].message, "initial");
        assert!(entries[0].parent_ids.is_empty());
    }

    #[test]
    fn conflict_flow() {
        let repo = TestRepo::empty();
        let git = repo.git();
        repo.commit_file("f", "a\nb\nc\n", "base");
        git.create_branch("alt", &[]).unwrap();
        git.checkout(&[checkout::branch("alt")]).unwrap();
        repo.commit_file("f", "a\nB\nc\n", "theirs");
        git.checkout(&[checkout::branch("main")]).unwrap();
        repo.commit_file("f", "a\nb*\nc\n", "ours");

        let result = git.merge(&[merge::branch("alt")]).unwrap();
        assert!(!result.success);
        assert_eq!(result.conflicted_paths, ["f"]);
        assert_eq!(result.merged_branch, "alt");
        assert_eq!(result.base_branch, "main");
        let sections = &result.conflicts[0].sections;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].start_line, 2);
        assert_eq!(sections[0].our_content, "b*\n");
        assert_eq!(sections[0].their_content, "B\n");

        // Every conflicted path shows as unmerged
        let status = git.status(&[]).unwrap();
        for path in &result.conflicted_paths {
            assert!(status
                .iter()
                .any(|e| &e.path == path && e.code == StatusCode::Updated));
        }
        assert_eq!(git.merge_state(&[]).unwrap(), MergeState::MergingConflicted);

        git.resolve_conflicts(&[ConflictResolution::ours("f")], &[])
            .unwrap();
        assert_eq!(git.merge_state(&[]).unwrap(), MergeState::Merging);
        git.merge_continue(&[]).unwrap();
        assert_eq!(git.merge_state(&[]).unwrap(), MergeState::Clean);

        let head = &git.log(&[log::max_count(1)]).unwrap()[0];
        assert!(head.is_merge());
        assert_eq!(repo.read("f"), "a\nb*\nc\n");
    }

    #[test]
    fn push_transcript() {
        let root = TempDir::new().unwrap();
        let git = Git::new().unwrap();
        let bare = root.path().join("bare.git");
        git.init(&bare, &[init::bare(), init::initial_branch("main")])
            .unwrap();
        let work = root.path().join("work");
        git.clone_repo(&bare.display().to_string(), &work, &[])
            .unwrap();

        let w = Git::open(&work).unwrap();
        configure(&w);
        commit_in(&w, "a.txt", "a\n", "first");
        let branch = w.current_branch(&[]).unwrap().unwrap();

        let remotes = w
            .push(&[push::remote("origin"), push::branch(branch.clone())])
            .unwrap();
        assert_eq!(remotes.len(), 1);
        assert_eq!(Path::new(&remotes[0].name), bare.as_path());
        assert_eq!(remotes[0].refs.len(), 1);
        let transition = &remotes[0].refs[0];
        assert!(matches!(
            transition.status,
            RefStatus::New | RefStatus::FastForward
        ));
        assert_eq!(transition.to, branch);
    }

    #[test]
    fn global_config_overlay_sets_author() {
        let repo = TestRepo::new();
        let git = repo.git();
        repo.write("m.txt", "m\n");
        git.add(&["m.txt"], &[]).unwrap();
        git.commit(
            "m",
            &[
                options::config("user.name", "Q"),
                options::config("user.email", "q@q"),
            ],
        )
        .unwrap();

        let entry = &git.log(&[log::max_count(1)]).unwrap()[0];
        assert_eq!(entry.author, "Q <q@q>");
        assert_eq!(entry.message, "m");
    }
}

mod boundaries {
    use super::*;

    #[test]
    fn list_tags_on_fresh_repository() {
        let repo = TestRepo::empty();
        assert!(repo.git().list_tags(&[]).unwrap().is_empty());
    }

    #[test]
    fn list_branches_in_bare_repository() {
        let remotes = Remotes::new();
        let bare = Git::open(remotes.bare()).unwrap();
        assert!(bare.is_bare_repository(&[]).unwrap());
        let names: Vec<_> = bare
            .list_branches(&[])
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["main"]);
    }

    #[test]
    fn allow_empty_commit_on_clean_index() {
        let repo = TestRepo::new();
        let git = repo.git();
        let before = repo.head();
        assert!(git.commit("nothing", &[]).is_err());
        git.commit("nothing", &[commit::allow_empty()]).unwrap();
        assert_ne!(repo.head(), before);
    }

    #[test]
    fn delete_unmerged_branch_needs_force() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.checkout(&[checkout::create_new("topic")]).unwrap();
        repo.commit_file("t.txt", "t\n", "topic work");
        git.checkout(&[checkout::branch("main")]).unwrap();

        let err = git.delete_branch("topic", &[]).unwrap_err();
        assert!(matches!(err, GitError::Execution(_)));
        git.delete_branch("topic", &[branch::force()]).unwrap();
        let names: Vec<_> = git
            .list_branches(&[])
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["main"]);
    }

    #[test]
    fn checkout_commit_detaches() {
        let repo = TestRepo::new();
        repo.commit_file("second.txt", "2\n", "second");
        let git = repo.git();
        let first = git.resolve("HEAD~1", &[]).unwrap().unwrap();

        let result = git.checkout(&[checkout::branch(first.as_str())]).unwrap();
        assert!(result.success);
        assert!(result.detached_head);
        assert!(result.branch.is_empty());
        assert_eq!(result.commit, first.as_str());
        assert_eq!(result.new_head, first.as_str());
        assert_ne!(result.previous_head, result.new_head);
        assert_eq!(git.current_branch(&[]).unwrap(), None);
    }
}

mod repository {
    use super::*;

    #[test]
    fn plain_directory_is_not_a_repository() {
        let dir = TempDir::new().unwrap();
        let git = Git::open(dir.path()).unwrap();
        assert!(!git.is_repository(&[]).unwrap());
        let err = git.status(&[]).unwrap_err();
        assert!(err.is_not_a_repository());
    }

    #[test]
    fn head_and_branch_queries() {
        let repo = TestRepo::empty();
        let git = repo.git();
        assert_eq!(git.head_commit(&[]).unwrap(), None);
        assert_eq!(git.current_branch(&[]).unwrap().as_deref(), Some("main"));

        repo.commit_file("a.txt", "a\n", "a");
        let head = git.head_commit(&[]).unwrap().unwrap();
        assert_eq!(head.as_str().len(), 40);
        assert_eq!(git.resolve("main", &[]).unwrap(), Some(head));
        assert_eq!(git.resolve("no-such-branch", &[]).unwrap(), None);
        assert!(!git.is_bare_repository(&[]).unwrap());
    }

    #[test]
    fn working_dir_option_overrides_binding() {
        let repo = TestRepo::new();
        let unbound = Git::new().unwrap();
        let branches = unbound
            .list_branches(&[options::working_dir(repo.path())])
            .unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].name, "main");
    }
}

mod working_tree {
    use super::*;

    #[test]
    fn status_reports_changes() {
        let repo = TestRepo::new();
        let git = repo.git();
        repo.write("README.md", "# Changed\n");
        repo.write("new.txt", "new\n");
        repo.write("staged.txt", "staged\n");
        git.add(&["staged.txt"], &[]).unwrap();

        let status = git.status(&[]).unwrap();
        let code = |path: &str| {
            status
                .iter()
                .find(|e| e.path == path)
                .map(|e| e.code)
                .unwrap_or_else(|| panic!("{path} missing from status"))
        };
        assert_eq!(status.len(), 3);
        assert_eq!(code("README.md"), StatusCode::Modified);
        assert_eq!(code("new.txt"), StatusCode::Untracked);
        assert_eq!(code("staged.txt"), StatusCode::Added);
    }

    #[test]
    fn status_rejects_porcelain_v2() {
        let repo = TestRepo::new();
        repo.write("new.txt", "new\n");
        let v2 = gitfacade::git::GitOption::Args(vec!["--porcelain=v2".into()]);
        let err = repo.git().status(&[v2]).unwrap_err();
        assert!(matches!(err, GitError::Parse { .. }));
    }

    #[test]
    fn reset_unstages() {
        let repo = TestRepo::new();
        let git = repo.git();
        repo.write("new.txt", "new\n");
        git.add(&["new.txt"], &[]).unwrap();
        git.reset(&["new.txt"], &[]).unwrap();
        let status = git.status(&[]).unwrap();
        assert_eq!(status[0].code, StatusCode::Untracked);
    }

    #[test]
    fn remove_stages_deletion() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.remove(&["README.md"], &[]).unwrap();
        assert!(!repo.path().join("README.md").exists());
        let status = git.status(&[]).unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].code, StatusCode::Deleted);
    }

    #[test]
    fn diff_of_modified_file() {
        let repo = TestRepo::new();
        let git = repo.git();
        repo.write("README.md", "# Changed\n");

        let diffs = git.diff(&[]).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].old_path, "README.md");
        assert_eq!(diffs[0].new_path, "README.md");
        assert_eq!(diffs[0].hunks.len(), 1);

        assert!(git.diff(&[diff::cached()]).unwrap().is_empty());
        let stat = git.diff_stat(&[]).unwrap();
        assert_eq!(stat.summary.files_changed, 1);
        assert_eq!(stat.summary.insertions, 1);
        assert_eq!(stat.summary.deletions, 1);
    }

    #[test]
    fn checkout_new_branch() {
        let repo = TestRepo::new();
        let git = repo.git();
        let result = git.checkout(&[checkout::create_new("topic")]).unwrap();
        assert!(result.success);
        assert!(result.new_branch);
        assert!(!result.detached_head);
        assert_eq!(result.branch, "topic");
        assert_eq!(result.previous_head, result.new_head);
    }

    #[test]
    fn checkout_blocked_by_untracked_file() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.create_branch("alt", &[]).unwrap();
        repo.commit_file("extra.txt", "tracked\n", "extra");
        git.checkout(&[checkout::branch("alt")]).unwrap();
        repo.write("extra.txt", "untracked\n");

        let result = git.checkout(&[checkout::branch("main")]).unwrap();
        assert!(!result.success);
        assert_eq!(result.untracked_conflicts, ["extra.txt"]);
        assert_eq!(git.current_branch(&[]).unwrap().as_deref(), Some("alt"));
    }

    #[test]
    fn checkout_restores_files() {
        let repo = TestRepo::new();
        let git = repo.git();
        repo.write("README.md", "scribble\n");
        let result = git.checkout(&[checkout::files(["README.md"])]).unwrap();
        assert!(result.success);
        assert_eq!(repo.read("README.md"), "# Test Repo\n");
    }
}

mod history {
    use super::*;

    #[test]
    fn show_attaches_patch() {
        let repo = TestRepo::new();
        let entry = repo.git().show("HEAD", &[]).unwrap();
        assert_eq!(entry.commit_id, repo.head());
        assert_eq!(entry.message, "initial");
        assert_eq!(entry.diffs.len(), 1);
        assert_eq!(entry.diffs[0].new_path, "README.md");
    }

    #[test]
    fn log_formats() {
        let repo = TestRepo::new();
        repo.commit_file("b.txt", "b\n", "second");
        let git = repo.git();

        let records = git.log(&[]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "second");
        assert_eq!(records[0].parent_id, records[1].commit_id);

        let fuller = git.log(&[log::pretty("fuller"), log::reverse()]).unwrap();
        assert_eq!(fuller.len(), 2);
        assert_eq!(fuller[0].message, "initial");
        assert_eq!(fuller[0].author, "Test User <test@example.com>");

        let err = git.log(&[log::oneline()]).unwrap_err();
        assert!(matches!(err, GitError::Parse { .. }));
        assert_eq!(git.log_raw(&[log::oneline()]).unwrap().lines().count(), 2);
    }

    #[test]
    fn log_limited_to_path() {
        let repo = TestRepo::new();
        repo.commit_file("b.txt", "b\n", "second");
        let entries = repo.git().log(&[log::path("README.md")]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "initial");
    }

    #[test]
    fn reflog_lists_commits() {
        let repo = TestRepo::new();
        repo.commit_file("b.txt", "b\n", "second");
        let git = repo.git();
        let entries = git.reflog(&[]).unwrap();
        assert!(entries.len() >= 2);
        assert_eq!(entries[0].selector, "HEAD@{0}");
        assert_eq!(entries[0].message, "second");
        assert!(git.reflog_exists("HEAD", &[]).unwrap());
        assert!(!git.reflog_exists("refs/heads/nope", &[]).unwrap());
        assert!(git.reflog(&[reflog::expire(), reflog::all()]).unwrap().is_empty());
    }

    #[test]
    fn revert_records_inverse() {
        let repo = TestRepo::new();
        repo.commit_file("b.txt", "b\n", "add b");
        let git = repo.git();
        git.revert(&[revert::commit("HEAD")]).unwrap();
        assert!(!repo.path().join("b.txt").exists());
        let head = &git.log(&[log::max_count(1)]).unwrap()[0];
        assert!(head.subject().starts_with("Revert"));
    }

    #[test]
    fn rebase_onto_main() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.create_branch("topic", &[]).unwrap();
        repo.commit_file("main.txt", "m\n", "on main");
        let main_head = repo.head();
        git.checkout(&[checkout::branch("topic")]).unwrap();
        repo.commit_file("topic.txt", "t\n", "on topic");

        git.rebase(&[rebase::upstream("main")]).unwrap();
        let head = &git.log(&[log::max_count(1)]).unwrap()[0];
        assert_eq!(head.message, "on topic");
        assert_eq!(head.parent_id, main_head);
    }

    #[test]
    fn tags() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.tag("v1", &[]).unwrap();
        git.tag("v2", &[tag::message("release two")]).unwrap();
        assert_eq!(git.list_tags(&[]).unwrap(), ["v1", "v2"]);
        assert_eq!(git.list_tags(&[tag::points_at("HEAD")]).unwrap().len(), 2);

        git.delete_tag("v1", &[]).unwrap();
        assert_eq!(git.list_tags(&[]).unwrap(), ["v2"]);
        assert!(matches!(git.tag("bad..name", &[]), Err(GitError::Type(_))));
    }
}

mod merging {
    use super::*;

    #[test]
    fn fast_forward() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.checkout(&[checkout::create_new("topic")]).unwrap();
        repo.commit_file("t.txt", "t\n", "topic");
        git.checkout(&[checkout::branch("main")]).unwrap();

        let result = git.merge(&[merge::branch("topic")]).unwrap();
        assert!(result.success);
        assert!(result.fast_forward);
        assert_eq!(result.merge_commit, None);
        assert_eq!(result.stats.files_changed, 1);
        assert_eq!(result.diff_modes.len(), 1);
    }

    #[test]
    fn no_ff_creates_merge_commit() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.checkout(&[checkout::create_new("topic")]).unwrap();
        repo.commit_file("t.txt", "t\n", "topic");
        git.checkout(&[checkout::branch("main")]).unwrap();

        let result = git
            .merge(&[merge::branch("topic"), merge::no_ff(), merge::message("merge topic")])
            .unwrap();
        assert!(result.success);
        assert!(!result.fast_forward);
        assert_eq!(result.merge_commit.as_deref(), Some(repo.head().as_str()));
    }

    #[test]
    fn ff_only_refusal_is_data() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.checkout(&[checkout::create_new("topic")]).unwrap();
        repo.commit_file("t.txt", "t\n", "topic");
        git.checkout(&[checkout::branch("main")]).unwrap();
        repo.commit_file("m.txt", "m\n", "main");

        let result = git
            .merge(&[merge::branch("topic"), merge::ff_only()])
            .unwrap();
        assert!(!result.success);
        assert!(result.conflicted_paths.is_empty());
        assert!(result.abort_reason.is_some());
    }

    #[test]
    fn abort_restores_clean_state() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.checkout(&[checkout::create_new("topic")]).unwrap();
        repo.commit_file("README.md", "topic\n", "topic");
        git.checkout(&[checkout::branch("main")]).unwrap();
        repo.commit_file("README.md", "main\n", "main");

        let result = git.merge(&[merge::branch("topic")]).unwrap();
        assert!(!result.success);
        git.merge_abort(&[]).unwrap();
        assert_eq!(git.merge_state(&[]).unwrap(), MergeState::Clean);
        assert_eq!(repo.read("README.md"), "main\n");
    }

    #[test]
    fn custom_resolution_rewrites_file() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.checkout(&[checkout::create_new("topic")]).unwrap();
        repo.commit_file("README.md", "topic\n", "topic");
        git.checkout(&[checkout::branch("main")]).unwrap();
        repo.commit_file("README.md", "main\n", "main");

        let result = git.merge(&[merge::branch("topic")]).unwrap();
        let mut sections = result.conflicts[0].sections.clone();
        sections[0].resolved = true;
        sections[0].resolution = "both\n".into();
        git.resolve_conflicts(&[ConflictResolution::custom("README.md", sections)], &[])
            .unwrap();
        assert_eq!(repo.read("README.md"), "both\n");
        git.merge_continue(&[]).unwrap();
        assert!(git.log(&[log::max_count(1)]).unwrap()[0].is_merge());
    }
}

mod remotes {
    use super::*;

    #[test]
    fn manage_remotes() {
        let repo = TestRepo::new();
        let git = repo.git();
        git.add_remote("origin", "https://example.com/a.git", &[])
            .unwrap();
        git.add_remote("upstream", "https://example.com/b.git", &[])
            .unwrap();
        let remotes = git.list_remotes(&[]).unwrap();
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url, "https://example.com/a.git");

        git.set_remote_url("origin", "https://example.com/c.git", &[])
            .unwrap();
        git.remove_remote("upstream", &[]).unwrap();
        let remotes = git.list_remotes(&[]).unwrap();
        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].url, "https://example.com/c.git");
    }

    #[test]
    fn fetch_then_pull() {
        let remotes = Remotes::new();
        let ahead = remotes.clone_into("ahead");
        let behind = remotes.clone_into("behind");

        commit_in(&ahead, "b.txt", "b\n", "second");
        ahead.push(&[]).unwrap();

        let fetched = behind.fetch(&[]).unwrap();
        assert_eq!(fetched.len(), 1);
        let transition = &fetched[0].refs[0];
        assert_eq!(transition.status, RefStatus::FastForward);
        assert_eq!(transition.to, "origin/main");

        let result = behind.pull(&[]).unwrap();
        assert!(result.success);
        assert!(result.fast_forward);
        assert_eq!(result.merged_branch, "origin/main");
        assert_eq!(result.stats.files_changed, 1);
        assert_eq!(result.stats.insertions, 1);
        assert!(behind.workdir().unwrap().join("b.txt").exists());
    }

    #[test]
    fn nothing_to_fetch() {
        let remotes = Remotes::new();
        let work = remotes.clone_into("again");
        assert!(work.fetch(&[fetch::prune()]).unwrap().is_empty());
    }

    #[test]
    fn push_and_delete_tags() {
        let remotes = Remotes::new();
        let work = remotes.clone_into("tagger");
        work.tag("v1", &[]).unwrap();

        let pushed = work.push_tags("origin", &[]).unwrap();
        assert_eq!(pushed[0].refs[0].status, RefStatus::New);
        let bare = Git::open(remotes.bare()).unwrap();
        assert_eq!(bare.list_tags(&[]).unwrap(), ["v1"]);

        let deleted = work.delete_remote_tag("origin", "v1", &[]).unwrap();
        assert_eq!(deleted[0].refs[0].status, RefStatus::Pruned);
        assert!(bare.list_tags(&[]).unwrap().is_empty());
    }

    #[test]
    fn porcelain_push_parses_stdout() {
        let remotes = Remotes::new();
        let work = remotes.clone_into("porcelain");
        commit_in(&work, "p.txt", "p\n", "porcelain");
        let pushed = work.push(&[push::porcelain()]).unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].refs[0].status, RefStatus::FastForward);
    }

    #[test]
    fn clone_into_non_empty_directory_fails() {
        let remotes = Remotes::new();
        let dest = remotes.root.path().join("occupied");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("x"), "x").unwrap();
        let err = Git::new()
            .unwrap()
            .clone_repo(&remotes.bare().display().to_string(), &dest, &[])
            .unwrap_err();
        assert!(err.as_execution().is_some_and(|e| e.is_destination_exists()));
    }
}

mod configuration {
    use super::*;
    use gitfacade::git::parse::config::ConfigScope;

    #[test]
    fn set_get_list_unset() {
        let repo = TestRepo::new();
        let git = repo.git();
        let local = [config::local()];
        git.set_config("lab.track", "git-basics", &local).unwrap();
        assert_eq!(
            git.get_config("lab.track", &local).unwrap().as_deref(),
            Some("git-basics")
        );
        assert_eq!(git.get_config("lab.missing", &local).unwrap(), None);

        let entries = git.list_config(&local).unwrap();
        let entry = entries.iter().find(|e| e.key == "lab.track").unwrap();
        assert_eq!(entry.scope, ConfigScope::Local);
        assert_eq!(entry.value, "git-basics");

        assert_eq!(
            git.get_config_regexp("^lab\\.", &local).unwrap(),
            [("lab.track".to_string(), "git-basics".to_string())]
        );
        git.unset_config("lab.track", &local).unwrap();
        assert_eq!(git.get_config("lab.track", &local).unwrap(), None);
    }

    #[test]
    fn facade_reads_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = 7\nsession_section = \"lab\"\n").unwrap();

        let git = Git::from_config_file(&path).unwrap();
        assert_eq!(git.timeout(), std::time::Duration::from_secs(7));
        assert_eq!(git.session_section(), "lab");

        let defaults = Git::from_config_file(temp.path().join("absent.toml")).unwrap();
        assert_eq!(defaults.session_section(), "gitfacade");

        std::fs::write(&path, "timeout_secs = 0\n").unwrap();
        assert!(matches!(Git::from_config_file(&path), Err(GitError::Config(_))));
    }
}
