//! Integration tests for sessions.
//!
//! Sessions are created in temporary directories and read back through a
//! fresh handle, so every assertion goes through the repository config.

use std::path::Path;

use tempfile::TempDir;

use gitfacade::git::{config, init, log, options, Git, GitError, SessionError};
use gitfacade::session::config::derive_user_id;
use gitfacade::session::options::*;
use gitfacade::session::Session;

fn session_error(err: GitError) -> SessionError {
    match err {
        GitError::Session(e) => e,
        other => panic!("expected a session error, got {other:?}"),
    }
}

fn commit_file(session: &Session, file: &str, message: &str) {
    let dir = session.git().workdir().unwrap().to_path_buf();
    std::fs::write(dir.join(file), "content\n").unwrap();
    session.git().add(&[file], &[]).unwrap();
    session
        .commit(message, &[options::config("commit.gpgsign", "false")])
        .unwrap();
}

mod lifecycle {
    use super::*;

    #[test]
    fn round_trip_through_config() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("S");
        let created = Session::new(
            &path,
            &[with_user("A", "a@x"), with_metadata("track", "git-basics")],
        )
        .unwrap();
        let id = created.session_id().to_string();
        drop(created);

        let loaded = Session::load(&path).unwrap();
        let config = loaded.config();
        assert_eq!(config.user_name, "A");
        assert_eq!(config.user_email, "a@x");
        assert_eq!(config.user_id, derive_user_id("a@x"));
        assert_eq!(config.metadata["track"], "git-basics");
        assert_eq!(config.session_id, id);
        assert_eq!(config.working_dir, path);
        assert!(loaded.is_valid());
    }

    #[test]
    fn new_is_idempotent() {
        let root = TempDir::new().unwrap();
        let opts = [with_user("A", "a@x"), with_metadata("track", "git-basics")];
        let first = Session::new(root.path(), &opts).unwrap();
        let second = Session::new(root.path(), &opts).unwrap();
        assert_eq!(first.config(), second.config());
    }

    #[test]
    fn new_overlays_existing_session() {
        let root = TempDir::new().unwrap();
        let first = Session::new(root.path(), &[with_user("A", "a@x")]).unwrap();
        let second = Session::new(root.path(), &[with_metadata("track", "t")]).unwrap();
        assert_eq!(second.session_id(), first.session_id());
        assert_eq!(second.config().user_name, "A");
        assert_eq!(second.config().metadata["track"], "t");
    }

    #[test]
    fn working_dir_option_moves_session() {
        let root = TempDir::new().unwrap();
        let elsewhere = root.path().join("elsewhere");
        let session = Session::new(
            root.path().join("ignored"),
            &[with_working_dir(&elsewhere)],
        )
        .unwrap();
        assert_eq!(session.config().working_dir, elsewhere);
        assert!(elsewhere.join(".git").is_dir());
        assert!(!root.path().join("ignored").exists());
    }

    #[test]
    fn destroy_removes_section_only() {
        let root = TempDir::new().unwrap();
        let session = Session::new(root.path(), &[with_user("A", "a@x")]).unwrap();
        session.destroy().unwrap();

        assert!(!session.is_valid());
        assert!(!Session::validate(root.path()).unwrap());
        let git = Git::open(root.path()).unwrap();
        assert!(git.is_repository(&[]).unwrap());
        assert_eq!(
            git.get_config("user.name", &[config::local()]).unwrap().as_deref(),
            Some("A")
        );

        let err = session_error(session.destroy().unwrap_err());
        assert!(matches!(err, SessionError::NotASession { .. }));
    }

    #[test]
    fn init_repository_restores_config() {
        let root = TempDir::new().unwrap();
        let session = Session::new(root.path(), &[with_user("A", "a@x")]).unwrap();
        session.destroy().unwrap();
        session.init_repository().unwrap();
        assert!(session.is_valid());
    }
}

mod loading {
    use super::*;

    #[test]
    fn plain_directory_is_not_a_session() {
        let root = TempDir::new().unwrap();
        let err = session_error(Session::load(root.path()).unwrap_err());
        assert!(matches!(err, SessionError::NotASession { .. }));
        assert!(!Session::validate(root.path()).unwrap());
    }

    #[test]
    fn repository_without_section_is_not_a_session() {
        let root = TempDir::new().unwrap();
        Git::new().unwrap().init(root.path(), &[]).unwrap();
        let err = session_error(Session::load(root.path()).unwrap_err());
        assert!(matches!(err, SessionError::NotASession { .. }));
    }

    #[test]
    fn missing_session_id() {
        let root = TempDir::new().unwrap();
        let git = Git::new().unwrap();
        git.init(root.path(), &[]).unwrap();
        let git = git.with_workdir(root.path());
        git.set_config("gitfacade.user-name", "A", &[config::local()])
            .unwrap();

        let err = session_error(Session::load(root.path()).unwrap_err());
        assert!(matches!(err, SessionError::MissingSessionId { .. }));

        // A new session replaces the broken section
        let session = Session::new(root.path(), &[]).unwrap();
        assert!(!session.session_id().is_empty());
        assert!(Session::validate(root.path()).unwrap());
        assert_eq!(Session::load(root.path()).unwrap().config().user_name, "A");
    }

    #[test]
    fn info_serialises() {
        let root = TempDir::new().unwrap();
        let session = Session::new(
            root.path(),
            &[with_user("A", "a@x"), with_instruqt("git-basics", "first-commit", "p-42")],
        )
        .unwrap();

        let info = Session::info(root.path()).unwrap();
        assert!(info.is_valid);
        assert_eq!(info.session_id, session.session_id());
        assert_eq!(info.metadata[INSTRUQT_CHALLENGE], "first-commit");

        let json: serde_json::Value = serde_json::from_str(&info.to_json().unwrap()).unwrap();
        assert_eq!(json["user_email"], "a@x");
        assert_eq!(json["metadata"][INSTRUQT_TRACK], "git-basics");
    }
}

mod attaching {
    use super::*;

    #[test]
    fn existing_repository_is_reused() {
        let root = TempDir::new().unwrap();
        let git = Git::new().unwrap();
        git.init(root.path(), &[init::initial_branch("trunk")]).unwrap();

        Session::new(root.path(), &[with_user("A", "a@x")]).unwrap();
        let bound = git.with_workdir(root.path());
        assert_eq!(bound.current_branch(&[]).unwrap().as_deref(), Some("trunk"));
    }

    #[test]
    fn subdirectory_gets_its_own_repository() {
        let root = TempDir::new().unwrap();
        Git::new().unwrap().init(root.path(), &[]).unwrap();
        let nested = root.path().join("nested");
        std::fs::create_dir(&nested).unwrap();

        Session::new(&nested, &[]).unwrap();
        assert!(nested.join(".git").is_dir());
        assert!(Session::load(root.path()).is_err());
    }
}

mod identity {
    use super::*;

    fn author_of_head(path: &Path) -> String {
        Git::open(path).unwrap().log(&[log::max_count(1)]).unwrap()[0]
            .author
            .clone()
    }

    #[test]
    fn commits_use_session_identity() {
        let root = TempDir::new().unwrap();
        let session = Session::new(root.path(), &[with_user("A", "a@x")]).unwrap();
        commit_file(&session, "README", "initial");
        assert_eq!(author_of_head(root.path()), "A <a@x>");
    }

    #[test]
    fn update_user_applies_to_next_commit() {
        let root = TempDir::new().unwrap();
        let mut session = Session::new(root.path(), &[with_user("A", "a@x")]).unwrap();
        commit_file(&session, "one", "one");
        session.update_user("B", "b@x").unwrap();
        commit_file(&session, "two", "two");

        assert_eq!(author_of_head(root.path()), "B <b@x>");
        let loaded = Session::load(root.path()).unwrap();
        assert_eq!(loaded.config().user_name, "B");
        assert_eq!(loaded.user_id(), derive_user_id("b@x"));
    }

    #[test]
    fn explicit_user_id_survives_reload() {
        let root = TempDir::new().unwrap();
        Session::new(
            root.path(),
            &[with_user("A", "a@x"), with_user_id("learner-7")],
        )
        .unwrap();
        assert_eq!(Session::load(root.path()).unwrap().user_id(), "learner-7");
    }
}

mod metadata {
    use super::*;

    #[test]
    fn set_and_remove_persist() {
        let root = TempDir::new().unwrap();
        let mut session = Session::new(root.path(), &[]).unwrap();
        session.set_metadata("Stage", "two").unwrap();
        assert_eq!(
            Session::load(root.path()).unwrap().config().metadata["stage"],
            "two"
        );

        assert_eq!(session.remove_metadata("stage").unwrap().as_deref(), Some("two"));
        assert_eq!(session.remove_metadata("stage").unwrap(), None);
        assert!(!Session::load(root.path())
            .unwrap()
            .config()
            .metadata
            .contains_key("stage"));
    }

    #[test]
    fn invalid_keys_rejected_before_writing() {
        let root = TempDir::new().unwrap();
        let mut session = Session::new(root.path(), &[]).unwrap();
        let err = session_error(session.set_metadata("session-id", "x").unwrap_err());
        assert!(matches!(err, SessionError::ReservedMetadataKey { .. }));

        let err = session_error(
            Session::new(root.path(), &[with_metadata("no spaces", "x")]).unwrap_err(),
        );
        assert!(matches!(err, SessionError::InvalidMetadataKey { .. }));
    }

    #[test]
    fn empty_value_survives_reload() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("S");
        Session::new(&path, &[with_user("A", "a@x"), with_metadata("k", "")]).unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded.config().metadata.get("k"), Some(&String::new()));
    }
}
