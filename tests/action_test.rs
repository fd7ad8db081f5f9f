// tests/action_test.rs
use git2::{Repository as Git2Repo, Signature};
use semver::Version;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use unicorn::action::{self, ActionArgs};
use unicorn::auth::{ScriptedInteraction, SessionManager};
use unicorn::config::ProjectConfig;
use unicorn::domain::{Component, VersionBump};
use unicorn::git::Git2Repository;
use unicorn::github::{
    Issue, MockConnector, MockTracker, PullRequest, RepoSlug, TrackerCall,
};
use unicorn::UnicornError;

const TOKEN: &str = "ghs_installation";

/// A checkout of `octo/widgets` on `branch` with a project config
fn checkout(branch: &str) -> (TempDir, Git2Repository) {
    let dir = TempDir::new().unwrap();
    let repo = Git2Repo::init(dir.path()).unwrap();
    repo.remote("origin", "https://github.com/octo/widgets.git")
        .unwrap();

    let config = ProjectConfig::new("widgets")
        .with_components(vec![Component::new("api", None, &["src/api/**"])])
        .unwrap();
    config.save(dir.path()).unwrap();

    {
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let mut index = repo.index().unwrap();
        index
            .add_path(Path::new(unicorn::config::PROJECT_CONFIG_FILE))
            .unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let oid = repo
            .commit(None, &sig, &sig, "initial", &tree, &[])
            .unwrap();
        let commit = repo.find_commit(oid).unwrap();
        repo.branch(branch, &commit, false).unwrap();
    }
    repo.set_head(&format!("refs/heads/{}", branch)).unwrap();

    (dir, Git2Repository::from_git2(repo))
}

fn write_event(dir: &TempDir, contents: &str) -> ActionArgs {
    let event_path = dir.path().join("event.json");
    fs::write(&event_path, contents).unwrap();
    ActionArgs {
        prefix: dir.path().to_path_buf(),
        repo_token: Some(TOKEN.to_string()),
        event_path: Some(event_path),
        ..ActionArgs::default()
    }
}

fn tracker() -> MockTracker {
    let slug = RepoSlug::new("octo", "widgets");
    MockTracker::new()
        .with_repository(slug.clone())
        .with_issue(
            slug.clone(),
            Issue {
                number: 42,
                title: "Rate limit the API".to_string(),
                state: "open".to_string(),
                labels: vec!["T: change".to_string()],
                html_url: None,
            },
        )
        .with_pull_request(
            slug,
            PullRequest {
                number: 43,
                title: "Rate limit the API".to_string(),
                body: Some("Closes #42".to_string()),
                labels: vec![
                    "T: change".to_string(),
                    "T: fix".to_string(),
                    "C: api".to_string(),
                ],
                html_url: Some("https://github.com/octo/widgets/pull/43".to_string()),
                head_ref: Some("issue/42-rate-limit".to_string()),
            },
        )
}

fn sessions(tracker: MockTracker) -> SessionManager<MockConnector, ScriptedInteraction> {
    SessionManager::without_store(
        MockConnector::new(tracker).accepting(TOKEN),
        ScriptedInteraction::new(),
    )
}

#[test]
fn test_pull_request_on_issue_branch() {
    let (dir, repo) = checkout("issue/42-rate-limit");
    let args = write_event(
        &dir,
        r#"{"action": "synchronize", "pull_request": {"number": 43, "html_url": "https://github.com/octo/widgets/pull/43"}}"#,
    );
    let tracker = tracker();
    let mut sessions = sessions(tracker.clone());

    let report = action::run(&args, &mut sessions, |_| Ok(&repo)).unwrap();

    assert_eq!(report.branch.issue_number, 42);
    assert_eq!(report.branch.slug.as_deref(), Some("rate-limit"));
    assert_eq!(report.pull_request.number, 43);
    assert_eq!(report.components.len(), 1);
    assert_eq!(report.components[0].name, "api");
    assert_eq!(report.bump, Some(VersionBump::Breaking));
    // 0.x: breaking changes bump the minor version
    assert_eq!(report.next_version, Some(Version::new(0, 1, 0)));

    assert_eq!(
        tracker.calls(),
        vec![
            TrackerCall::ValidateCredentials,
            TrackerCall::Repository("octo/widgets".to_string()),
            TrackerCall::Issue("octo/widgets".to_string(), 42),
            TrackerCall::PullRequest("octo/widgets".to_string(), 43),
        ]
    );
}

#[test]
fn test_push_event_is_unsupported() {
    let (dir, repo) = checkout("issue/42-rate-limit");
    let args = write_event(&dir, r#"{"ref": "refs/heads/issue/42-rate-limit", "commits": []}"#);
    let tracker = tracker();
    let mut sessions = sessions(tracker.clone());

    let err = action::run(&args, &mut sessions, |_| Ok(&repo)).unwrap_err();

    assert!(matches!(err, UnicornError::UnsupportedEvent(_)));
    assert!(
        !tracker
            .calls()
            .iter()
            .any(|call| matches!(call, TrackerCall::PullRequest(..))),
        "No pull request may be fetched for a non pull_request event"
    );
}

#[test]
fn test_unreadable_event_document() {
    let (dir, repo) = checkout("issue/42");
    let mut args = write_event(&dir, "{}");
    args.event_path = Some(dir.path().join("missing.json"));
    let mut sessions = sessions(tracker());

    let err = action::run(&args, &mut sessions, |_| Ok(&repo)).unwrap_err();
    assert!(matches!(err, UnicornError::Repository(_)));
}

#[test]
fn test_main_branch_is_not_an_issue_branch() {
    let (dir, repo) = checkout("main");
    let args = write_event(&dir, r#"{"pull_request": {"number": 43}}"#);
    let mut sessions = sessions(tracker());

    let err = action::run(&args, &mut sessions, |_| Ok(&repo)).unwrap_err();
    assert!(matches!(err, UnicornError::NotAnIssueBranch(_)));
    assert!(err.to_string().contains("main"));
}

#[test]
fn test_missing_token_names_the_parameter() {
    let (dir, repo) = checkout("issue/42");
    let mut args = write_event(&dir, r#"{"pull_request": {"number": 43}}"#);
    args.repo_token = None;
    let mut sessions = sessions(tracker());

    let err = action::run(&args, &mut sessions, |_| Ok(&repo)).unwrap_err();
    assert!(err.to_string().contains("repo-token"));
}

#[test]
fn test_missing_token_reported_outside_a_checkout() {
    let dir = TempDir::new().unwrap();
    let mut args = write_event(&dir, r#"{"pull_request": {"number": 43}}"#);
    args.repo_token = None;
    let tracker = tracker();
    let mut sessions = sessions(tracker.clone());

    let err = action::run(&args, &mut sessions, |prefix: &Path| Git2Repository::open(prefix))
        .unwrap_err();
    assert!(matches!(err, UnicornError::MissingParameter(ref p) if p == "repo-token"));
    assert!(tracker.calls().is_empty());

    args.repo_token = Some(TOKEN.to_string());
    let err = action::run(&args, &mut sessions, |prefix: &Path| Git2Repository::open(prefix))
        .unwrap_err();
    assert!(matches!(err, UnicornError::Repository(_)));
}
