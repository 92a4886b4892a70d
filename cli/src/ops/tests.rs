//! End-to-end workflow tests against real git repositories.
//!
//! Fixtures build a bare "remote" plus working clones in a temp
//! directory, so every network-shaped operation runs against local paths.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::config::settings::GitSettings;
use crate::ops::{commit_changes, pull_current_branch};
use crate::repository::context::RepositoryContext;
use crate::repository::{RepositoryError, RepositoryManager};

fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("git must be runnable in tests");
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn write_file(base: &Path, rel: &str, content: &str) {
    let path = base.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn configure_user(repo: &Path) {
    git(repo, &["config", "user.name", "Test User"]);
    git(repo, &["config", "user.email", "test@example.com"]);
}

/// Bare origin seeded with one commit on `main`, plus a working clone.
/// Returns `(origin, clone)` paths inside the temp dir.
fn origin_and_clone(root: &TempDir) -> (PathBuf, PathBuf) {
    let origin = root.path().join("origin.git");
    fs::create_dir_all(&origin).unwrap();
    git(&origin, &["init", "--bare"]);
    git(&origin, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    let seed = root.path().join("seed");
    git(root.path(), &["clone", origin.to_str().unwrap(), "seed"]);
    configure_user(&seed);
    git(&seed, &["checkout", "-b", "main"]);
    write_file(&seed, "a.txt", "line one\n");
    git(&seed, &["add", "a.txt"]);
    git(&seed, &["commit", "-m", "initial commit"]);
    git(&seed, &["push", "-u", "origin", "main"]);

    let clone = root.path().join("clone");
    git(root.path(), &["clone", origin.to_str().unwrap(), "clone"]);
    configure_user(&clone);

    (origin, clone)
}

/// Adds a commit to origin through a second clone, so `clone` falls
/// behind.
fn advance_origin(root: &TempDir, rel: &str, content: &str, message: &str) {
    let seed = root.path().join("seed");
    git(&seed, &["pull", "--rebase", "origin", "main"]);
    write_file(&seed, rel, content);
    git(&seed, &["add", "."]);
    git(&seed, &["commit", "-m", message]);
    git(&seed, &["push", "origin", "main"]);
}

fn settings() -> GitSettings {
    GitSettings::default()
}

#[tokio::test]
async fn context_factory_rejects_non_repositories() {
    let root = TempDir::new().unwrap();

    let err = RepositoryContext::open(root.path(), "origin")
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotAGitRepository(_)));

    let manager = RepositoryManager::new("origin");
    assert!(manager.open(root.path()).await.is_err());
    assert!(manager.get_active().is_none());
    assert!(manager.list().is_empty());
}

#[tokio::test]
async fn open_normalizes_subdirectories_to_one_context() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);
    let sub = clone.join("src/deep");
    fs::create_dir_all(&sub).unwrap();

    let manager = RepositoryManager::new("origin");
    let from_root = manager.open(&clone).await.unwrap();
    let from_sub = manager.open(&sub).await.unwrap();

    assert_eq!(from_root.id(), from_sub.id());
    assert_eq!(manager.list().len(), 1);
    assert_eq!(from_root.metadata().default_branch, "main");
}

#[tokio::test]
async fn pull_reports_up_to_date_without_touching_the_tree() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let result = pull_current_branch(&manager, &settings()).await;

    assert!(result.success, "{}", result.message);
    assert!(result.up_to_date);
    assert!(!result.stashed_changes);
}

#[tokio::test]
async fn pull_restores_non_conflicting_local_edits() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    advance_origin(&root, "b.txt", "from remote\n", "add b");
    // Uncommitted local edits that don't overlap the incoming change.
    write_file(&clone, "c.txt", "local work in progress\n");

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let result = pull_current_branch(&manager, &settings()).await;

    assert!(result.success, "{}", result.message);
    assert!(result.stashed_changes);
    assert!(!result.had_conflicts);
    assert_eq!(result.commits_pulled, 1);

    // Pulled commit and local edits coexist; nothing left stashed.
    assert!(clone.join("b.txt").exists());
    assert_eq!(
        fs::read_to_string(clone.join("c.txt")).unwrap(),
        "local work in progress\n"
    );
    assert!(git(&clone, &["stash", "list"]).trim().is_empty());
}

#[tokio::test]
async fn pull_surfaces_stash_restore_conflicts_without_losing_data() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    advance_origin(&root, "a.txt", "remote version\n", "remote edit");
    // Uncommitted local edit to the same line of the same file.
    write_file(&clone, "a.txt", "local version\n");

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let result = pull_current_branch(&manager, &settings()).await;

    assert!(result.success, "{}", result.message);
    assert!(result.had_conflicts);

    // The pulled commit is present and the collision shows up as conflict
    // markers in the working tree, not as lost data.
    let log = git(&clone, &["log", "--oneline"]);
    assert!(log.contains("remote edit"));
    let contents = fs::read_to_string(clone.join("a.txt")).unwrap();
    assert!(
        contents.contains("<<<<<<<") || contents.contains("local version"),
        "local edit must survive: {contents}"
    );
    // The entry was consumed; the conflicted tree is the only copy.
    assert!(git(&clone, &["stash", "list"]).trim().is_empty());
}

#[tokio::test]
async fn pull_reports_rebase_conflicts_from_local_commits() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    advance_origin(&root, "a.txt", "remote version\n", "remote edit");
    // Committed local change to the same line: the rebase itself conflicts.
    write_file(&clone, "a.txt", "local version\n");
    git(&clone, &["add", "a.txt"]);
    git(&clone, &["commit", "-m", "local edit"]);

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let result = pull_current_branch(&manager, &settings()).await;

    assert!(!result.success);
    assert!(result.had_conflicts);
    // The rebase was aborted; the local commit is still in place.
    let log = git(&clone, &["log", "--oneline"]);
    assert!(log.contains("local edit"));
}

#[tokio::test]
async fn pull_on_detached_head_fails_cleanly() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    let sha = git(&clone, &["rev-parse", "HEAD"]);
    git(&clone, &["checkout", "--detach", sha.trim()]);

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let result = pull_current_branch(&manager, &settings()).await;

    assert!(!result.success);
    assert!(result.message.contains("detached"));
}

#[tokio::test]
async fn pull_of_branch_without_remote_is_benign() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    git(&clone, &["checkout", "-b", "feature/new-thing"]);

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let result = pull_current_branch(&manager, &settings()).await;

    assert!(result.success, "{}", result.message);
    assert!(result.message.contains("created on push"));
}

#[tokio::test]
async fn commit_gate_blocks_until_forced() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    advance_origin(&root, "b.txt", "from remote\n", "add b");

    write_file(&clone, "staged.txt", "staged content\n");
    git(&clone, &["add", "staged.txt"]);
    let head_before = git(&clone, &["rev-parse", "HEAD"]);

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let gated = commit_changes(&manager, &settings(), "add staged file", None, false).await;
    assert!(!gated.success);
    assert!(gated.behind_remote);
    assert_eq!(gated.behind_count, 1);
    // No commit was created.
    assert_eq!(git(&clone, &["rev-parse", "HEAD"]), head_before);

    let forced = commit_changes(&manager, &settings(), "add staged file", None, true).await;
    assert!(forced.success, "{}", forced.message);
    assert_ne!(git(&clone, &["rev-parse", "HEAD"]), head_before);
    assert_eq!(forced.commit_sha.as_deref(), Some(git(&clone, &["rev-parse", "HEAD"]).trim()));
}

#[tokio::test]
async fn commit_with_description_creates_body_paragraph() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    write_file(&clone, "staged.txt", "staged content\n");
    git(&clone, &["add", "staged.txt"]);

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let result = commit_changes(
        &manager,
        &settings(),
        "add staged file",
        Some("explains the why at length"),
        false,
    )
    .await;
    assert!(result.success, "{}", result.message);

    let body = git(&clone, &["log", "-1", "--format=%B"]);
    assert!(body.starts_with("add staged file"));
    assert!(body.contains("explains the why at length"));
}

#[tokio::test]
async fn commit_with_nothing_staged_reports_raw_failure() {
    let root = TempDir::new().unwrap();
    let (_origin, clone) = origin_and_clone(&root);

    let manager = RepositoryManager::new("origin");
    manager.open(&clone).await.unwrap();

    let result = commit_changes(&manager, &settings(), "empty", None, false).await;

    assert!(!result.success);
    assert!(!result.behind_remote);
    assert!(result.commit_sha.is_none());
}
