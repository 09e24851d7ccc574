//! Integration tests for the Hookmint CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn write_hook(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}

fn git(dir: &Path, args: &[&str]) {
    std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
}

fn init_repo_with_commit(dir: &Path, message: &str) {
    git(dir, &["init", "-b", "main"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test User"]);
    fs::write(dir.join("file.txt"), "hello").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", message]);
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ticket-driven workflow"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hookmint"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Dispatcher runs hooks in order and propagates the first failure
#[test]
fn test_run_short_circuits_on_failure() {
    let temp_dir = TempDir::new().unwrap();
    let hooks = temp_dir.path().join("pre-commit");
    fs::create_dir_all(&hooks).unwrap();

    write_hook(&hooks, "pre-commit-a.hook", "#!/bin/sh\necho from-a\nexit 0\n");
    write_hook(
        &hooks,
        "pre-commit-b.hook",
        "#!/bin/sh\necho boom >&2\nexit 1\n",
    );
    write_hook(&hooks, "pre-commit-c.hook", "#!/bin/sh\necho from-c\nexit 0\n");

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("run")
        .arg("pre-commit")
        .arg("--hooks-dir")
        .arg(&hooks)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("from-a"))
        .stdout(predicate::str::contains("from-c").not())
        .stderr(predicate::str::contains("boom"));
}

/// Disabled hooks are never executed
#[test]
fn test_run_skips_disabled_hooks() {
    let temp_dir = TempDir::new().unwrap();
    let hooks = temp_dir.path().join("pre-commit");
    fs::create_dir_all(&hooks).unwrap();

    write_hook(&hooks, "a.hook", "#!/bin/sh\necho enabled\nexit 0\n");
    write_hook(&hooks, "x.hook.disabled", "#!/bin/sh\necho disabled\nexit 1\n");

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("run")
        .arg("pre-commit")
        .arg("--hooks-dir")
        .arg(&hooks)
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled"))
        .stdout(predicate::str::contains("disabled").not());
}

/// Empty or missing hook directories succeed
#[test]
fn test_run_empty_directory_succeeds() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("run")
        .arg("pre-commit")
        .assert()
        .success();
}

/// Hook installation writes executable dispatchers into .git/hooks
#[test]
fn test_install_local() {
    let temp_dir = TempDir::new().unwrap();
    init_repo_with_commit(temp_dir.path(), "initial commit");
    fs::create_dir_all(temp_dir.path().join("pre-commit")).unwrap();
    fs::create_dir_all(temp_dir.path().join("commit-msg")).unwrap();

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed 2 hook(s)"));

    let hook = temp_dir.path().join(".git/hooks/pre-commit");
    assert!(hook.exists());
    let content = fs::read_to_string(&hook).unwrap();
    assert!(content.starts_with("#!/bin/sh"));
    assert!(content.contains("run pre-commit"));
    let mode = fs::metadata(&hook).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
}

/// Reinstall without --force leaves existing hooks untouched
#[test]
fn test_install_refuses_overwrite_without_force() {
    let temp_dir = TempDir::new().unwrap();
    init_repo_with_commit(temp_dir.path(), "initial commit");
    fs::create_dir_all(temp_dir.path().join("pre-commit")).unwrap();

    let hook = temp_dir.path().join(".git/hooks/pre-commit");
    fs::create_dir_all(hook.parent().unwrap()).unwrap();
    fs::write(&hook, "#!/bin/sh\n# hand-written\n").unwrap();

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert!(fs::read_to_string(&hook).unwrap().contains("hand-written"));

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("install")
        .arg("--force")
        .assert()
        .success();
    assert!(
        fs::read_to_string(&hook)
            .unwrap()
            .contains("Auto-generated by hookmint")
    );
}

/// Install outside a git repository fails with a one-line error
#[test]
fn test_install_requires_repository() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("pre-commit")).unwrap();

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a Git repository"));
}

/// Uninstall removes generated dispatchers but not hand-written hooks
#[test]
fn test_uninstall() {
    let temp_dir = TempDir::new().unwrap();
    init_repo_with_commit(temp_dir.path(), "initial commit");
    fs::create_dir_all(temp_dir.path().join("pre-commit")).unwrap();

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path()).arg("install").assert().success();

    let manual = temp_dir.path().join(".git/hooks/commit-msg");
    fs::write(&manual, "#!/bin/sh\nexit 0\n").unwrap();

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("uninstall")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 hook(s)"));

    assert!(!temp_dir.path().join(".git/hooks/pre-commit").exists());
    assert!(manual.exists());
}

/// Installed dispatcher end-to-end: git commit triggers the hook chain
#[test]
fn test_installed_dispatcher_runs_hooks() {
    let temp_dir = TempDir::new().unwrap();
    init_repo_with_commit(temp_dir.path(), "initial commit");

    let hooks = temp_dir.path().join("pre-commit");
    fs::create_dir_all(&hooks).unwrap();
    write_hook(&hooks, "block.hook", "#!/bin/sh\necho blocked by hook >&2\nexit 1\n");

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path()).arg("install").assert().success();

    // The commit must be rejected by the failing hook
    fs::write(temp_dir.path().join("file.txt"), "changed").unwrap();
    git(temp_dir.path(), &["add", "."]);
    let output = std::process::Command::new("git")
        .args(["commit", "-m", "feat: TEST-1 change"])
        .current_dir(temp_dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("blocked by hook"), "stderr: {}", stderr);
}

/// Commitmint normalizes the latest commit message non-interactively
#[test]
fn test_commitmint_normalizes_message() {
    let temp_dir = TempDir::new().unwrap();
    init_repo_with_commit(temp_dir.path(), "feat(core): core: implement feature");

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOOKMINT_SKIP_INSTALL", "1")
        .arg("commitmint")
        .arg("myrepo")
        .arg("ISSUE-1234")
        .arg("--yes")
        .assert()
        .success();

    let output = std::process::Command::new("git")
        .args(["log", "-1", "--pretty=%B"])
        .current_dir(temp_dir.path())
        .output()
        .unwrap();
    let message = String::from_utf8_lossy(&output.stdout);
    assert_eq!(message.trim(), "feat(core): ISSUE-1234 implement feature");
}

/// Commitmint appends the Smart Commit footer for breaking changes
#[test]
fn test_commitmint_breaking_change_footer() {
    let temp_dir = TempDir::new().unwrap();
    init_repo_with_commit(temp_dir.path(), "feat(api)!: change request format");

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOOKMINT_SKIP_INSTALL", "1")
        .arg("commitmint")
        .arg("myrepo")
        .arg("JT-1234")
        .arg("--yes")
        .assert()
        .success();

    let output = std::process::Command::new("git")
        .args(["log", "-1", "--pretty=%B"])
        .current_dir(temp_dir.path())
        .output()
        .unwrap();
    let message = String::from_utf8_lossy(&output.stdout);
    assert!(message.contains("feat(api)!: JT-1234 change request format"));
    assert!(
        message.contains("JT-1234 #comment Breaking change; review impacts #resolve"),
        "message: {}",
        message
    );
}

/// Commitmint is a no-op when the message is already in shape
#[test]
fn test_commitmint_idempotent_on_clean_message() {
    let temp_dir = TempDir::new().unwrap();
    init_repo_with_commit(temp_dir.path(), "fix(api): ISSUE-0000 correct timeout logic");

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOOKMINT_SKIP_INSTALL", "1")
        .arg("commitmint")
        .arg("myrepo")
        .arg("ISSUE-0000")
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to amend"));
}

/// Workflow commands fail fast on unknown aliases when non-interactive
#[test]
fn test_unknown_alias_fails() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("hookmint").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .arg("status")
        .arg("definitely-not-configured")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}
