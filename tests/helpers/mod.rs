use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run a git command in a repository, panicking on failure
pub fn git(repo_path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git");

    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to create a test git repository with a deterministic branch name
pub fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init", "-b", "main"]);
    git(&repo_path, &["config", "user.name", "Test User"]);
    git(&repo_path, &["config", "user.email", "test@example.com"]);

    (temp_dir, repo_path)
}

/// Helper to create a commit
pub fn create_commit(repo_path: &Path, file: &str, content: &str, message: &str) {
    fs::write(repo_path.join(file), content).expect("Failed to write file");
    git(repo_path, &["add", file]);
    git(repo_path, &["commit", "-m", message]);
}

/// Helper to create a lightweight tag at HEAD
pub fn create_tag(repo_path: &Path, name: &str) {
    git(repo_path, &["tag", name]);
}

/// Clone `source` into a fresh temp directory
///
/// The clone tracks `source` as `origin`, so fetches and remote-branch
/// lookups work without any network access.
pub fn clone_repo(source: &Path) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let clone_path = temp_dir.path().join("clone");

    let output = Command::new("git")
        .args([
            "clone",
            source.to_str().unwrap(),
            clone_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run git clone");

    assert!(
        output.status.success(),
        "git clone failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    git(&clone_path, &["config", "user.name", "Test User"]);
    git(&clone_path, &["config", "user.email", "test@example.com"]);

    (temp_dir, clone_path)
}

/// Add `source` as a submodule named `name` and commit the addition
pub fn add_submodule(repo_path: &Path, source: &Path, name: &str) {
    git(
        repo_path,
        &[
            "-c",
            "protocol.file.allow=always",
            "submodule",
            "add",
            source.to_str().unwrap(),
            name,
        ],
    );
    git(repo_path, &["commit", "-m", "Add submodule"]);
}
