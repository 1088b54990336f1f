// Each test binary compiles its own copy of the helpers; not every binary
// uses every helper.
#[allow(dead_code)]
mod helpers;

use gitpin::git::{GitRunner, Resolver};
use helpers::{clone_repo, create_commit, create_tag, create_test_repo, git};
use std::path::Path;

fn resolver_at(path: &Path) -> Resolver {
    Resolver::new(Box::new(GitRunner::new(path)))
}

#[tokio::test]
async fn test_checkout_tag_detaches_head() {
    let (_origin_temp, origin_path) = create_test_repo();
    create_commit(&origin_path, "file.txt", "content", "Initial commit");
    create_tag(&origin_path, "v1.0.0");
    create_commit(&origin_path, "file.txt", "newer", "Second commit");

    let (_clone_temp, clone_path) = clone_repo(&origin_path);
    let resolver = resolver_at(&clone_path);

    resolver.checkout_ref("v1.0.0").await.unwrap();

    let symbolic = git(&clone_path, &["rev-parse", "--abbrev-ref", "HEAD"]);
    assert_eq!(symbolic.trim(), "HEAD");

    let head = git(&clone_path, &["rev-parse", "HEAD"]);
    let tagged = git(&clone_path, &["rev-parse", "v1.0.0"]);
    assert_eq!(head, tagged);
}

#[tokio::test]
async fn test_checkout_remote_only_branch_creates_tracking() {
    let (_origin_temp, origin_path) = create_test_repo();
    create_commit(&origin_path, "file.txt", "content", "Initial commit");
    git(&origin_path, &["branch", "feature"]);

    // Clones only materialize the HEAD branch locally
    let (_clone_temp, clone_path) = clone_repo(&origin_path);
    let resolver = resolver_at(&clone_path);
    assert!(!resolver.is_local_branch("feature").await.unwrap());
    assert!(resolver.is_remote_branch("feature").await.unwrap());

    resolver.checkout_ref("feature").await.unwrap();

    let symbolic = git(&clone_path, &["rev-parse", "--abbrev-ref", "HEAD"]);
    assert_eq!(symbolic.trim(), "feature");

    let head = git(&clone_path, &["rev-parse", "HEAD"]);
    let remote = git(&clone_path, &["rev-parse", "origin/feature"]);
    assert_eq!(head, remote);
}

#[tokio::test]
async fn test_checkout_existing_branch_discards_stale_commits() {
    let (_origin_temp, origin_path) = create_test_repo();
    create_commit(&origin_path, "file.txt", "content", "Initial commit");

    let (_clone_temp, clone_path) = clone_repo(&origin_path);

    // Local main diverges from origin/main
    create_commit(&clone_path, "file.txt", "local only", "Stale local commit");
    let stale = git(&clone_path, &["rev-parse", "HEAD"]);

    let resolver = resolver_at(&clone_path);
    resolver.checkout_ref("main").await.unwrap();

    let head = git(&clone_path, &["rev-parse", "HEAD"]);
    let remote = git(&clone_path, &["rev-parse", "origin/main"]);
    assert_eq!(head, remote);
    assert_ne!(head, stale);
}

#[tokio::test]
async fn test_checkout_hash_detaches_at_commit() {
    let (_origin_temp, origin_path) = create_test_repo();
    create_commit(&origin_path, "file.txt", "content", "Initial commit");

    let (_clone_temp, clone_path) = clone_repo(&origin_path);
    let resolver = resolver_at(&clone_path);

    let head = resolver.current_head().await.unwrap();
    resolver.checkout_ref(&head[..12]).await.unwrap();

    let symbolic = git(&clone_path, &["rev-parse", "--abbrev-ref", "HEAD"]);
    assert_eq!(symbolic.trim(), "HEAD");

    let resolved = git(&clone_path, &["rev-parse", "HEAD"]);
    assert_eq!(resolved.trim(), head);
}

#[tokio::test]
async fn test_checkout_branch_restores_file_content() {
    let (_origin_temp, origin_path) = create_test_repo();
    create_commit(&origin_path, "file.txt", "original", "Initial commit");

    let (_clone_temp, clone_path) = clone_repo(&origin_path);
    create_commit(&clone_path, "file.txt", "diverged", "Stale local commit");

    let resolver = resolver_at(&clone_path);
    resolver.checkout_branch("main").await.unwrap();

    let content = std::fs::read_to_string(clone_path.join("file.txt")).unwrap();
    assert_eq!(content, "original");
}
