use crate::error::{GitError, GitResult};
use crate::git::parser::{self, ChangeEntry};
use crate::git::runner::{CommandRunner, FailureKind, RunOptions};
use serde::Serialize;
use std::fmt;

/// Default tracking remote
const DEFAULT_REMOTE: &str = "origin";

/// Shell fragment run inside each submodule by `git submodule foreach`
const SUBMODULE_STATUS: &str = "echo \"---- $sm_path\" && git status --porcelain";

/// What a ref string names, determined by querying the repository
///
/// Tags take precedence over branches, branches over hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Tag,
    Branch,
    Hash,
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefType::Tag => write!(f, "tag"),
            RefType::Branch => write!(f, "branch"),
            RefType::Hash => write!(f, "hash"),
        }
    }
}

/// A resolved version argument: the concrete ref and what it names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionResolution {
    pub version: String,
    pub ref_type: RefType,
}

/// Options for tag enumeration
#[derive(Debug, Clone, Copy)]
pub struct TagOptions {
    /// Fetch tags from the remote before listing. Skip when the caller has
    /// already fetched.
    pub fetch: bool,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self { fetch: true }
    }
}

/// Resolves version strings against a repository and drives checkout
///
/// Every operation queries live repository state through the injected
/// [`CommandRunner`]; nothing is cached between calls.
pub struct Resolver {
    runner: Box<dyn CommandRunner>,
    remote: String,
}

impl Resolver {
    /// Create a resolver tracking the `origin` remote
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self::with_remote(runner, DEFAULT_REMOTE)
    }

    /// Create a resolver tracking a specific remote
    pub fn with_remote(runner: Box<dyn CommandRunner>, remote: impl Into<String>) -> Self {
        Self {
            runner,
            remote: remote.into(),
        }
    }

    /// Get the command runner backing this resolver
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Get the tracking remote used for remote-branch checks and resets
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Whether `name` is an existing local branch
    pub async fn is_local_branch(&self, name: &str) -> GitResult<bool> {
        self.verify_ref(&format!("refs/heads/{}", name)).await
    }

    /// Whether `name` is an existing remote-tracking branch
    pub async fn is_remote_branch(&self, name: &str) -> GitResult<bool> {
        self.verify_ref(&format!("refs/remotes/{}/{}", self.remote, name))
            .await
    }

    /// Whether `name` is an existing tag
    pub async fn is_tag(&self, name: &str) -> GitResult<bool> {
        self.verify_ref(&format!("refs/tags/{}", name)).await
    }

    /// Whether `name` is a local or remote-tracking branch
    pub async fn is_branch(&self, name: &str) -> GitResult<bool> {
        let (local, remote) =
            tokio::try_join!(self.is_local_branch(name), self.is_remote_branch(name))?;
        Ok(local || remote)
    }

    async fn verify_ref(&self, path: &str) -> GitResult<bool> {
        match self
            .runner
            .run(&["show-ref", "--verify", "--quiet", path], RunOptions::silent())
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == FailureKind::RefMissing => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether `hash` looks like a commit hash and resolves to an object
    ///
    /// Strings outside 1-40 hex digits return false without invoking git.
    pub async fn is_commit_hash(&self, hash: &str) -> GitResult<bool> {
        if !is_hex_hash(hash) {
            return Ok(false);
        }

        match self.runner.run(&["rev-parse", hash], RunOptions::silent()).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == FailureKind::BadRevision => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Classify `name` as a tag, branch, or commit hash
    ///
    /// The three existence checks run concurrently; precedence is
    /// tag > branch > hash.
    pub async fn ref_type(&self, name: &str) -> GitResult<RefType> {
        let (tag, branch, hash) = tokio::try_join!(
            self.is_tag(name),
            self.is_branch(name),
            self.is_commit_hash(name)
        )?;

        if tag {
            Ok(RefType::Tag)
        } else if branch {
            Ok(RefType::Branch)
        } else if hash {
            Ok(RefType::Hash)
        } else {
            Err(GitError::UnknownRevision(name.to_string()))
        }
    }

    /// Fill in an unspecified version
    ///
    /// Defaults to the highest local semver tag, or the primary branch when
    /// no valid tag exists. A specified version passes through unchanged.
    pub async fn ensure_version(&self, version: Option<&str>) -> GitResult<String> {
        if let Some(version) = version.filter(|v| !v.is_empty()) {
            return Ok(version.to_string());
        }

        match self.latest_local_tag(TagOptions::default()).await? {
            Some(tag) => Ok(tag),
            None => self.primary_branch().await,
        }
    }

    /// Resolve and classify a version argument
    pub async fn validate_version(&self, version: Option<&str>) -> GitResult<VersionResolution> {
        let version = self.ensure_version(version).await?;
        let ref_type = self.ref_type(&version).await?;

        Ok(VersionResolution { version, ref_type })
    }

    /// The highest local semver tag, fetching from the remote first unless
    /// skipped
    pub async fn latest_local_tag(&self, opts: TagOptions) -> GitResult<Option<String>> {
        if opts.fetch {
            self.runner
                .run(&["fetch", &self.remote, "--tags"], RunOptions::default())
                .await?;
        }

        Ok(self.local_tags().await?.into_iter().next())
    }

    /// All local semver tags, highest first; empty when none parse
    pub async fn local_tags(&self) -> GitResult<Vec<String>> {
        let output = self.runner.run(&["tag", "--list"], RunOptions::silent()).await?;
        parser::parse_tag_list(&output)
    }

    /// Short name of the primary branch
    ///
    /// Resolves `<remote>/HEAD`, falling back to local `HEAD` when no
    /// remote-tracking HEAD exists (e.g. no remote configured).
    pub async fn primary_branch(&self) -> GitResult<String> {
        let remote_head = format!("{}/HEAD", self.remote);
        let full = match self
            .runner
            .run(
                &["rev-parse", "--symbolic-full-name", &remote_head],
                RunOptions::silent(),
            )
            .await
        {
            Ok(output) => output,
            Err(e) if e.kind() == FailureKind::BadRevision => {
                self.runner
                    .run(&["rev-parse", "--symbolic-full-name", "HEAD"], RunOptions::silent())
                    .await?
            }
            Err(e) => return Err(e.into()),
        };

        let full = full.trim();
        Ok(full.rsplit('/').next().unwrap_or(full).to_string())
    }

    /// Full hash of the current HEAD commit
    pub async fn current_head(&self) -> GitResult<String> {
        let output = self.runner.run(&["rev-parse", "HEAD"], RunOptions::silent()).await?;
        Ok(output.trim().to_string())
    }

    /// The tag pointing exactly at HEAD, if any
    pub async fn current_tag(&self) -> GitResult<Option<String>> {
        match self
            .runner
            .run(&["describe", "--exact-match", "--tags"], RunOptions::silent())
            .await
        {
            Ok(output) => {
                let tag = output.trim();
                if tag.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(tag.to_string()))
                }
            }
            Err(e) if e.kind() == FailureKind::NoTag => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Best hash for a named ref
    ///
    /// Prefers a remote-tracking ref with the matching short name, then a
    /// local one, then direct revision lookup for hashes and revision
    /// expressions that show-ref cannot see.
    pub async fn hash_for_ref(&self, name: &str) -> GitResult<String> {
        let output = match self.runner.run(&["show-ref", name], RunOptions::silent()).await {
            Ok(output) => output,
            // No matching refs at all is an empty listing, not an error.
            Err(e) if e.kind() == FailureKind::RefMissing => String::new(),
            Err(e) => return Err(e.into()),
        };

        let entries = parser::parse_show_ref(&output)?;
        if let Some(entry) = entries.iter().find(|e| e.remote.is_some() && e.name == name) {
            return Ok(entry.hash.clone());
        }
        if let Some(entry) = entries.iter().find(|e| e.remote.is_none() && e.name == name) {
            return Ok(entry.hash.clone());
        }

        match self.runner.run(&["rev-parse", name], RunOptions::silent()).await {
            Ok(output) => Ok(output.trim().to_string()),
            Err(e) if e.kind() == FailureKind::Fatal => Err(e.into()),
            Err(_) => Err(GitError::UnknownRevision(name.to_string())),
        }
    }

    /// List changed paths for the top-level tree and every submodule
    ///
    /// The two status queries run concurrently. Untracked content inside
    /// submodules is reported by the per-submodule pass, not the top-level
    /// one.
    pub async fn list_changes(&self) -> GitResult<Vec<ChangeEntry>> {
        let (status, submodules) = tokio::try_join!(
            self.runner.run(
                &["status", "--porcelain", "--ignore-submodules=untracked"],
                RunOptions::silent(),
            ),
            self.runner.run(
                &["submodule", "foreach", "--quiet", SUBMODULE_STATUS],
                RunOptions::silent(),
            )
        )?;

        // Synthetic sentinel so top-level lines are attributed to the
        // empty path.
        let combined = format!("----\n{}\n{}", status, submodules);
        parser::parse_changes(&combined)
    }
}

fn is_hex_hash(hash: &str) -> bool {
    !hash.is_empty() && hash.len() <= 40 && hash.chars().all(|c| c.is_ascii_hexdigit())
}
