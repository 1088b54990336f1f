use crate::error::{GitError, GitResult};
use crate::git::runner::{CommandRunner, RunOptions};
use std::fmt;

/// Oldest git whose `submodule foreach` exposes stable variable names
pub const MIN_GIT_VERSION: (u32, u32) = (2, 13);

/// Version of the installed git binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    /// Parse the output of `git --version`
    ///
    /// Accepts vendor-suffixed forms like `git version 2.39.2.windows.1`
    /// and `git version 2.39.2 (Apple Git-143)`.
    pub fn parse(output: &str) -> GitResult<Self> {
        let rest = output
            .trim()
            .strip_prefix("git version ")
            .ok_or_else(|| GitError::Parse(format!("unrecognized version output: {}", output.trim())))?;

        let numbers = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| GitError::Parse("empty version output".to_string()))?;

        let mut parts = numbers.split('.');
        let major = parse_component(parts.next(), numbers)?;
        let minor = parse_component(parts.next(), numbers)?;
        // Some builds omit or mangle the patch component.
        let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

        Ok(Self { major, minor, patch })
    }

    /// Detect the installed git version through the runner
    pub async fn detect(runner: &dyn CommandRunner) -> GitResult<Self> {
        let output = runner.run(&["--version"], RunOptions::silent()).await?;
        Self::parse(&output)
    }

    /// Whether this version satisfies the minimum requirement
    pub fn is_supported(&self) -> bool {
        (self.major, self.minor) >= MIN_GIT_VERSION
    }

    /// Detect the installed version and reject unsupported ones
    pub async fn validate(runner: &dyn CommandRunner) -> GitResult<Self> {
        let version = Self::detect(runner).await?;
        if !version.is_supported() {
            return Err(GitError::UnsupportedVersion(version.to_string()));
        }
        Ok(version)
    }
}

fn parse_component(part: Option<&str>, source: &str) -> GitResult<u32> {
    part.and_then(|p| p.parse().ok())
        .ok_or_else(|| GitError::Parse(format!("malformed version number: {}", source)))
}

impl fmt::Display for GitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
