use crate::audit::CommandLog;
use crate::error::{GitError, GitResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time;

/// Default per-invocation timeout for git commands
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for a single git invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Suppress echoing the command line (and captured stderr on failure)
    /// to the console. History logging is unaffected.
    pub silent: bool,
}

impl RunOptions {
    /// Options for a query that should not be echoed
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Classification of a failed git invocation, computed once when the
/// process exits. Call sites branch on this instead of re-inspecting
/// message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Exit status 1 with no recognized diagnostic: the queried ref
    /// simply does not exist.
    RefMissing,
    /// Git rejected the argument as an unknown revision or bad object.
    BadRevision,
    /// `git describe` found no tag for the commit.
    NoTag,
    /// Any other failure. Callers must propagate these.
    Fatal,
}

impl FailureKind {
    /// Classify a non-zero git exit from its code and captured stderr.
    ///
    /// The exit-code check runs before pattern matching so a ref name that
    /// happens to contain pattern text cannot be misclassified.
    fn classify(exit_code: i32, stderr: &str) -> Self {
        if exit_code == 1 {
            return FailureKind::RefMissing;
        }

        let diagnostic = stderr.to_ascii_lowercase();
        if diagnostic.contains("unknown revision") || diagnostic.contains("bad object") {
            return FailureKind::BadRevision;
        }
        // Git reports a tagless commit inconsistently across versions:
        // "no tag exactly matches", "cannot describe", or
        // "No names found, cannot describe anything."
        if diagnostic.contains("cannot describe")
            || diagnostic.contains("no tag")
            || diagnostic.contains("no names found")
        {
            return FailureKind::NoTag;
        }

        FailureKind::Fatal
    }
}

/// A failed git invocation: the rendered command, its exit code, captured
/// stderr, and the failure classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CommandError {
    command: String,
    exit_code: i32,
    stderr: String,
    message: String,
    kind: FailureKind,
}

impl CommandError {
    /// Build an error for a failed invocation, classifying it in the process
    pub fn new(command: impl Into<String>, exit_code: i32, stderr: impl Into<String>) -> Self {
        let command = command.into();
        let stderr = stderr.into();
        let kind = FailureKind::classify(exit_code, &stderr);
        let message = if stderr.trim().is_empty() {
            format!("`git {}` exited with code {}", command, exit_code)
        } else {
            format!(
                "`git {}` exited with code {}: {}",
                command,
                exit_code,
                stderr.trim()
            )
        };

        Self {
            command,
            exit_code,
            stderr,
            message,
            kind,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Captured standard error, or a spawn/timeout diagnostic when the
    /// process never produced one
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// The argument list as passed to git, space-joined
    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Executes git commands against a repository
///
/// Implementations must return captured stdout on a zero exit and a
/// classified [`CommandError`] otherwise.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[&str], opts: RunOptions) -> Result<String, CommandError>;
}

/// Production [`CommandRunner`] backed by `tokio::process`
#[derive(Debug)]
pub struct GitRunner {
    repo_path: PathBuf,
    timeout: Duration,
    log: Option<CommandLog>,
    quiet: bool,
}

impl GitRunner {
    /// Create a runner for a known repository path
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            timeout: DEFAULT_TIMEOUT,
            log: None,
            quiet: false,
        }
    }

    /// Replace the per-invocation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach a command history log; every invocation is recorded with its
    /// exit code
    pub fn with_log(mut self, log: CommandLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Suppress command echo even for invocations that are not marked
    /// silent
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Detect a git repository from the current working directory
    pub fn discover() -> GitResult<Self> {
        let current_dir = std::env::current_dir().map_err(GitError::Io)?;
        Self::discover_from(&current_dir)
    }

    /// Detect a git repository starting from a specific directory, walking
    /// up until a `.git` entry is found
    pub fn discover_from<P: AsRef<Path>>(start_path: P) -> GitResult<Self> {
        let mut current = start_path.as_ref().to_path_buf();

        loop {
            if current.join(".git").exists() {
                return Ok(Self::new(current));
            }

            if !current.pop() {
                return Err(GitError::NotARepository);
            }
        }
    }

    /// Get the repository path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}

#[async_trait]
impl CommandRunner for GitRunner {
    async fn run(&self, args: &[&str], opts: RunOptions) -> Result<String, CommandError> {
        let rendered = args.join(" ");
        if args.is_empty() {
            return Err(CommandError::new(rendered, -1, "empty argument list"));
        }

        if !opts.silent && !self.quiet {
            eprintln!("$ git {}", rendered);
        }

        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.repo_path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(CommandError::new(
                    rendered,
                    -1,
                    format!("Failed to execute git: {}", e),
                ));
            }
            Err(_) => {
                return Err(CommandError::new(
                    rendered,
                    -1,
                    format!("timed out after {}s", self.timeout.as_secs()),
                ));
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        if let Some(log) = &self.log {
            // History logging must not fail the command itself.
            let _ = log.record(&rendered, &self.repo_path, exit_code);
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(stdout)
        } else {
            if !opts.silent && !self.quiet && !stderr.trim().is_empty() {
                eprintln!("{}", stderr.trim_end());
            }
            Err(CommandError::new(rendered, exit_code, stderr))
        }
    }
}
