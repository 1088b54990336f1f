use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::settings::ConfigError;
use crate::git::runner::CommandError;

/// Errors that can occur while resolving or checking out versions
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    /// The supplied version/ref matches no tag, branch, or commit.
    /// Carries the offending ref string.
    #[error("Unknown git revision: {0}")]
    UnknownRevision(String),

    /// A git invocation failed in a way that is not a recognized
    /// negative result.
    #[error("Git command failed: {0}")]
    Command(#[from] CommandError),

    /// Reserved for callers passing unsupported option sets.
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Failed to parse git output: {0}")]
    Parse(String),

    #[error("Git version {0} is too old. Minimum required: 2.13")]
    UnsupportedVersion(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Top-level application error that wraps all module-specific errors
///
/// This provides a unified error type for application-level code while
/// preserving the specific error context from each module. All module errors
/// automatically convert to AppError via the `From` trait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
