//! Error types for review-gate

use thiserror::Error;

/// Errors raised outside the evaluation core
///
/// The core itself never fails: an unsatisfied policy is reported through
/// [`crate::evaluate::Decision::valid`], not through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// Config file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// Policy settings are malformed (bad regex, invalid app name, ...)
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// No usable GitHub credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// GitHub API returned an error or an unexpected payload
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform failure (used by alternative platform services)
    #[error("{0}")]
    Platform(String),

    /// Repository or pull request does not exist or is not visible
    #[error("pull request not found: {0}")]
    PullRequestNotFound(String),

    /// Snapshot file could not be read or parsed
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Repository argument could not be parsed
    #[error("invalid repository: {0}")]
    InvalidRepo(String),

    /// Transport-level failure from octocrab
    #[error("GitHub request failed: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Filesystem or process I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
