//! Core types for review-gate

use serde::{Deserialize, Serialize};

/// Resource path prefix GitHub uses for app (bot) accounts
pub const APP_RESOURCE_PREFIX: &str = "/apps/";

/// A GitHub identity (user, machine user or app)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    /// Login name (e.g. `octocat`, `renovate[bot]`)
    pub login: String,
    /// GitHub resource path (e.g. `/octocat`, `/apps/renovate`)
    pub resource_path: String,
}

impl User {
    /// Create a regular user whose resource path is `/{login}`
    pub fn new(login: impl Into<String>) -> Self {
        let login = login.into();
        let resource_path = format!("/{login}");
        Self {
            login,
            resource_path,
        }
    }

    /// Create an app account (`/apps/{slug}`, login `{slug}[bot]`)
    pub fn app(slug: &str) -> Self {
        Self {
            login: format!("{slug}[bot]"),
            resource_path: format!("{APP_RESOURCE_PREFIX}{slug}"),
        }
    }

    /// Placeholder GitHub shows for deleted accounts
    pub fn ghost() -> Self {
        Self::new("ghost")
    }

    /// Whether the login is non-empty, i.e. the identity is usable
    pub fn is_linked(&self) -> bool {
        !self.login.is_empty()
    }
}

/// A commit on the pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA
    pub oid: String,
    /// GitHub user linked to the committer, if any
    #[serde(default)]
    pub committer_user: Option<User>,
    /// GitHub user linked to the author, if any
    #[serde(default)]
    pub author_user: Option<User>,
}

impl Commit {
    /// Effective committer: the committer if linked, else the author if
    /// linked, else `None` (the commit isn't linked to any GitHub user)
    pub fn effective_committer(&self) -> Option<&User> {
        self.committer_user
            .as_ref()
            .filter(|u| u.is_linked())
            .or_else(|| self.author_user.as_ref().filter(|u| u.is_linked()))
    }
}

/// Review state as reported by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Review approves the changes
    Approved,
    /// Review requests changes
    ChangesRequested,
    /// Review only comments
    Commented,
    /// Review was dismissed
    Dismissed,
    /// Review not yet submitted
    Pending,
    /// Any state this tool does not know about
    #[serde(other)]
    Unknown,
}

/// A code review on the pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    /// Review state
    pub state: ReviewState,
    /// SHA of the commit the review was submitted against
    pub commit_oid: String,
    /// Review author
    pub author: User,
}

/// Everything the evaluation core needs to know about a pull request
///
/// `commits` and `reviews` must be complete: the fetch layer paginates
/// before building a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    /// SHA of the head commit
    pub head_sha: String,
    /// PR author (`None` when the account no longer exists)
    pub author: Option<User>,
    /// Commits in PR order
    #[serde(default)]
    pub commits: Vec<Commit>,
    /// Reviews in submission order
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Repository coordinates for the platform service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl std::fmt::Display for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.host {
            Some(host) => write!(f, "{host}/{}/{}", self.owner, self.repo),
            None => write!(f, "{}/{}", self.owner, self.repo),
        }
    }
}
