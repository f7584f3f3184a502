//! Platform services for fetching pull request data
//!
//! The evaluation core never talks to GitHub; a [`PlatformService`] builds a
//! complete [`PullRequestSnapshot`] (all pages fetched) and hands it over.

mod detection;
mod factory;
pub(crate) mod github;

pub use detection::parse_repo_info;
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PlatformConfig, PullRequestSnapshot};
use async_trait::async_trait;

/// Source of pull request snapshots
///
/// Implemented by [`GitHubService`]; tests substitute a mock.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Fetch head SHA, author, and the complete commit and review lists
    async fn get_pull_request_snapshot(&self, pr_number: u64) -> Result<PullRequestSnapshot>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
