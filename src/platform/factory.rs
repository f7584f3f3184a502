//! Platform service construction

use crate::auth::get_github_auth;
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::PlatformConfig;
use tracing::debug;

/// Authenticate and create the service for `config`
pub async fn create_platform_service(config: &PlatformConfig) -> Result<Box<dyn PlatformService>> {
    let auth = get_github_auth(config.host.as_deref()).await?;
    debug!(source = ?auth.source, repo = %config, "creating GitHub service");
    let service = GitHubService::new(
        &auth.token,
        config.owner.clone(),
        config.repo.clone(),
        config.host.clone(),
    )?;
    Ok(Box::new(service))
}
