//! Repository argument parsing

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use url::Url;

/// Parse `owner/repo`, an HTTPS URL or an SSH remote into a [`PlatformConfig`]
///
/// `github.com` yields `host: None`; any other host is kept as a GitHub
/// Enterprise host.
pub fn parse_repo_info(input: &str) -> Result<PlatformConfig> {
    let trimmed = input.trim().trim_end_matches('/');
    let invalid = || Error::InvalidRepo(input.to_string());

    let (host, path) = if let Some(rest) = trimmed.strip_prefix("git@") {
        let (host, path) = rest.split_once(':').ok_or_else(invalid)?;
        (Some(host.to_string()), path.to_string())
    } else if trimmed.contains("://") {
        let url = Url::parse(trimmed).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?.to_string();
        (Some(host), url.path().to_string())
    } else {
        (None, trimmed.to_string())
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let &[owner, repo] = segments.as_slice() else {
        return Err(invalid());
    };
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(invalid());
    }

    Ok(PlatformConfig {
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: host.filter(|h| h != "github.com" && h != "www.github.com"),
    })
}
