//! GitHub authentication

use super::AuthSource;
use crate::error::{Error, Result};
use crate::platform::github::{build_client, viewer_login};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// GitHub Enterprise host, if any
    pub host: Option<String>,
}

/// First non-empty token among [`TOKEN_ENV_VARS`], using `lookup` to read
/// variables
pub fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|&name| lookup(name))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

/// Resolve a GitHub token
///
/// Order: `GH_TOKEN`, `GITHUB_TOKEN`, then `gh auth token`.
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = token_from_env(|name| std::env::var(name).ok()) {
        debug!("using GitHub token from environment");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
            host: host.map(String::from),
        });
    }

    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(h) = host {
        cmd.args(["--hostname", h]);
    }

    let output = cmd.output().await.map_err(|e| {
        Error::Auth(format!(
            "no GH_TOKEN or GITHUB_TOKEN set and failed to run gh: {e}"
        ))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Auth(format!(
            "gh auth token failed: {}",
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("gh auth token returned an empty token".to_string()));
    }

    debug!("using GitHub token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
        host: host.map(String::from),
    })
}

/// Verify the token by asking GitHub who it belongs to
///
/// Returns the authenticated login.
pub async fn test_github_auth(config: &GitHubAuthConfig) -> Result<String> {
    let client = build_client(&config.token, config.host.as_deref())?;
    viewer_login(&client)
        .await
        .map_err(|e| Error::Auth(format!("token rejected: {e}")))
}
