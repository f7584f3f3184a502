//! Auth command - verify GitHub credentials

use crate::cli::style::{Stylize, check};
use anstream::println;
use review_gate::auth::{AuthSource, get_github_auth, test_github_auth};
use review_gate::error::Result;

/// Run the auth command
pub async fn run_auth(host: Option<&str>) -> Result<()> {
    let config = get_github_auth(host).await?;
    let login = test_github_auth(&config).await?;

    let source = match config.source {
        AuthSource::Cli => "gh CLI",
        AuthSource::EnvVar => "environment",
    };
    println!(
        "{} Authenticated as {} {}",
        check(),
        login.accent(),
        format!("(token from {source})").muted()
    );
    Ok(())
}
