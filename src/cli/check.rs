//! Check command - fetch a pull request and validate its approvals

use crate::cli::context::{PolicyArgs, load_policy};
use crate::cli::report::print_verdict;
use crate::cli::style::{Stylize, spinner_style};
use indicatif::ProgressBar;
use review_gate::check::check_pull_request;
use review_gate::error::Result;
use review_gate::evaluate::Verdict;
use review_gate::platform::{create_platform_service, parse_repo_info};
use review_gate::policy::TrustPolicy;
use review_gate::types::PlatformConfig;
use std::path::Path;
use std::time::Duration;

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Repository (`owner/repo` or URL)
    pub repo: String,
    /// Pull request number
    pub pr_number: u64,
    /// Print the verdict as JSON
    pub json: bool,
}

/// Run the check command
///
/// Returns whether the pull request satisfies the policy.
pub async fn run_check(
    config_path: Option<&Path>,
    options: CheckOptions,
    policy_args: PolicyArgs,
) -> Result<bool> {
    let platform_config = parse_repo_info(&options.repo)?;
    let policy = load_policy(config_path, policy_args)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Fetching {}#{}...",
        platform_config.to_string().emphasis(),
        options.pr_number
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = fetch_and_evaluate(&platform_config, options.pr_number, &policy).await;
    spinner.finish_and_clear();

    let verdict = result?;
    print_verdict(&verdict, options.json)?;
    Ok(verdict.is_valid())
}

async fn fetch_and_evaluate(
    config: &PlatformConfig,
    pr_number: u64,
    policy: &TrustPolicy,
) -> Result<Verdict> {
    let platform = create_platform_service(config).await?;
    check_pull_request(platform.as_ref(), pr_number, policy).await
}
