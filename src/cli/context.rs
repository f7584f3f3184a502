//! Shared policy setup for CLI commands
//!
//! Both `check` and `evaluate` resolve the trust policy the same way: config
//! file first (explicit `--config`, else discovered), then CLI flags on top.

use clap::Args;
use review_gate::config::{PolicyConfig, find_config, load_config};
use review_gate::error::{Error, Result};
use review_gate::policy::TrustPolicy;
use std::path::Path;
use tracing::{debug, info};

/// Policy flags shared by `check` and `evaluate`
#[derive(Debug, Clone, Default, Args)]
pub struct PolicyArgs {
    /// Trusted app slug, without `[bot]` (repeatable)
    #[arg(long = "trusted-app", value_name = "APP")]
    pub trusted_apps: Vec<String>,

    /// Machine user that is always trusted (repeatable)
    #[arg(long = "trusted-machine-user", value_name = "LOGIN")]
    pub trusted_machine_users: Vec<String>,

    /// Untrusted machine user login, or `/regex/` (repeatable)
    #[arg(long = "untrusted-machine-user", value_name = "LOGIN")]
    pub untrusted_machine_users: Vec<String>,

    /// Approvals required without elevation
    #[arg(long = "min-approvals", value_name = "N")]
    pub minimum_approvals: Option<u32>,
}

impl From<PolicyArgs> for PolicyConfig {
    fn from(args: PolicyArgs) -> Self {
        Self {
            minimum_approvals: args.minimum_approvals,
            trusted_apps: args.trusted_apps,
            trusted_machine_users: args.trusted_machine_users,
            untrusted_machine_users: args.untrusted_machine_users,
        }
    }
}

/// Build the trust policy from config file and flags
pub fn load_policy(config_path: Option<&Path>, args: PolicyArgs) -> Result<TrustPolicy> {
    let base = if let Some(path) = config_path {
        load_config(path)?
    } else {
        let cwd = std::env::current_dir()?;
        match find_config(&cwd) {
            Some(path) => {
                info!(path = %path.display(), "using discovered config");
                load_config(&path)?
            }
            None => PolicyConfig::default(),
        }
    };

    let policy = base.merge(args.into()).into_policy()?;
    debug!(
        policy = %serde_json::to_string(&policy).map_err(Error::from)?,
        "resolved trust policy"
    );
    Ok(policy)
}
