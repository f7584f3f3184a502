//! Check a pull request end to end
//!
//! Two-phase pattern:
//! 1. Gather - fetch the complete snapshot (effectful)
//! 2. Evaluate - run the trust policy over it (pure, see [`crate::evaluate`])

use crate::error::Result;
use crate::evaluate::{Verdict, evaluate};
use crate::platform::PlatformService;
use crate::policy::TrustPolicy;
use tracing::{debug, info};

/// Fetch pull request `pr_number` and evaluate it against `policy`
pub async fn check_pull_request(
    platform: &dyn PlatformService,
    pr_number: u64,
    policy: &TrustPolicy,
) -> Result<Verdict> {
    let snapshot = platform.get_pull_request_snapshot(pr_number).await?;
    debug!(
        pr_number,
        snapshot = %serde_json::to_string(&snapshot)?,
        "evaluating snapshot"
    );

    let verdict = evaluate(&snapshot, policy);
    info!(
        repo = %platform.config(),
        pr_number,
        valid = verdict.is_valid(),
        required = verdict.decision.required_approvals,
        counted = verdict.decision.counted_approvals,
        "evaluated pull request"
    );
    Ok(verdict)
}
