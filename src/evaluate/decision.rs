//! Approval threshold and final decision

use super::commits::UntrustedCommit;
use super::reviews::Approval;
use crate::policy::TrustPolicy;
use serde::Serialize;

/// Final admit/reject decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Approvals needed: the policy minimum, plus one under elevation
    pub required_approvals: u32,
    /// Approvals that counted
    pub counted_approvals: u32,
    /// Whether `counted_approvals >= required_approvals`
    pub valid: bool,
    /// Explanation when the decision is invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Whether the PR needs one more approval than the configured minimum
pub const fn elevation_required(
    author_untrusted: bool,
    untrusted_commits: &[UntrustedCommit],
) -> bool {
    author_untrusted || !untrusted_commits.is_empty()
}

/// Compute the decision from the classification results
pub fn decide(
    author_untrusted: bool,
    untrusted_commits: &[UntrustedCommit],
    trusted_approvals: &[Approval],
    policy: &TrustPolicy,
) -> Decision {
    let elevation = u32::from(elevation_required(author_untrusted, untrusted_commits));
    let required_approvals = policy.minimum_approvals.get().saturating_add(elevation);
    let counted_approvals = u32::try_from(trusted_approvals.len()).unwrap_or(u32::MAX);
    let valid = counted_approvals >= required_approvals;

    Decision {
        required_approvals,
        counted_approvals,
        valid,
        message: (!valid).then(|| approvals_required_message(required_approvals)),
    }
}

fn approvals_required_message(required: u32) -> String {
    if required == 1 {
        "At least 1 approval is required".to_string()
    } else {
        format!("At least {required} approvals are required")
    }
}
