//! Trust evaluation engine
//!
//! Pure functions only: no I/O, no logging, no clock. The same snapshot and
//! policy always produce the same [`Verdict`].
//!
//! 1. Commits - resolve effective committers, flag untrusted ones
//! 2. Reviews - keep head approvals, count or ignore each one
//! 3. Decision - required vs. counted approvals

mod commits;
mod decision;
mod reviews;

pub use commits::{
    CommitClassification, UntrustedCommit, UntrustedCommitReason, UntrustedCommitter,
    classify_commits,
};
pub use decision::{Decision, decide, elevation_required};
pub use reviews::{Approval, IgnoreReason, IgnoredApproval, ReviewClassification, classify_reviews};

use crate::policy::{TrustPolicy, requires_elevation};
use crate::types::PullRequestSnapshot;
use serde::Serialize;

/// The PR author as seen by the policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorReport {
    /// Author login (`None` when the account no longer exists)
    pub login: Option<String>,
    /// Whether the author requires elevation
    pub untrusted: bool,
}

/// Decision plus the classification detail behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Head commit SHA the approvals were checked against
    pub head_sha: String,
    /// PR author
    pub author: AuthorReport,
    /// Approvals that counted
    pub trusted_approvals: Vec<Approval>,
    /// Approvals that were ignored, with reasons
    pub ignored_approvals: Vec<IgnoredApproval>,
    /// Commits that triggered elevation
    pub untrusted_commits: Vec<UntrustedCommit>,
    /// Whether one extra approval is required
    pub elevation_required: bool,
    /// The decision itself
    #[serde(flatten)]
    pub decision: Decision,
}

impl Verdict {
    /// Whether the PR satisfies the policy
    pub const fn is_valid(&self) -> bool {
        self.decision.valid
    }
}

/// Evaluate a pull request snapshot against a trust policy
pub fn evaluate(snapshot: &PullRequestSnapshot, policy: &TrustPolicy) -> Verdict {
    let commits = classify_commits(&snapshot.commits, policy);
    let reviews = classify_reviews(
        &snapshot.reviews,
        &snapshot.head_sha,
        policy,
        &commits.committers,
    );
    let author_untrusted = requires_elevation(snapshot.author.as_ref(), policy);
    let decision = decide(author_untrusted, &commits.untrusted, &reviews.trusted, policy);

    Verdict {
        head_sha: snapshot.head_sha.clone(),
        author: AuthorReport {
            login: snapshot.author.as_ref().map(|u| u.login.clone()),
            untrusted: author_untrusted,
        },
        elevation_required: elevation_required(author_untrusted, &commits.untrusted),
        trusted_approvals: reviews.trusted,
        ignored_approvals: reviews.ignored,
        untrusted_commits: commits.untrusted,
        decision,
    }
}
