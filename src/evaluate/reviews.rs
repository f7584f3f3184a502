//! Review classification

use crate::policy::{TrustPolicy, is_app, is_untrusted_machine_user};
use crate::types::{Review, ReviewState};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Why an approval does not count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Approved by an app account
    App,
    /// Approved by an untrusted machine user
    UntrustedMachineUser,
    /// Approved by someone who committed to the PR
    Committer,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::App => write!(f, "approval from app is ignored"),
            Self::UntrustedMachineUser => {
                write!(f, "approval from untrusted machine user is ignored")
            }
            Self::Committer => write!(f, "approval from committer is ignored"),
        }
    }
}

impl Serialize for IgnoreReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An approval that counts toward the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approval {
    /// Reviewer login
    pub login: String,
}

/// An approval that was discarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredApproval {
    /// Reviewer login
    pub login: String,
    /// Why it was discarded
    #[serde(rename = "message")]
    pub reason: IgnoreReason,
}

/// Approvals of the head commit, partitioned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewClassification {
    /// Counted approvals, in review order
    pub trusted: Vec<Approval>,
    /// Discarded approvals, in review order
    pub ignored: Vec<IgnoredApproval>,
}

impl ReviewClassification {
    /// Approvals ignored because the reviewer also committed
    pub fn self_approvals(&self) -> impl Iterator<Item = &IgnoredApproval> {
        self.ignored
            .iter()
            .filter(|a| a.reason == IgnoreReason::Committer)
    }
}

/// Classify approvals of `head_sha`
///
/// Reviews that aren't approvals, or that approve an older commit, are
/// dropped without an entry. The checks run app first, then untrusted
/// machine user, then committer.
pub fn classify_reviews(
    reviews: &[Review],
    head_sha: &str,
    policy: &TrustPolicy,
    committers: &BTreeSet<String>,
) -> ReviewClassification {
    let mut result = ReviewClassification::default();

    let approvals = reviews
        .iter()
        .filter(|r| r.state == ReviewState::Approved && r.commit_oid == head_sha);

    for review in approvals {
        let login = review.author.login.clone();
        let reason = if is_app(&review.author) {
            Some(IgnoreReason::App)
        } else if is_untrusted_machine_user(&login, policy) {
            Some(IgnoreReason::UntrustedMachineUser)
        } else if committers.contains(&login) {
            Some(IgnoreReason::Committer)
        } else {
            None
        };

        match reason {
            Some(reason) => result.ignored.push(IgnoredApproval { login, reason }),
            None => result.trusted.push(Approval { login }),
        }
    }

    result
}
