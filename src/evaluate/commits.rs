//! Commit classification

use crate::policy::{ElevationReason, TrustPolicy, elevation_reason};
use crate::types::Commit;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Why a commit is untrusted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UntrustedCommitReason {
    /// Neither committer nor author is linked to a GitHub user
    Unlinked,
    /// Effective committer is an app outside `trusted_apps`
    UntrustedApp,
    /// Effective committer is an untrusted machine user
    UntrustedMachineUser,
}

impl UntrustedCommitReason {
    /// Short note attached to the committer entry
    const fn committer_note(self) -> Option<&'static str> {
        match self {
            Self::Unlinked => None,
            Self::UntrustedApp => Some("untrusted app"),
            Self::UntrustedMachineUser => Some("untrusted machine user"),
        }
    }
}

impl From<ElevationReason> for UntrustedCommitReason {
    fn from(reason: ElevationReason) -> Self {
        match reason {
            ElevationReason::Unlinked => Self::Unlinked,
            ElevationReason::UntrustedApp => Self::UntrustedApp,
            ElevationReason::UntrustedMachineUser => Self::UntrustedMachineUser,
        }
    }
}

impl std::fmt::Display for UntrustedCommitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlinked => write!(f, "a commit isn't linked to any GitHub user"),
            Self::UntrustedApp => write!(f, "the committer is an untrusted app"),
            Self::UntrustedMachineUser => write!(f, "the committer is an untrusted machine user"),
        }
    }
}

impl Serialize for UntrustedCommitReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The committer of an untrusted commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntrustedCommitter {
    /// Committer login
    pub login: String,
    /// Always `true`; kept for readers of the JSON report
    pub untrusted: bool,
    /// Short explanation (`untrusted app`, `untrusted machine user`)
    pub message: String,
}

/// A commit that calls for elevation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntrustedCommit {
    /// Commit SHA
    pub sha: String,
    /// Effective committer (absent for unlinked commits)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committer: Option<UntrustedCommitter>,
    /// Why the commit is untrusted
    #[serde(rename = "message")]
    pub reason: UntrustedCommitReason,
}

/// Result of classifying every commit on the PR
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitClassification {
    /// Logins of all linked effective committers
    pub committers: BTreeSet<String>,
    /// Untrusted commits in PR order, one entry per commit
    pub untrusted: Vec<UntrustedCommit>,
}

/// Classify each commit by its effective committer
pub fn classify_commits(commits: &[Commit], policy: &TrustPolicy) -> CommitClassification {
    let mut result = CommitClassification::default();

    for commit in commits {
        let committer = commit.effective_committer();
        if let Some(user) = committer {
            result.committers.insert(user.login.clone());
        }

        let Some(reason) = elevation_reason(committer, policy) else {
            continue;
        };
        let reason = UntrustedCommitReason::from(reason);
        result.untrusted.push(UntrustedCommit {
            sha: commit.oid.clone(),
            committer: committer
                .zip(reason.committer_note())
                .map(|(user, note)| UntrustedCommitter {
                    login: user.login.clone(),
                    untrusted: true,
                    message: note.to_string(),
                }),
            reason,
        });
    }

    result
}
