//! Evaluate command - validate a snapshot without talking to GitHub

use crate::cli::context::{PolicyArgs, load_policy};
use crate::cli::report::print_verdict;
use review_gate::error::{Error, Result};
use review_gate::evaluate::evaluate;
use review_gate::types::PullRequestSnapshot;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Run the evaluate command on a snapshot file (`-` reads stdin)
///
/// Returns whether the snapshot satisfies the policy.
pub fn run_evaluate(
    config_path: Option<&Path>,
    snapshot_path: &Path,
    policy_args: PolicyArgs,
    json: bool,
) -> Result<bool> {
    let policy = load_policy(config_path, policy_args)?;

    let content = if snapshot_path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(snapshot_path).map_err(|e| {
            Error::InvalidSnapshot(format!("failed to read {}: {e}", snapshot_path.display()))
        })?
    };

    let snapshot: PullRequestSnapshot = serde_json::from_str(&content).map_err(|e| {
        Error::InvalidSnapshot(format!("failed to parse {}: {e}", snapshot_path.display()))
    })?;
    debug!(
        commits = snapshot.commits.len(),
        reviews = snapshot.reviews.len(),
        "loaded snapshot"
    );

    let verdict = evaluate(&snapshot, &policy);
    print_verdict(&verdict, json)?;
    Ok(verdict.is_valid())
}
