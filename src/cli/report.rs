//! Verdict rendering

use crate::cli::style::{Stylize, check, cross};
use anstream::{eprintln, println};
use review_gate::error::Result;
use review_gate::evaluate::Verdict;

/// Print `verdict` as pretty JSON or as a human-readable summary
///
/// The decision message of an invalid verdict always goes to stderr.
pub fn print_verdict(verdict: &Verdict, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(verdict)?);
    } else {
        print_summary(verdict);
    }

    if let Some(ref message) = verdict.decision.message {
        eprintln!("{} {message}", "error:".error());
    }
    Ok(())
}

fn print_summary(verdict: &Verdict) {
    let decision = &verdict.decision;
    let mark = if decision.valid { check() } else { cross() };
    println!(
        "{mark} {} of {} required approval(s)",
        decision.counted_approvals.accent(),
        decision.required_approvals.accent()
    );

    println!("   Head: {}", short_sha(&verdict.head_sha).muted());
    let author = verdict.author.login.as_deref().unwrap_or("(deleted user)");
    if verdict.author.untrusted {
        println!("   Author: {} {}", author.warn(), "(untrusted)".muted());
    } else {
        println!("   Author: {}", author.accent());
    }
    if verdict.elevation_required {
        println!(
            "   {}",
            "An extra approval is required (untrusted author or commits)".warn()
        );
    }

    if !verdict.trusted_approvals.is_empty() {
        let logins: Vec<&str> = verdict
            .trusted_approvals
            .iter()
            .map(|a| a.login.as_str())
            .collect();
        println!("   Approved by: {}", logins.join(", ").accent());
    }

    if !verdict.ignored_approvals.is_empty() {
        println!("   {}:", "Ignored approvals".emphasis());
        for approval in &verdict.ignored_approvals {
            println!("     - {}: {}", approval.login, approval.reason.muted());
        }
    }

    if !verdict.untrusted_commits.is_empty() {
        println!("   {}:", "Untrusted commits".emphasis());
        for commit in &verdict.untrusted_commits {
            match commit.committer {
                Some(ref committer) => println!(
                    "     - {}: {} ({})",
                    short_sha(&commit.sha),
                    commit.reason.muted(),
                    committer.login
                ),
                None => println!("     - {}: {}", short_sha(&commit.sha), commit.reason.muted()),
            }
        }
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
