//! review-gate - validate pull request approvals against a trust policy

mod cli;

use anstream::eprintln;
use clap::{ArgAction, Parser, Subcommand};
use cli::style::Stylize;
use cli::{CheckOptions, PolicyArgs};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when the pull request fails the policy
const EXIT_INVALID: u8 = 1;

/// Exit code for operational errors (config, auth, network)
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(
    name = "review-gate",
    version,
    about = "Validate pull request approvals against a trust policy"
)]
struct Cli {
    /// Policy config file (default: .github/review-gate.toml or review-gate.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a pull request from GitHub and validate its approvals
    Check {
        /// Repository as owner/repo or URL
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repo: String,

        /// Pull request number
        #[arg(long)]
        pr: u64,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a pull request snapshot read from a JSON file
    Evaluate {
        /// Snapshot file, or - for stdin
        #[arg(long, value_name = "PATH")]
        snapshot: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify GitHub authentication (github or GitHub Enterprise)
    Auth {
        /// GitHub Enterprise host
        #[arg(long)]
        host: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Check {
            repo,
            pr,
            policy,
            json,
        } => {
            let options = CheckOptions {
                repo,
                pr_number: pr,
                json,
            };
            cli::run_check(config, options, policy).await
        }
        Commands::Evaluate {
            snapshot,
            policy,
            json,
        } => cli::run_evaluate(config, &snapshot, policy, json),
        Commands::Auth { host } => cli::run_auth(host.as_deref()).await.map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INVALID),
        Err(e) => {
            eprintln!("{} {e}", "error:".error());
            ExitCode::from(EXIT_ERROR)
        }
    }
}
