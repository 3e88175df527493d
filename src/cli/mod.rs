//! CLI for conflict-pr

mod context;
mod run;

pub use run::{annotate_error, run_action};

use clap::Parser;
use conflict_pr::config::Inputs;
use std::path::PathBuf;

/// Command-line arguments
///
/// Every input can also come from the environment GitHub Actions sets up
/// for a step (`INPUT_*`, `GITHUB_*`).
#[derive(Debug, Parser)]
#[command(name = "conflict-pr", version)]
#[command(about = "Merge a branch into another, opening a conflicts PR when the merge needs a human")]
pub struct Cli {
    /// API token
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Branch to merge into
    #[arg(long, env = "INPUT_BASE_BRANCH")]
    pub base_branch: Option<String>,

    /// Branch to merge from (defaults to the triggering ref)
    #[arg(long, env = "INPUT_HEAD_BRANCH")]
    pub head_branch: Option<String>,

    /// Title for the conflicts PR
    #[arg(long, env = "INPUT_PULL_REQUEST_TITLE")]
    pub title: Option<String>,

    /// Merge commit message (defaults to the PR title)
    #[arg(long, env = "INPUT_COMMIT_MESSAGE")]
    pub commit_message: Option<String>,

    /// Retry merges blocked by required status checks (true/false)
    #[arg(long, env = "INPUT_WAIT_FOR_CHECKS")]
    pub wait_for_checks: Option<String>,

    /// Ref that triggered the run
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Maximum merge retries while required checks are pending
    #[arg(long)]
    pub max_check_attempts: Option<u32>,

    /// Seconds to wait between merge retries
    #[arg(long)]
    pub check_interval: Option<u64>,

    /// TOML file with default inputs
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Split into raw inputs and the optional config file path
    pub fn into_inputs(self) -> (Inputs, Option<PathBuf>) {
        let inputs = Inputs {
            token: self.token,
            base_branch: self.base_branch,
            head_branch: self.head_branch,
            pull_request_title: self.title,
            commit_message: self.commit_message,
            wait_for_checks: self.wait_for_checks,
            git_ref: self.git_ref,
            repository: self.repository,
            api_url: self.api_url,
            max_check_attempts: self.max_check_attempts,
            check_interval_secs: self.check_interval,
        };
        (inputs, self.config)
    }
}
