//! The full merge-or-open-conflicts-PR flow

use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::merge::{
    ConflictsBranchState, PullRequestState, reconcile_conflicts_branch, reconcile_pull_request,
    try_merge,
};
use crate::platform::PlatformService;
use crate::types::{MergeOutcome, RunOutcome};
use tracing::{debug, error, info};

/// Drives one run against a platform service
///
/// Holds no state of its own: every decision is made from a fresh read of
/// the remote branches and pull requests.
pub struct MergeOrchestrator<'a> {
    config: &'a Config,
    platform: &'a dyn PlatformService,
}

impl<'a> MergeOrchestrator<'a> {
    /// Create an orchestrator for `config`
    pub fn new(config: &'a Config, platform: &'a dyn PlatformService) -> Self {
        Self { config, platform }
    }

    /// Run the flow and apply the top-level error policy
    ///
    /// Duplicate-PR and no-commits errors from anywhere in the flow count as
    /// success. Every other error is returned unchanged.
    pub async fn execute(&self) -> Result<RunOutcome> {
        match self.run().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => self.handle_error(err),
        }
    }

    /// Run the flow, propagating every error
    pub async fn run(&self) -> Result<RunOutcome> {
        let config = self.config;
        let platform = self.platform;

        info!("loading \"{}\"", config.head_branch);
        let head = platform.get_branch(&config.head_branch).await?;

        info!("loading \"{}\"", config.base_branch);
        let base = platform.get_branch(&config.base_branch).await?;

        if head.sha == base.sha {
            info!("source and target branches are in sync, skipping PR.");
            return Ok(RunOutcome::InSync);
        }

        let retry = config.wait_for_checks.then_some(&config.retry);
        let outcome = try_merge(
            platform,
            &config.base_branch,
            &config.head_branch,
            &config.commit_message,
            retry,
        )
        .await;

        match &outcome {
            MergeOutcome::Merged => return Ok(RunOutcome::Merged),
            MergeOutcome::Failed(message) => return Ok(RunOutcome::MergeFailed(message.clone())),
            MergeOutcome::Conflict | MergeOutcome::ChecksTimedOut { .. } => {
                debug!(%outcome, "direct merge needs a conflicts branch");
            }
        }

        let branch_state = reconcile_conflicts_branch(platform, config, &head).await?;
        debug!(state = ?branch_state, "conflicts branch reconciled");
        if let ConflictsBranchState::ConflictsIntoHead(pr) = branch_state {
            return Ok(RunOutcome::ConflictsIntoHead(pr));
        }

        Ok(match reconcile_pull_request(platform, config).await? {
            PullRequestState::Existing(pr) => RunOutcome::PullRequestExists(pr),
            PullRequestState::Created(pr) => RunOutcome::PullRequestCreated(pr),
        })
    }

    fn handle_error(&self, err: Error) -> Result<RunOutcome> {
        error!("{}", err.message());
        if let Some(payload) = err.payload() {
            debug!(payload, "error payload");
        }

        let kind = err.kind();
        if !kind.is_benign() {
            return Err(err);
        }

        if kind == ErrorKind::DuplicatePullRequest {
            info!("Found an existing open pull request, cancelling.");
            Ok(RunOutcome::DuplicatePullRequest)
        } else {
            info!(
                "{} already has all commits in {}",
                self.config.base_branch, self.config.head_branch
            );
            Ok(RunOutcome::NoCommitsBetween)
        }
    }
}
