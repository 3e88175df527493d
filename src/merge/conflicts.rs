//! Conflicts-branch reconciliation
//!
//! When head cannot be merged into base, head's commits are parked on
//! `conflicts-<head>` so the PR into base can be resolved without touching
//! head itself.

use crate::config::Config;
use crate::error::Result;
use crate::merge::attempt::try_merge;
use crate::merge::pull_request::PULL_REQUEST_BODY;
use crate::platform::PlatformService;
use crate::types::{BranchRef, MergeOutcome, PullRequest};
use tracing::{debug, error, info};

/// What happened to the conflicts branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictsBranchState {
    /// Branch did not exist and was created at head
    Created,
    /// Existing branch was moved to head
    Updated,
    /// Existing branch could not be moved; head was merged into it instead
    MergedFromHead(MergeOutcome),
    /// Head conflicts with the conflicts branch too; a PR from the conflicts
    /// branch into head was attempted and the run should stop
    ConflictsIntoHead(Option<PullRequest>),
}

impl ConflictsBranchState {
    /// Whether the PR into base should still be reconciled
    pub const fn continue_to_pull_request(&self) -> bool {
        !matches!(self, Self::ConflictsIntoHead(_))
    }
}

/// Create `conflicts-<head>` at head, or bring an existing one up to date
///
/// Existence is re-checked on every run; a failed lookup counts as
/// "does not exist". Creating the branch propagates errors, while failures
/// moving an existing branch fall back to a merge.
pub async fn reconcile_conflicts_branch(
    platform: &dyn PlatformService,
    config: &Config,
    head: &BranchRef,
) -> Result<ConflictsBranchState> {
    let branch = config.conflicts_branch();

    if !platform.branch_exists(&branch).await {
        info!("Creating a new branch {branch}...");
        platform.create_ref(&branch, &head.sha).await?;
        return Ok(ConflictsBranchState::Created);
    }

    info!("Attempting to update ref: {branch} with sha: {}", head.sha);
    let update_err = match platform.update_ref(&branch, &head.sha).await {
        Ok(()) => return Ok(ConflictsBranchState::Updated),
        Err(e) => e,
    };

    error!("{}", update_err.message());
    if let Some(payload) = update_err.payload() {
        debug!(payload, "update ref error payload");
    }
    info!("Unable to update ref for {branch}, trying to merge...");

    let message = format!("Automatic merge from '{}'", head.name);
    let outcome = try_merge(platform, &branch, &head.name, &message, None).await;
    if outcome != MergeOutcome::Conflict {
        return Ok(ConflictsBranchState::MergedFromHead(outcome));
    }

    let pr = match platform
        .create_pull_request(
            &head.name,
            &branch,
            &config.pull_request_title,
            PULL_REQUEST_BODY,
        )
        .await
    {
        Ok(pr) => {
            info!("Created a new PR: {}", pr.html_url);
            Some(pr)
        }
        Err(e) => {
            error!("{}", e.message());
            if let Some(payload) = e.payload() {
                debug!(payload, "create PR error payload");
            }
            error!("Failed to create a PR for {} => {branch}", head.name);
            None
        }
    };

    Ok(ConflictsBranchState::ConflictsIntoHead(pr))
}
