//! Pull request reconciliation

use crate::config::Config;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PullRequest;
use tracing::{debug, info};

/// Body of every PR this tool opens
pub const PULL_REQUEST_BODY: &str = "Automatic PR";

/// Result of reconciling the conflicts PR into base
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestState {
    /// An open PR with the same head and base was found
    Existing(PullRequest),
    /// A new PR was opened
    Created(PullRequest),
}

/// Open the conflicts PR into base unless one is already open
///
/// The list-then-create check is what keeps at most one open PR per
/// (base, conflicts branch); GitHub's own duplicate rejection is handled
/// by the caller's error policy.
pub async fn reconcile_pull_request(
    platform: &dyn PlatformService,
    config: &Config,
) -> Result<PullRequestState> {
    let base = &config.base_branch;
    let head = config.conflicts_branch();

    let open = platform.list_open_pull_requests(base, &head).await?;
    debug!(count = open.len(), base = %base, head = %head, "open PRs");

    if let Some(existing) = open.into_iter().find(|pr| pr.connects(base, &head)) {
        info!(
            "Found an existing open pull request {}, cancelling.",
            existing.html_url
        );
        return Ok(PullRequestState::Existing(existing));
    }

    let created = platform
        .create_pull_request(base, &head, &config.pull_request_title, PULL_REQUEST_BODY)
        .await?;
    info!("Created a new PR: {}", created.html_url);
    Ok(PullRequestState::Created(created))
}
