//! Platform services for the hosted source-control API
//!
//! The orchestrator only talks to GitHub through [`PlatformService`], which
//! keeps the control flow testable against an in-memory mock.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{BranchRef, PullRequest};
use async_trait::async_trait;
use tracing::debug;

/// Branch, merge, ref and pull request operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Look up a branch and its head commit
    ///
    /// Fails with `Error::BranchNotFound` if the branch does not exist.
    async fn get_branch(&self, name: &str) -> Result<BranchRef>;

    /// Check whether a branch exists
    ///
    /// Any lookup error counts as "does not exist".
    async fn branch_exists(&self, name: &str) -> bool {
        match self.get_branch(name).await {
            Ok(_) => true,
            Err(e) => {
                debug!(branch = name, error = %e, "branch lookup failed, treating as absent");
                false
            }
        }
    }

    /// Merge `head` into `base` server-side
    ///
    /// Returns the merge commit SHA, or `None` when `base` already contained
    /// `head`. Conflicts and blocked merges come back as remote errors.
    async fn merge_branches(&self, base: &str, head: &str, message: &str)
    -> Result<Option<String>>;

    /// Create `refs/heads/<branch>` pointing at `sha`
    async fn create_ref(&self, branch: &str, sha: &str) -> Result<()>;

    /// Move `refs/heads/<branch>` to `sha` (fast-forward only)
    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()>;

    /// List open PRs from `head` into `base`
    async fn list_open_pull_requests(&self, base: &str, head: &str) -> Result<Vec<PullRequest>>;

    /// Open a PR from `head` into `base`
    async fn create_pull_request(
        &self,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;
}
