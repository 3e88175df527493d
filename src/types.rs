//! Core types for conflict-pr

use serde::{Deserialize, Serialize};

/// A branch and the commit it currently points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name (without `refs/heads/`)
    pub name: String,
    /// Head commit SHA
    pub sha: String,
}

/// A pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

impl PullRequest {
    /// Whether this PR goes from `head` into `base`
    pub fn connects(&self, base: &str, head: &str) -> bool {
        self.base_ref == base && self.head_ref == head
    }
}

/// Repository coordinates for API calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// REST API base URL, e.g. `https://api.github.com`
    pub api_url: String,
}

/// Result of trying to merge one branch into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Merge commit created (or nothing needed merging)
    Merged,
    /// GitHub reported a merge conflict
    Conflict,
    /// Required status checks never passed within the retry budget
    ChecksTimedOut {
        /// Number of delayed retries performed
        attempts: u32,
    },
    /// Any other failure; logged and not acted on
    Failed(String),
}

impl MergeOutcome {
    /// Whether a conflicts branch + PR is needed to finish the job
    pub const fn needs_conflicts_branch(&self) -> bool {
        matches!(self, Self::Conflict | Self::ChecksTimedOut { .. })
    }
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merged => write!(f, "merged"),
            Self::Conflict => write!(f, "conflict"),
            Self::ChecksTimedOut { attempts } => {
                write!(f, "required checks still pending after {attempts} retries")
            }
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Which handled path a run ended on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Head and base already point at the same commit
    InSync,
    /// Head merged straight into base
    Merged,
    /// The merge failed for a reason that does not need a conflicts PR
    MergeFailed(String),
    /// A new conflicts PR into base was opened
    PullRequestCreated(PullRequest),
    /// An open conflicts PR into base already existed
    PullRequestExists(PullRequest),
    /// The conflicts branch itself conflicted with head; a PR into head was
    /// attempted instead
    ConflictsIntoHead(Option<PullRequest>),
    /// GitHub refused a duplicate PR
    DuplicatePullRequest,
    /// Base already had every commit of head
    NoCommitsBetween,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InSync => write!(f, "branches in sync"),
            Self::Merged => write!(f, "merged"),
            Self::MergeFailed(message) => write!(f, "merge failed (ignored): {message}"),
            Self::PullRequestCreated(pr) => write!(f, "created PR #{}: {}", pr.number, pr.html_url),
            Self::PullRequestExists(pr) => {
                write!(f, "existing PR #{}: {}", pr.number, pr.html_url)
            }
            Self::ConflictsIntoHead(Some(pr)) => {
                write!(f, "conflicts PR into head #{}: {}", pr.number, pr.html_url)
            }
            Self::ConflictsIntoHead(None) => write!(f, "conflicts PR into head not created"),
            Self::DuplicatePullRequest => write!(f, "pull request already exists"),
            Self::NoCommitsBetween => write!(f, "no commits between branches"),
        }
    }
}
