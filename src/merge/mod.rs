//! Merge engine
//!
//! Three steps, each re-reading remote state before it mutates anything:
//! 1. Attempt - merge head into base, optionally waiting out required checks
//! 2. Conflicts branch - create or refresh `conflicts-<head>`
//! 3. Pull request - open the conflicts PR into base unless one is open

mod attempt;
mod conflicts;
mod pull_request;

pub use attempt::try_merge;
pub use conflicts::{ConflictsBranchState, reconcile_conflicts_branch};
pub use pull_request::{PULL_REQUEST_BODY, PullRequestState, reconcile_pull_request};
