//! Merge attempt with bounded waiting on required status checks

use crate::config::RetryPolicy;
use crate::error::ErrorKind;
use crate::platform::PlatformService;
use crate::types::MergeOutcome;
use tracing::{debug, info, warn};

/// Merge `head` into `base` and classify the result
///
/// Only a literal "Merge Conflict" yields [`MergeOutcome::Conflict`]. When
/// `retry` is set, a merge blocked by required status checks is retried
/// after `retry.delay`, at most `retry.max_attempts` times; if the checks
/// never clear the outcome is [`MergeOutcome::ChecksTimedOut`]. Every other
/// error is [`MergeOutcome::Failed`] and is not acted on by callers.
///
/// The wait is a plain sleep on the current task: nothing else runs while a
/// merge is blocked.
pub async fn try_merge(
    platform: &dyn PlatformService,
    base: &str,
    head: &str,
    commit_message: &str,
    retry: Option<&RetryPolicy>,
) -> MergeOutcome {
    let mut retries = 0;

    loop {
        let err = match platform.merge_branches(base, head, commit_message).await {
            Ok(sha) => {
                debug!(base, head, sha = ?sha, "merge accepted");
                info!("Successfully merged without conflicts");
                return MergeOutcome::Merged;
            }
            Err(err) => err,
        };

        let message = err.message();
        info!("Failed to merge: {message}");
        if let Some(payload) = err.payload() {
            debug!(payload, "merge error payload");
        }

        match (err.kind(), retry) {
            (ErrorKind::MergeConflict, _) => return MergeOutcome::Conflict,
            (ErrorKind::ChecksPending, Some(policy)) => {
                if retries >= policy.max_attempts {
                    warn!(
                        attempts = retries,
                        "required status checks still pending, giving up on direct merge"
                    );
                    return MergeOutcome::ChecksTimedOut { attempts: retries };
                }
                retries += 1;
                info!(
                    attempt = retries,
                    max_attempts = policy.max_attempts,
                    delay_secs = policy.delay.as_secs(),
                    "waiting for required status checks before retrying merge"
                );
                tokio::time::sleep(policy.delay).await;
            }
            _ => return MergeOutcome::Failed(message),
        }
    }
}
