//! Run command - merge or open the conflicts PR

use crate::cli::Cli;
use crate::cli::context::CommandContext;
use conflict_pr::error::Result;
use conflict_pr::orchestrator::MergeOrchestrator;
use conflict_pr::types::RunOutcome;
use tracing::debug;

/// Run one merge pass with the given arguments
pub async fn run_action(cli: Cli) -> Result<RunOutcome> {
    let (inputs, config_path) = cli.into_inputs();
    let ctx = CommandContext::new(inputs, config_path.as_deref())?;

    let outcome = MergeOrchestrator::new(&ctx.config, ctx.platform.as_ref())
        .execute()
        .await?;

    debug!(%outcome, "run finished");
    Ok(outcome)
}

/// Format a message as a GitHub Actions error annotation
///
/// The runner picks `::error::` lines off stdout and marks the step failed.
pub fn annotate_error(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
