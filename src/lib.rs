//! conflict-pr: merge a branch server-side, or park the conflict on a side
//! branch with a pull request for a human to resolve.
//!
//! The library holds the whole flow; the `conflict-pr` binary only parses
//! inputs, sets up logging and maps the result to an exit status.

pub mod config;
pub mod error;
pub mod merge;
pub mod orchestrator;
pub mod platform;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use orchestrator::MergeOrchestrator;
