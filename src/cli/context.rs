//! Shared command context
//!
//! Resolves the configuration and builds the platform service before any
//! API call is made.

use conflict_pr::config::{Config, Inputs, load_config_file};
use conflict_pr::error::Result;
use conflict_pr::platform::{GitHubService, PlatformService};
use std::path::Path;
use tracing::debug;

/// Everything a run needs
pub struct CommandContext {
    /// Validated configuration
    pub config: Config,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// - Merge the config file (if any) under flags and environment
    /// - Validate and default the inputs
    /// - Create the GitHub service
    pub fn new(inputs: Inputs, config_path: Option<&Path>) -> Result<Self> {
        let inputs = match config_path {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                inputs.with_file_defaults(load_config_file(path)?)
            }
            None => inputs,
        };

        let config = Config::resolve(inputs)?;
        debug!(?config, "resolved configuration");

        let platform = GitHubService::new(&config.token, config.platform_config())?;

        Ok(Self {
            config,
            platform: Box::new(platform),
        })
    }
}
