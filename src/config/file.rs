//! Optional TOML config file.
//!
//! Holds the non-secret inputs so local runs don't need a pile of
//! environment variables. The token is never read from disk.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Merge target
    pub base_branch: Option<String>,
    /// Merge source
    pub head_branch: Option<String>,
    /// PR title
    pub pull_request_title: Option<String>,
    /// Merge commit message
    pub commit_message: Option<String>,
    /// Retry merges blocked by required checks
    pub wait_for_checks: Option<bool>,
    /// `owner/repo`
    pub repository: Option<String>,
    /// REST API base URL
    pub api_url: Option<String>,
    /// Retry budget for blocked merges
    pub max_check_attempts: Option<u32>,
    /// Delay between retries, in seconds
    pub check_interval_secs: Option<u64>,
}

/// Load a config file from disk.
///
/// Unlike optional state files, an explicitly requested config that is
/// missing is an error.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}
