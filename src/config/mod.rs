//! Run configuration
//!
//! Raw inputs arrive from flags, `INPUT_*`/`GITHUB_*` environment variables
//! and an optional TOML file. [`Config::resolve`] validates them and applies
//! the defaults for head branch, PR title and commit message.

mod file;

pub use file::{ConfigFile, load_config_file};

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use std::time::Duration;

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Prefix stripped from `GITHUB_REF` to get a branch name
const HEADS_PREFIX: &str = "refs/heads/";

/// Prefix of the derived conflicts branch name
const CONFLICTS_PREFIX: &str = "conflicts-";

/// Default number of delayed merge retries while required checks are pending
pub const DEFAULT_MAX_CHECK_ATTEMPTS: u32 = 30;

/// Default delay between merge retries (30 minutes)
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Bounded, fixed-delay retry policy for merges blocked by required checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of delayed retries
    pub max_attempts: u32,
    /// Delay before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_CHECK_ATTEMPTS,
            delay: DEFAULT_CHECK_INTERVAL,
        }
    }
}

/// Unvalidated inputs, every field optional
///
/// Empty strings are treated the same as missing values.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    /// API token
    pub token: Option<String>,
    /// Merge target
    pub base_branch: Option<String>,
    /// Merge source
    pub head_branch: Option<String>,
    /// PR title override
    pub pull_request_title: Option<String>,
    /// Merge commit message override
    pub commit_message: Option<String>,
    /// Raw wait-for-checks flag
    pub wait_for_checks: Option<String>,
    /// Ref that triggered the run (`GITHUB_REF`)
    pub git_ref: Option<String>,
    /// `owner/repo`
    pub repository: Option<String>,
    /// REST API base URL
    pub api_url: Option<String>,
    /// Retry budget override
    pub max_check_attempts: Option<u32>,
    /// Retry delay override, in seconds
    pub check_interval_secs: Option<u64>,
}

impl Inputs {
    /// Fill fields that are still unset from a config file
    #[must_use]
    pub fn with_file_defaults(mut self, file: ConfigFile) -> Self {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if non_empty(slot.as_deref()).is_none() {
                *slot = value;
            }
        }

        fill(&mut self.base_branch, file.base_branch);
        fill(&mut self.head_branch, file.head_branch);
        fill(&mut self.pull_request_title, file.pull_request_title);
        fill(&mut self.commit_message, file.commit_message);
        fill(&mut self.repository, file.repository);
        fill(&mut self.api_url, file.api_url);
        fill(
            &mut self.wait_for_checks,
            file.wait_for_checks.map(|b| b.to_string()),
        );
        self.max_check_attempts = self.max_check_attempts.or(file.max_check_attempts);
        self.check_interval_secs = self.check_interval_secs.or(file.check_interval_secs);
        self
    }
}

/// Validated, immutable configuration passed to every operation
#[derive(Clone)]
pub struct Config {
    /// API token
    pub token: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// REST API base URL, without trailing slash
    pub api_url: String,
    /// Merge target
    pub base_branch: String,
    /// Merge source
    pub head_branch: String,
    /// Title for created PRs
    pub pull_request_title: String,
    /// Message for the merge commit
    pub commit_message: String,
    /// Retry merges blocked by required status checks
    pub wait_for_checks: bool,
    /// Retry budget for blocked merges
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"***")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_url", &self.api_url)
            .field("base_branch", &self.base_branch)
            .field("head_branch", &self.head_branch)
            .field("pull_request_title", &self.pull_request_title)
            .field("commit_message", &self.commit_message)
            .field("wait_for_checks", &self.wait_for_checks)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Config {
    /// Validate inputs and apply defaults
    pub fn resolve(inputs: Inputs) -> Result<Self> {
        let token = non_empty(inputs.token.as_deref())
            .ok_or_else(|| Error::Config("GITHUB_TOKEN input is required".to_string()))?
            .to_string();

        let base_branch = non_empty(inputs.base_branch.as_deref())
            .ok_or_else(|| Error::Config("BASE_BRANCH input is required".to_string()))?
            .to_string();

        let repository = non_empty(inputs.repository.as_deref()).ok_or_else(|| {
            Error::Config("repository is required (GITHUB_REPOSITORY=owner/repo)".to_string())
        })?;
        let (owner, repo) = parse_repository(repository)?;

        let head_branch = resolve_head_branch(
            inputs.head_branch.as_deref(),
            inputs.git_ref.as_deref(),
        );
        if head_branch.is_empty() {
            return Err(Error::Config(
                "HEAD_BRANCH input is empty and GITHUB_REF is not set".to_string(),
            ));
        }

        let (pull_request_title, commit_message) = resolve_messages(
            &head_branch,
            &base_branch,
            inputs.pull_request_title.as_deref(),
            inputs.commit_message.as_deref(),
        );

        let wait_for_checks = match non_empty(inputs.wait_for_checks.as_deref()) {
            Some(raw) => parse_flag(raw)?,
            None => false,
        };

        let api_url = parse_api_url(non_empty(inputs.api_url.as_deref()).unwrap_or(DEFAULT_API_URL))?;

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: inputs.max_check_attempts.unwrap_or(defaults.max_attempts),
            delay: inputs
                .check_interval_secs
                .map_or(defaults.delay, Duration::from_secs),
        };

        Ok(Self {
            token,
            owner,
            repo,
            api_url,
            base_branch,
            head_branch,
            pull_request_title,
            commit_message,
            wait_for_checks,
            retry,
        })
    }

    /// Name of the side branch that hosts unresolved conflicts
    pub fn conflicts_branch(&self) -> String {
        conflicts_branch_name(&self.head_branch)
    }

    /// Repository coordinates for the platform service
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            api_url: self.api_url.clone(),
        }
    }
}

/// `Some(s)` when `s` is present and non-empty
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Head branch: explicit input, else the triggering ref without `refs/heads/`
pub fn resolve_head_branch(head_branch: Option<&str>, git_ref: Option<&str>) -> String {
    if let Some(head) = non_empty(head_branch) {
        return head.to_string();
    }

    let git_ref = git_ref.unwrap_or_default().trim();
    git_ref
        .strip_prefix(HEADS_PREFIX)
        .unwrap_or(git_ref)
        .to_string()
}

/// PR title and commit message with their defaults applied
///
/// The title defaults to `[Bot] Automatic PR from <head> => <base>` and the
/// commit message defaults to the title.
pub fn resolve_messages(
    head: &str,
    base: &str,
    title: Option<&str>,
    commit_message: Option<&str>,
) -> (String, String) {
    let title = non_empty(title).map_or_else(|| default_title(head, base), ToString::to_string);
    let message = non_empty(commit_message).map_or_else(|| title.clone(), ToString::to_string);
    (title, message)
}

/// Templated PR title
pub fn default_title(head: &str, base: &str) -> String {
    format!("[Bot] Automatic PR from {head} => {base}")
}

/// `conflicts-<head>`
pub fn conflicts_branch_name(head: &str) -> String {
    format!("{CONFLICTS_PREFIX}{head}")
}

fn parse_repository(repository: &str) -> Result<(String, String)> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(Error::Config(format!(
            "repository must look like owner/repo, got '{repository}'"
        ))),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(Error::Config(format!(
            "WAIT_FOR_CHECKS must be a boolean, got '{other}'"
        ))),
    }
}

fn parse_api_url(raw: &str) -> Result<String> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| Error::Config(format!("invalid API URL '{raw}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "API URL must be http(s), got '{raw}'"
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
