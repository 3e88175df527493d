//! Error types for conflict-pr

use serde::Deserialize;
use thiserror::Error;

/// Message GitHub returns from the merges endpoint when the branches conflict
pub const MERGE_CONFLICT_MESSAGE: &str = "Merge Conflict";

/// Marker for merges blocked by required status checks
pub const REQUIRED_STATUS_MARKER: &str = "Required status";

/// Marker GitHub uses when a PR for the same head/base is already open
pub const DUPLICATE_PR_MARKER: &str = "pull request already exists";

/// Marker GitHub uses when base already contains every commit of head
pub const NO_COMMITS_MARKER: &str = "No commits between";

/// Errors produced while reconciling branches and pull requests
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Branch lookup returned 404
    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    /// GitHub answered with an error payload
    #[error("{0}")]
    Remote(RemoteError),

    /// Failure talking to GitHub (transport, client setup, decoding)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// An error response from the GitHub API
///
/// `message` is the top-level message followed by any nested
/// `errors[].message` entries, so validation failures such as
/// "A pull request already exists" stay visible to substring checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status code
    pub status: u16,
    /// Human readable message
    pub message: String,
    /// Raw response payload, kept for operator logs
    pub payload: String,
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

impl RemoteError {
    /// Build from a status code and a raw GitHub error body
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body).map_or_else(
            |_| format!("HTTP {status}"),
            |parsed| {
                compose_message(
                    parsed.message.as_deref().unwrap_or_default(),
                    &parsed.errors,
                    status,
                )
            },
        );

        Self {
            status,
            message,
            payload: body.to_string(),
        }
    }
}

/// Join a top-level message with nested validation messages
fn compose_message(message: &str, errors: &[serde_json::Value], status: u16) -> String {
    let nested: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(serde_json::Value::as_str))
        .collect();

    match (message.is_empty(), nested.is_empty()) {
        (true, true) => format!("HTTP {status}"),
        (false, true) => message.to_string(),
        (true, false) => nested.join(", "),
        (false, false) => format!("{message}: {}", nested.join(", ")),
    }
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => {
                let errors = source.errors.clone().unwrap_or_default();
                let status = source.status_code.as_u16();
                let payload = serde_json::json!({
                    "message": source.message,
                    "errors": errors,
                    "documentation_url": source.documentation_url,
                })
                .to_string();
                Self::Remote(RemoteError {
                    status,
                    message: compose_message(&source.message, &errors, status),
                    payload,
                })
            }
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

/// Classification of failures that drives the control flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Branch lookup failed
    NotFound,
    /// Merge reported the literal conflict marker
    MergeConflict,
    /// Merge blocked by pending required status checks (retryable)
    ChecksPending,
    /// A PR for the same head/base is already open (idempotent no-op)
    DuplicatePullRequest,
    /// Base already contains head (idempotent no-op)
    NoCommitsBetween,
    /// Anything else
    Unknown,
}

impl ErrorKind {
    /// Classify a raw remote message
    pub fn from_message(message: &str) -> Self {
        if message == MERGE_CONFLICT_MESSAGE {
            Self::MergeConflict
        } else if message.contains(REQUIRED_STATUS_MARKER) {
            Self::ChecksPending
        } else if message.contains(DUPLICATE_PR_MARKER) {
            Self::DuplicatePullRequest
        } else if message.contains(NO_COMMITS_MARKER) {
            Self::NoCommitsBetween
        } else {
            Self::Unknown
        }
    }

    /// Whether the top-level policy treats this kind as a successful run
    pub const fn is_benign(self) -> bool {
        matches!(self, Self::DuplicatePullRequest | Self::NoCommitsBetween)
    }
}

impl Error {
    /// Message used for classification and operator output
    ///
    /// For remote errors this is GitHub's message without any prefix, so
    /// exact comparisons like `"Merge Conflict"` work.
    pub fn message(&self) -> String {
        match self {
            Self::Remote(remote) => remote.message.clone(),
            other => other.to_string(),
        }
    }

    /// Raw payload for debug logging, if the error came from the API
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Remote(remote) => Some(&remote.payload),
            _ => None,
        }
    }

    /// Taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BranchNotFound(_) => ErrorKind::NotFound,
            other => ErrorKind::from_message(&other.message()),
        }
    }
}
