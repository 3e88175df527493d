//! GitHub platform service implementation

use crate::error::{Error, RemoteError, Result};
use crate::platform::PlatformService;
use crate::types::{BranchRef, PlatformConfig, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct BranchResponse {
    name: String,
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests (merges endpoint)
    token: String,
    /// HTTP client for raw requests (merges endpoint)
    http_client: Client,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(config.api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("conflict-pr")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
        })
    }

    /// Route relative to the API root for this repository
    fn repo_route(&self, path: &str) -> String {
        format!("/repos/{}/{}/{path}", self.config.owner, self.config.repo)
    }
}

/// Percent-encode a branch name for use in a URL path
///
/// Each `/`-separated segment is encoded on its own so slashed names keep
/// their separators, while `#`, `?` and `%` stay part of the name.
fn encode_branch(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_branch(&self, name: &str) -> Result<BranchRef> {
        debug!(branch = name, "loading branch");
        let route = self.repo_route(&format!("branches/{}", encode_branch(name)));

        let branch: BranchResponse = match self.client.get(route, None::<&()>).await {
            Ok(branch) => branch,
            Err(e) => {
                return match Error::from(e) {
                    Error::Remote(remote) if remote.status == 404 => {
                        Err(Error::BranchNotFound(name.to_string()))
                    }
                    other => Err(other),
                };
            }
        };

        debug!(branch = %branch.name, sha = %branch.commit.sha, "loaded branch");
        Ok(BranchRef {
            name: branch.name,
            sha: branch.commit.sha,
        })
    }

    async fn merge_branches(
        &self,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<Option<String>> {
        debug!(base, head, "merging branches");

        // The merges endpoint answers 204 with an empty body, which octocrab
        // can't decode into a response type.
        let url = format!(
            "{}{}",
            self.config.api_url,
            self.repo_route("merges")
        );

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&serde_json::json!({
                "base": base,
                "head": head,
                "commit_message": message,
            }))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to call merges endpoint: {e}")))?;

        match response.status() {
            StatusCode::CREATED => {
                let commit: CommitRef = response
                    .json()
                    .await
                    .map_err(|e| Error::GitHubApi(format!("Failed to parse merge commit: {e}")))?;
                debug!(sha = %commit.sha, "merge commit created");
                Ok(Some(commit.sha))
            }
            StatusCode::NO_CONTENT => {
                debug!("nothing to merge");
                Ok(None)
            }
            status => {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        debug!(%status, error = %e, "failed to read merge error body");
                        String::new()
                    }
                };
                debug!(%status, "merge rejected");
                Err(Error::Remote(RemoteError::from_body(status.as_u16(), &body)))
            }
        }
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        debug!(branch, sha, "creating ref");
        let _: serde_json::Value = self
            .client
            .post(
                self.repo_route("git/refs"),
                Some(&serde_json::json!({
                    "ref": format!("refs/heads/{branch}"),
                    "sha": sha,
                })),
            )
            .await?;
        debug!(branch, "created ref");
        Ok(())
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        debug!(branch, sha, "updating ref");
        let _: serde_json::Value = self
            .client
            .patch(
                self.repo_route(&format!("git/refs/heads/{}", encode_branch(branch))),
                Some(&serde_json::json!({
                    "sha": sha,
                    "force": false,
                })),
            )
            .await?;
        debug!(branch, "updated ref");
        Ok(())
    }

    async fn list_open_pull_requests(&self, base: &str, head: &str) -> Result<Vec<PullRequest>> {
        debug!(base, head, "listing open PRs");
        let head_filter = format!("{}:{}", &self.config.owner, head);

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .base(base)
            .head(head_filter)
            .send()
            .await?;

        let result: Vec<PullRequest> = prs.items.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn create_pull_request(
        &self,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(base, head, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }
}
