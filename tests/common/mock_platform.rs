//! In-memory GitHub stand-in for the flow tests
//!
//! Branches, open PRs and merge answers live in memory. Every call is
//! recorded so tests can assert what the flow mutated.

#![allow(dead_code)]

use async_trait::async_trait;
use conflict_pr::error::{Error, RemoteError, Result};
use conflict_pr::platform::PlatformService;
use conflict_pr::types::{BranchRef, PlatformConfig, PullRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Scripted answer for one `merge_branches` call
pub type MergeResponse = std::result::Result<Option<String>, String>;

/// Call record for `merge_branches`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub base: String,
    pub head: String,
    pub message: String,
}

/// Call record for `create_ref` / `update_ref`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefCall {
    pub branch: String,
    pub sha: String,
}

/// Call record for `create_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub base: String,
    pub head: String,
    pub title: String,
    pub body: String,
}

/// Build a remote error the way GitHub would report it
pub fn remote_error(status: u16, message: &str) -> Error {
    Error::Remote(RemoteError {
        status,
        message: message.to_string(),
        payload: serde_json::json!({ "message": message }).to_string(),
    })
}

/// Simple mock platform service for testing
///
/// Features:
/// - In-memory branches (name -> sha)
/// - Scripted merge responses per (base, head); the last one repeats
/// - Open PRs that `create_pull_request` appends to
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    branches: Mutex<HashMap<String, String>>,
    merge_responses: Mutex<HashMap<(String, String), VecDeque<MergeResponse>>>,
    open_prs: Mutex<Vec<PullRequest>>,
    // Call tracking
    get_branch_calls: Mutex<Vec<String>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    create_ref_calls: Mutex<Vec<RefCall>>,
    update_ref_calls: Mutex<Vec<RefCall>>,
    list_pr_calls: Mutex<Vec<(String, String)>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    // Error injection
    error_on_get_branch: Mutex<HashMap<String, String>>,
    error_on_create_ref: Mutex<Option<String>>,
    error_on_update_ref: Mutex<Option<String>>,
    error_on_list_prs: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            branches: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            open_prs: Mutex::new(Vec::new()),
            get_branch_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            create_ref_calls: Mutex::new(Vec::new()),
            update_ref_calls: Mutex::new(Vec::new()),
            list_pr_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            error_on_get_branch: Mutex::new(HashMap::new()),
            error_on_create_ref: Mutex::new(None),
            error_on_update_ref: Mutex::new(None),
            error_on_list_prs: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
        }
    }

    // === Setup methods ===

    /// Add (or move) a branch
    pub fn set_branch(&self, name: &str, sha: &str) {
        self.branches
            .lock()
            .unwrap()
            .insert(name.to_string(), sha.to_string());
    }

    /// Queue merge responses for `head` into `base`
    pub fn script_merges(&self, base: &str, head: &str, responses: Vec<MergeResponse>) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert((base.to_string(), head.to_string()), responses.into());
    }

    /// Make every merge of `head` into `base` fail with `message`
    pub fn fail_merge(&self, base: &str, head: &str, message: &str) {
        self.script_merges(base, head, vec![Err(message.to_string())]);
    }

    /// Add an already-open PR
    pub fn add_open_pr(&self, base: &str, head: &str) -> PullRequest {
        let pr = self.new_pr(base, head, "Existing PR");
        self.open_prs.lock().unwrap().push(pr.clone());
        pr
    }

    fn new_pr(&self, base: &str, head: &str, title: &str) -> PullRequest {
        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        PullRequest {
            number,
            html_url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.config.owner, self.config.repo
            ),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
        }
    }

    // === Error injection methods ===

    /// Make `get_branch` fail for `name` with a non-404 error
    pub fn fail_get_branch(&self, name: &str, msg: &str) {
        self.error_on_get_branch
            .lock()
            .unwrap()
            .insert(name.to_string(), msg.to_string());
    }

    /// Make `create_ref` return an error
    pub fn fail_create_ref(&self, msg: &str) {
        *self.error_on_create_ref.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_ref` return an error
    pub fn fail_update_ref(&self, msg: &str) {
        *self.error_on_update_ref.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_open_pull_requests` return an error
    pub fn fail_list_prs(&self, msg: &str) {
        *self.error_on_list_prs.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pull_request` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Get all branch names looked up
    pub fn get_branch_calls(&self) -> Vec<String> {
        self.get_branch_calls.lock().unwrap().clone()
    }

    /// Get all `merge_branches` calls
    pub fn get_merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Get all `create_ref` calls
    pub fn get_create_ref_calls(&self) -> Vec<RefCall> {
        self.create_ref_calls.lock().unwrap().clone()
    }

    /// Get all `update_ref` calls
    pub fn get_update_ref_calls(&self) -> Vec<RefCall> {
        self.update_ref_calls.lock().unwrap().clone()
    }

    /// Get all `list_open_pull_requests` calls as (base, head)
    pub fn get_list_pr_calls(&self) -> Vec<(String, String)> {
        self.list_pr_calls.lock().unwrap().clone()
    }

    /// Get all `create_pull_request` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Count of calls that would change remote state
    pub fn mutating_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
            + self.create_ref_calls.lock().unwrap().len()
            + self.update_ref_calls.lock().unwrap().len()
            + self.create_pr_calls.lock().unwrap().len()
    }

    /// Assert that `create_pull_request` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pull_request({head} => {base}) but got: {calls:?}"
        );
    }

    /// Assert that no conflicts branch or PR was touched
    pub fn assert_no_conflict_handling(&self) {
        assert!(self.get_create_ref_calls().is_empty());
        assert!(self.get_update_ref_calls().is_empty());
        assert!(self.get_create_pr_calls().is_empty());
    }

    fn next_merge_response(&self, base: &str, head: &str) -> MergeResponse {
        let mut responses = self.merge_responses.lock().unwrap();
        match responses.get_mut(&(base.to_string(), head.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Ok(None)),
            None => Ok(Some("merge_sha".to_string())),
        }
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_branch(&self, name: &str) -> Result<BranchRef> {
        self.get_branch_calls.lock().unwrap().push(name.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_get_branch.lock().unwrap().get(name) {
            return Err(remote_error(500, msg));
        }

        let branches = self.branches.lock().unwrap();
        branches
            .get(name)
            .map(|sha| BranchRef {
                name: name.to_string(),
                sha: sha.clone(),
            })
            .ok_or_else(|| Error::BranchNotFound(name.to_string()))
    }

    async fn merge_branches(
        &self,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<Option<String>> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            base: base.to_string(),
            head: head.to_string(),
            message: message.to_string(),
        });

        self.next_merge_response(base, head)
            .map_err(|msg| remote_error(409, &msg))
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        self.create_ref_calls.lock().unwrap().push(RefCall {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });

        // Check for injected error
        if let Some(msg) = self.error_on_create_ref.lock().unwrap().as_ref() {
            return Err(remote_error(422, msg));
        }

        self.set_branch(branch, sha);
        Ok(())
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        self.update_ref_calls.lock().unwrap().push(RefCall {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });

        // Check for injected error
        if let Some(msg) = self.error_on_update_ref.lock().unwrap().as_ref() {
            return Err(remote_error(422, msg));
        }

        self.set_branch(branch, sha);
        Ok(())
    }

    async fn list_open_pull_requests(&self, base: &str, head: &str) -> Result<Vec<PullRequest>> {
        self.list_pr_calls
            .lock()
            .unwrap()
            .push((base.to_string(), head.to_string()));

        // Check for injected error
        if let Some(msg) = self.error_on_list_prs.lock().unwrap().as_ref() {
            return Err(remote_error(500, msg));
        }

        let open = self.open_prs.lock().unwrap();
        Ok(open
            .iter()
            .filter(|pr| pr.head_ref == head)
            .cloned()
            .collect())
    }

    async fn create_pull_request(
        &self,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            base: base.to_string(),
            head: head.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        // Check for injected error
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(remote_error(422, msg));
        }

        let pr = self.new_pr(base, head, title);
        self.open_prs.lock().unwrap().push(pr.clone());
        Ok(pr)
    }
}
