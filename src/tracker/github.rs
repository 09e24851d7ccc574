//! GitHub Issues adapter
//!
//! Implements the [`IssueTracker`] interface over the GitHub REST API for one
//! `owner/repo`, plus pull-request creation for the finish workflow. Token
//! resolution: `GITHUB_TOKEN`, `GH_TOKEN`, then git config
//! `hookmint.github.token`.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

use super::{IssueTracker, WorkflowState, parse_github_issue};
use crate::error::WorkflowError;
use crate::git::GitConfig;

const API_BASE: &str = "https://api.github.com";

/// Label applied when an issue moves to In Progress
const IN_PROGRESS_LABEL: &str = "in-progress";

/// Authenticated GitHub client for one repository
pub struct GithubClient {
    owner: String,
    repo: String,
    token: String,
    http: reqwest::Client,
}

impl GithubClient {
    pub fn connect(owner: &str, repo: &str) -> Result<Self> {
        let token = resolve_token()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("hookmint/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            token,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}{}", API_BASE, self.owner, self.repo, path)
    }

    async fn request(&self, builder: reqwest::RequestBuilder) -> Result<Value> {
        let response = builder
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| WorkflowError::Tracker(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WorkflowError::Tracker(format!(
                "GitHub API returned {}",
                status
            ))
            .into());
        }
        Ok(response.json().await.unwrap_or(Value::Null))
    }

    fn issue_number(&self, ticket: &str) -> Result<u64> {
        parse_github_issue(ticket).ok_or_else(|| {
            WorkflowError::Tracker(format!("not a GitHub issue reference: {}", ticket)).into()
        })
    }

    /// Open a pull request, returning its html_url
    pub async fn create_pull_request(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<String> {
        let pr = self
            .request(self.http.post(self.url("/pulls")).json(&json!({
                "title": title,
                "body": body,
                "head": head,
                "base": base,
            })))
            .await?;
        pr["html_url"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WorkflowError::Tracker("pull request response had no URL".into()).into())
    }
}

#[async_trait]
impl IssueTracker for GithubClient {
    async fn fetch_summary(&self, ticket: &str) -> Result<String> {
        let number = self.issue_number(ticket)?;
        let issue = self
            .request(self.http.get(self.url(&format!("/issues/{}", number))))
            .await?;
        issue["title"].as_str().map(str::to_string).ok_or_else(|| {
            WorkflowError::Tracker(format!("issue #{} has no title", number)).into()
        })
    }

    async fn transition(&self, ticket: &str, state: WorkflowState) -> Result<()> {
        let number = self.issue_number(ticket)?;
        match state {
            WorkflowState::InProgress => {
                self.request(
                    self.http
                        .post(self.url(&format!("/issues/{}/labels", number)))
                        .json(&json!({ "labels": [IN_PROGRESS_LABEL] })),
                )
                .await?;
            }
            WorkflowState::InReview => {
                // GitHub has no review state for issues; the PR itself is the
                // review signal
                self.comment(ticket, "Opened for review").await?;
            }
            WorkflowState::Done => {
                self.request(
                    self.http
                        .patch(self.url(&format!("/issues/{}", number)))
                        .json(&json!({ "state": "closed" })),
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn comment(&self, ticket: &str, text: &str) -> Result<()> {
        let number = self.issue_number(ticket)?;
        self.request(
            self.http
                .post(self.url(&format!("/issues/{}/comments", number)))
                .json(&json!({ "body": text })),
        )
        .await?;
        Ok(())
    }
}

/// Resolve a GitHub token from environment variables or git config
fn resolve_token() -> Result<String> {
    std::env::var("GITHUB_TOKEN")
        .or_else(|_| std::env::var("GH_TOKEN"))
        .ok()
        .or_else(|| GitConfig::global().get("hookmint.github.token"))
        .ok_or_else(|| {
            WorkflowError::MissingCredentials(
                "set GITHUB_TOKEN/GH_TOKEN or hookmint.github.token git config".to_string(),
            )
            .into()
        })
}
