//! JIRA adapter
//!
//! Thin REST v2 client implementing the [`IssueTracker`] interface.
//! Credentials come from the environment (`JIRA_USERNAME`/`JIRA_TOKEN`) or
//! from git config (`hookmint.jira.username`/`hookmint.jira.token`); there is
//! no interactive credential prompt here, missing credentials are a workflow
//! error.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

use super::{IssueTracker, WorkflowState};
use crate::error::WorkflowError;
use crate::git::GitConfig;

/// Authenticated JIRA REST client for one server
pub struct JiraClient {
    server: String,
    username: String,
    token: String,
    http: reqwest::Client,
}

impl JiraClient {
    /// Connect to a JIRA server, resolving credentials from env or git config
    pub fn connect(server: &str) -> Result<Self> {
        let (username, token) = resolve_credentials()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("hookmint/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            server: server.trim_end_matches('/').to_string(),
            username,
            token,
            http,
        })
    }

    fn issue_url(&self, ticket: &str, suffix: &str) -> String {
        format!("{}/rest/api/2/issue/{}{}", self.server, ticket, suffix)
    }

    async fn get(&self, url: &str) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.token))
            .send()
            .await
            .map_err(|e| WorkflowError::Tracker(e.to_string()))?;
        if !response.status().is_success() {
            return Err(WorkflowError::Tracker(format!(
                "GET {} returned {}",
                url,
                response.status()
            ))
            .into());
        }
        Ok(response
            .json()
            .await
            .map_err(|e| WorkflowError::Tracker(e.to_string()))?)
    }

    async fn post(&self, url: &str, body: Value) -> Result<()> {
        let response = self
            .http
            .post(url)
            .basic_auth(&self.username, Some(&self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| WorkflowError::Tracker(e.to_string()))?;
        if !response.status().is_success() {
            return Err(WorkflowError::Tracker(format!(
                "POST {} returned {}",
                url,
                response.status()
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn fetch_summary(&self, ticket: &str) -> Result<String> {
        let issue = self
            .get(&self.issue_url(ticket, "?fields=summary"))
            .await?;
        issue["fields"]["summary"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                WorkflowError::Tracker(format!("issue {} has no summary field", ticket)).into()
            })
    }

    async fn transition(&self, ticket: &str, state: WorkflowState) -> Result<()> {
        let transitions = self.get(&self.issue_url(ticket, "/transitions")).await?;
        let available = transitions["transitions"].as_array().cloned().unwrap_or_default();

        // Keywords are ordered by preference; first match wins
        let mut transition_id = None;
        'outer: for keyword in state.keywords() {
            for t in &available {
                let name = t["name"].as_str().unwrap_or_default().to_lowercase();
                if name.contains(keyword) {
                    transition_id = t["id"].as_str().map(str::to_string);
                    break 'outer;
                }
            }
        }

        let Some(id) = transition_id else {
            return Err(WorkflowError::Tracker(format!(
                "no transition matching {:?} available for {}",
                state.keywords(),
                ticket
            ))
            .into());
        };

        self.post(
            &self.issue_url(ticket, "/transitions"),
            json!({ "transition": { "id": id } }),
        )
        .await
    }

    async fn comment(&self, ticket: &str, text: &str) -> Result<()> {
        self.post(&self.issue_url(ticket, "/comment"), json!({ "body": text }))
            .await
    }
}

/// Resolve JIRA credentials from environment variables or git config
fn resolve_credentials() -> Result<(String, String)> {
    let config = GitConfig::global();
    let username = std::env::var("JIRA_USERNAME")
        .ok()
        .or_else(|| config.get("hookmint.jira.username"));
    let token = std::env::var("JIRA_TOKEN")
        .ok()
        .or_else(|| config.get("hookmint.jira.token"));
    match (username, token) {
        (Some(username), Some(token)) => Ok((username, token)),
        _ => Err(WorkflowError::MissingCredentials(
            "set JIRA_USERNAME/JIRA_TOKEN or hookmint.jira.* git config".to_string(),
        )
        .into()),
    }
}
