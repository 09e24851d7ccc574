//! Issue tracker integration
//!
//! The workflow core only needs three operations from a tracker: fetch an
//! issue summary, transition an issue through workflow states, and comment.
//! [`IssueTracker`] is that narrow interface; [`jira`] and [`github`] are the
//! concrete adapters. Which tracker a branch belongs to is detected from its
//! naming pattern.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;

pub mod github;
pub mod jira;

pub use github::GithubClient;
pub use jira::JiraClient;

/// Workflow states an issue moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    InProgress,
    InReview,
    Done,
}

impl WorkflowState {
    /// Transition-name keywords, searched in order against the tracker's
    /// available transitions
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            WorkflowState::InProgress => &["in progress", "development"],
            WorkflowState::InReview => &[
                "under review",
                "code review",
                "peer review",
                "in review",
                "review",
            ],
            WorkflowState::Done => &["done", "completed", "closed", "resolve"],
        }
    }
}

/// The operations the workflow commands need from any tracker
#[async_trait]
pub trait IssueTracker {
    /// Fetch the one-line summary/title of an issue
    async fn fetch_summary(&self, ticket: &str) -> Result<String>;

    /// Move an issue to the given workflow state
    async fn transition(&self, ticket: &str, state: WorkflowState) -> Result<()>;

    /// Add a comment to an issue
    async fn comment(&self, ticket: &str, text: &str) -> Result<()>;
}

/// Which tracker a branch or issue reference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Jira,
    Github,
    Unknown,
}

/// Detect the tracker from a branch name
///
/// JIRA branches carry a `PROJ-123` ticket; GitHub branches use `issue-123`,
/// `gh-123`, `#123`, or a leading issue number (`123-description`).
pub fn detect_tracker(branch_name: &str) -> TrackerKind {
    // JIRA pattern first: it is the more specific of the two
    if Regex::new(r"[A-Z]+-\d+").unwrap().is_match(branch_name) {
        return TrackerKind::Jira;
    }
    if Regex::new(r"(?i)(?:issue|gh|#)-?\d+")
        .unwrap()
        .is_match(branch_name)
    {
        return TrackerKind::Github;
    }
    if Regex::new(r"^\d+-").unwrap().is_match(branch_name) {
        return TrackerKind::Github;
    }
    TrackerKind::Unknown
}

/// Parse a GitHub issue number from a branch name or issue reference
pub fn parse_github_issue(reference: &str) -> Option<u64> {
    if let Some(caps) = Regex::new(r"(?i)(?:issue|gh|#)-?(\d+)")
        .unwrap()
        .captures(reference)
    {
        return caps[1].parse().ok();
    }
    if let Some(caps) = Regex::new(r"^(\d+)(?:-|$)").unwrap().captures(reference) {
        return caps[1].parse().ok();
    }
    None
}
