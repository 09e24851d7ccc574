//! Finish command
//!
//! Create a pull request for a ticket: push the branch, transition the issue
//! to review, and open the PR on GitHub.

use anyhow::Result;

use super::{jira_server_for, load_or_setup_repo_config};
use crate::cli::Output;
use crate::error::WorkflowError;
use crate::git::operations;
use crate::repo;
use crate::tracker::{GithubClient, IssueTracker, JiraClient, WorkflowState};

pub async fn execute(repo_alias: &str, ticket: &str, output: &Output) -> Result<()> {
    let ticket = ticket.to_uppercase();
    output.header(&format!(
        "Creating pull request for {} in {} repository",
        ticket, repo_alias
    ));

    let config = load_or_setup_repo_config(repo_alias, output)?;
    let jira_server = jira_server_for(&config)?;
    let jira = JiraClient::connect(&jira_server)?;
    let summary = jira.fetch_summary(&ticket).await?;
    output.success(&format!("Found ticket: {} - {}", ticket, summary));

    let branch_name = repo::create_branch_name(&ticket, &summary, &config.branch_prefix);
    let repo_path = config.locate_branch_dir(&branch_name)?;

    let current_branch =
        operations::get_current_branch(&repo_path).ok_or(WorkflowError::NoCurrentBranch)?;
    if !current_branch.contains(branch_name.as_str()) {
        output.warning(&format!(
            "Current branch '{}' doesn't match expected '{}'",
            current_branch, branch_name
        ));
    }
    output.step("Pushing latest changes");
    operations::push_latest_changes(&repo_path, &current_branch)?;

    if let Err(e) = jira.transition(&ticket, WorkflowState::InReview).await {
        output.warning(&format!("Failed to transition ticket to review: {}", e));
    }

    output.step("Creating pull request");
    let (owner, repo_name) = repo::get_repo_from_url(&config.url)?;
    let github = GithubClient::connect(&owner, &repo_name)?;
    let commits = repo::commits_since_root(&repo_path, &config.root_branch);
    let pr_title = format!("{}: {}", ticket, summary);
    let pr_body = repo::build_pr_body(&ticket, &jira_server, &summary, &commits);
    let pr_url = github
        .create_pull_request(&pr_title, &pr_body, &current_branch, &config.root_branch)
        .await?;

    output.success(&format!("Success! Pull request created for {}", ticket));
    output.key_value("PR URL:", &pr_url);
    output.key_value("JIRA:", &format!("{}/browse/{}", jira_server, ticket));
    Ok(())
}
