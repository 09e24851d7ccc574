//! Publish command
//!
//! Publish finished work: transition the issue to Done, fast-forward the
//! root branch, and delete the work branch locally and remotely. The tracker
//! (JIRA or GitHub) is detected from the branch name.

use anyhow::Result;

use super::{jira_server_for, load_or_setup_repo_config};
use crate::cli::Output;
use crate::error::WorkflowError;
use crate::git::operations;
use crate::repo::{self, RepoConfig};
use crate::tracker::{
    GithubClient, IssueTracker, JiraClient, TrackerKind, WorkflowState, detect_tracker,
    parse_github_issue,
};

pub async fn execute(repo_alias: &str, output: &Output) -> Result<()> {
    output.header(&format!("Publishing changes for {} repository", repo_alias));

    let config = load_or_setup_repo_config(repo_alias, output)?;
    let repo_path = config.find_latest_clone()?;
    output.info(&format!("Using repository: {}", repo_path.display()));

    let current_branch =
        operations::get_current_branch(&repo_path).ok_or(WorkflowError::NoCurrentBranch)?;

    let issue_ref = transition_done(&current_branch, &config, output).await?;

    output.step(&format!("Updating {} branch", config.root_branch));
    if let Err(e) = operations::update_root_branch(&repo_path, &config.root_branch) {
        output.error(&format!("Failed to update {}: {}", config.root_branch, e));
    }

    if !operations::delete_local_branch(&repo_path, &current_branch) {
        output.warning("Could not delete local branch (may have unmerged changes)");
    }
    if !operations::delete_remote_branch(&repo_path, &current_branch) {
        output.warning("Could not delete remote branch");
    }

    output.success(&format!("Success! Changes published for {}", issue_ref));
    output.key_value("Branch cleaned up:", &current_branch);
    Ok(())
}

/// Move the branch's issue to Done on whichever tracker the branch names
async fn transition_done(
    branch: &str,
    config: &RepoConfig,
    output: &Output,
) -> Result<String> {
    match detect_tracker(branch) {
        TrackerKind::Jira => {
            let ticket = repo::extract_ticket_from_branch(branch)
                .ok_or_else(|| WorkflowError::NoTicketInBranch(branch.to_string()))?;
            output.info(&format!("JIRA Ticket: {}", ticket));
            let jira_server = jira_server_for(config)?;
            match JiraClient::connect(&jira_server) {
                Ok(jira) => {
                    if let Err(e) = jira.transition(&ticket, WorkflowState::Done).await {
                        output.warning(&format!("Failed to transition ticket to done: {}", e));
                    }
                }
                Err(e) => output.warning(&format!("Skipping JIRA transition: {}", e)),
            }
            output.key_value("JIRA:", &format!("{}/browse/{}", jira_server, ticket));
            Ok(ticket)
        }
        TrackerKind::Github => {
            let number = parse_github_issue(branch)
                .ok_or_else(|| WorkflowError::NoTicketInBranch(branch.to_string()))?;
            let issue_ref = format!("#{}", number);
            output.info(&format!("GitHub Issue: {}", issue_ref));
            let (owner, repo_name) = repo::get_repo_from_url(&config.url)?;
            match GithubClient::connect(&owner, &repo_name) {
                Ok(github) => {
                    if let Err(e) = github.transition(&issue_ref, WorkflowState::Done).await {
                        output.warning(&format!("Failed to close issue: {}", e));
                    }
                }
                Err(e) => output.warning(&format!("Skipping GitHub transition: {}", e)),
            }
            Ok(issue_ref)
        }
        TrackerKind::Unknown => {
            Err(WorkflowError::NoTicketInBranch(branch.to_string()).into())
        }
    }
}
