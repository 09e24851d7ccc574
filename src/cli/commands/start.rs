//! Start command
//!
//! Start work on an issue: fetch its summary, create and push a branch, and
//! transition the issue to In Progress. Supports JIRA tickets (PROJ-123) and
//! GitHub issues (#123 or a bare number); the kind is detected from the
//! reference format.

use anyhow::Result;

use super::{jira_server_for, load_or_setup_repo_config};
use crate::cli::Output;
use crate::git::operations;
use crate::repo::{self, RepoConfig};
use crate::tracker::{GithubClient, IssueTracker, JiraClient, WorkflowState, parse_github_issue};

const PUSH_MAX_RETRIES: u32 = 3;

pub async fn execute(repo_alias: &str, issue: &str, output: &Output) -> Result<()> {
    let config = load_or_setup_repo_config(repo_alias, output)?;

    let is_github_issue =
        issue.starts_with('#') || (!issue.is_empty() && issue.chars().all(|c| c.is_ascii_digit()));
    if is_github_issue {
        start_github(repo_alias, issue, &config, output).await
    } else {
        start_jira(repo_alias, issue, &config, output).await
    }
}

async fn start_jira(
    repo_alias: &str,
    ticket: &str,
    config: &RepoConfig,
    output: &Output,
) -> Result<()> {
    let ticket = ticket.to_uppercase();
    output.header(&format!(
        "Starting work on {} in {} repository",
        ticket, repo_alias
    ));

    let jira_server = jira_server_for(config)?;
    let jira = JiraClient::connect(&jira_server)?;
    let summary = jira.fetch_summary(&ticket).await?;
    output.success(&format!("Found ticket: {} - {}", ticket, summary));

    let branch_name = repo::create_branch_name(&ticket, &summary, &config.branch_prefix);
    output.info(&format!("Branch name: {}", branch_name));

    let repo_path = clone_and_push(config, &branch_name, output)?;

    if let Err(e) = transition_with_comment(&jira, &ticket, &branch_name).await {
        output.warning(&format!("Branch created but failed to transition issue: {}", e));
    }

    output.success(&format!("Success! You're ready to work on {}", ticket));
    output.key_value("Repository:", &repo_path.display().to_string());
    output.key_value("Branch:", &branch_name);
    output.key_value("JIRA:", &format!("{}/browse/{}", jira_server, ticket));
    Ok(())
}

async fn start_github(
    repo_alias: &str,
    issue: &str,
    config: &RepoConfig,
    output: &Output,
) -> Result<()> {
    let issue_number = parse_github_issue(issue).unwrap_or_default();
    output.header(&format!(
        "Starting work on GitHub issue #{} in {} repository",
        issue_number, repo_alias
    ));

    let (owner, repo_name) = repo::get_repo_from_url(&config.url)?;
    let github = GithubClient::connect(&owner, &repo_name)?;
    let issue_ref = format!("#{}", issue_number);
    let title = github.fetch_summary(&issue_ref).await?;
    output.success(&format!("Issue title: {}", title));

    let slug = repo::format_summary_for_branch(&title, 50).replace('_', "-");
    let base = format!("issue-{}-{}", issue_number, slug);
    let branch_name = if config.branch_prefix.is_empty() {
        base
    } else {
        format!("{}{}", config.branch_prefix, base)
    };
    output.info(&format!("Branch name: {}", branch_name));

    let repo_path = clone_and_push(config, &branch_name, output)?;

    let transitioned = async {
        github.transition(&issue_ref, WorkflowState::InProgress).await?;
        github
            .comment(&issue_ref, &format!("Work started on branch `{}`", branch_name))
            .await
    }
    .await;
    if let Err(e) = transitioned {
        output.warning(&format!("Branch created but failed to transition issue: {}", e));
    }

    output.success(&format!("Success! You're ready to work on #{}", issue_number));
    output.key_value("Repository:", &repo_path.display().to_string());
    output.key_value("Branch:", &branch_name);
    output.key_value(
        "GitHub Issue:",
        &format!("https://github.com/{}/{}/issues/{}", owner, repo_name, issue_number),
    );
    Ok(())
}

/// Clone or update the working copy, then create and push the branch
fn clone_and_push(
    config: &RepoConfig,
    branch_name: &str,
    output: &Output,
) -> Result<std::path::PathBuf> {
    output.step("Preparing working copy");
    let repo_path = operations::clone_or_update_repo(
        &config.url,
        &config.clone_to,
        &config.root_branch,
        branch_name,
    )?;
    output.step("Creating and pushing branch");
    operations::create_and_push_branch(&repo_path, branch_name, &config.root_branch, PUSH_MAX_RETRIES)?;
    Ok(repo_path)
}

async fn transition_with_comment(
    jira: &JiraClient,
    ticket: &str,
    branch_name: &str,
) -> Result<()> {
    jira.transition(ticket, WorkflowState::InProgress).await?;
    jira.comment(ticket, &format!("Work started on branch {}", branch_name))
        .await
}
