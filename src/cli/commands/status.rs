//! Status command
//!
//! Shows workflow status for the most recent clone under an alias: current
//! branch, modified files, the associated ticket, and commits since the root
//! branch, plus a hint at the next workflow step. `--format json` emits the
//! same data as a machine-readable report.

use anyhow::Result;
use serde::Serialize;

use super::{jira_server_for, load_or_setup_repo_config};
use crate::cli::Output;
use crate::error::WorkflowError;
use crate::git::operations;
use crate::repo;
use crate::tracker::{IssueTracker, JiraClient};

/// Machine-readable form of the status output
#[derive(Serialize)]
struct StatusReport {
    repository: String,
    branch: String,
    modified_files: usize,
    ticket: Option<String>,
    summary: Option<String>,
    commits_since_root: Vec<String>,
}

pub async fn execute(repo_alias: &str, format: &str, output: &Output) -> Result<()> {
    let config = load_or_setup_repo_config(repo_alias, output)?;
    let repo_path = config.find_latest_clone()?;
    let current_branch =
        operations::get_current_branch(&repo_path).ok_or(WorkflowError::NoCurrentBranch)?;
    let modified_count = operations::count_modified_files(&repo_path);
    let ticket = repo::extract_ticket_from_branch(&current_branch);

    // Summary lookup is best-effort; status must work offline
    let mut summary = None;
    if let Some(ticket) = &ticket {
        if let Ok(jira_server) = jira_server_for(&config) {
            match JiraClient::connect(&jira_server) {
                Ok(jira) => match jira.fetch_summary(ticket).await {
                    Ok(s) => summary = Some(s),
                    Err(e) => output.verbose(&format!("Could not fetch summary: {}", e)),
                },
                Err(e) => output.verbose(&format!("Skipping JIRA lookup: {}", e)),
            }
        }
    }

    let commits = repo::commits_since_root(&repo_path, &config.root_branch);

    if format == "json" {
        let report = StatusReport {
            repository: repo_path.display().to_string(),
            branch: current_branch,
            modified_files: modified_count,
            ticket,
            summary,
            commits_since_root: commits,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output.header(&format!("Workflow Status for {}", repo_alias));
    output.key_value("Repository:", &repo_path.display().to_string());
    output.key_value("Branch:", &current_branch);
    output.key_value("Modified files:", &modified_count.to_string());
    if let Some(ticket) = &ticket {
        output.key_value("Ticket:", ticket);
    }
    if let Some(summary) = &summary {
        output.key_value("Summary:", summary);
    }

    if commits.is_empty() {
        output.info("No commits since root branch");
    } else {
        output.info(&format!("Commits since {}:", config.root_branch));
        for commit in &commits {
            output.list_item(commit);
        }
    }

    output.blank_line();
    if modified_count > 0 {
        output.step("Next: commit your changes");
    } else if commits.is_empty() {
        output.step("Next: start making changes");
    } else {
        output.step(&format!("Next: hookmint finish {} <ticket>", repo_alias));
    }
    Ok(())
}
