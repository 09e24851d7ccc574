//! Command implementations for the Hookmint CLI
//!
//! Each command is organized into its own module. Shared helpers for the
//! workflow commands live here.

use anyhow::Result;

use crate::cli::Output;
use crate::error::WorkflowError;
use crate::repo::{DEFAULT_ROOT_BRANCH, RepoConfig};

pub mod commitmint;
pub mod finish;
pub mod install;
pub mod publish;
pub mod run;
pub mod start;
pub mod status;
pub mod uninstall;

/// Load a repository alias, interactively creating it when stdin is a TTY
pub(crate) fn load_or_setup_repo_config(alias: &str, output: &Output) -> Result<RepoConfig> {
    if let Some(config) = RepoConfig::load(alias) {
        return Ok(config);
    }
    if !atty::is(atty::Stream::Stdin) {
        return RepoConfig::load_required(alias);
    }

    output.info(&format!(
        "Repository alias '{}' not found. Let's set it up!",
        alias
    ));
    let url = output.prompt_required(&format!("Repository URL for '{}'", alias));
    let clone_to = output.prompt_required(&format!("Clone directory for '{}'", alias));
    let root_branch = output.prompt_default("Root branch", DEFAULT_ROOT_BRANCH);
    let jira_server = output.prompt_default("JIRA server (empty for none)", "");
    let branch_prefix = output.prompt_default("Branch prefix (empty for none)", "");

    let config = RepoConfig {
        url,
        clone_to,
        root_branch,
        jira_server: (!jira_server.is_empty()).then_some(jira_server),
        branch_prefix,
    };
    if config.save(alias) {
        output.success("Configuration saved");
    } else {
        output.warning("Failed to save configuration to git config");
    }
    Ok(config)
}

/// The JIRA server for an alias, from its config or the environment
pub(crate) fn jira_server_for(config: &RepoConfig) -> Result<String> {
    config
        .jira_server
        .clone()
        .or_else(|| std::env::var("JIRA_SERVER").ok())
        .ok_or_else(|| {
            WorkflowError::MissingCredentials(
                "no JIRA server configured; set repo.<alias>.jiraserver or JIRA_SERVER".to_string(),
            )
            .into()
        })
}
