//! Commitmint command - interactive commit message correction
//!
//! Reads the latest commit message, walks it through the correction stages
//! with per-stage confirmation, validates the result, and amends the commit
//! on final confirmation. Without a TTY (or with `--yes`) every proposal is
//! accepted and the amend happens unprompted.

use anyhow::Result;

use crate::cli::Output;
use crate::commitmint::{
    CommitValidator, add_footer_if_breaking_change, ensure_ticket_in_header, fix_duplicate_scope,
    patterns, suggest_type_header,
};
use crate::git::{GitOperations, operations};
use crate::repo;

pub async fn execute(repo_alias: &str, ticket: &str, yes: bool, output: &Output) -> Result<()> {
    let git = GitOperations::discover()?;
    let repo_path = git
        .workdir()
        .ok_or_else(|| crate::error::WorkflowError::NotARepository("bare repository".into()))?
        .to_path_buf();
    let auto_accept = yes || !atty::is(atty::Stream::Stdin);

    // Resolve ticket: argument first, branch name second
    let current_branch = git.current_branch().ok();
    let inferred = current_branch
        .as_deref()
        .and_then(repo::extract_ticket_from_branch);
    let ticket = if ticket.trim().is_empty() {
        match inferred {
            Some(t) => t,
            None => {
                return Err(crate::error::WorkflowError::NoTicketInBranch(
                    current_branch.unwrap_or_default(),
                )
                .into());
            }
        }
    } else {
        ticket.trim().to_string()
    };

    // Prefer the current branch; otherwise fall back to the alias convention
    let branch_name = match &current_branch {
        Some(branch) => branch.clone(),
        None => format!("{}_{}", ticket.to_uppercase(), repo_alias),
    };
    output.info(&format!("Using branch: {}", branch_name));

    if current_branch.as_deref() != Some(branch_name.as_str()) {
        operations::checkout(&repo_path, &branch_name)?;
    }

    let original_msg = operations::last_commit_message(&repo_path)?;
    let is_breaking = patterns::is_breaking_change(&original_msg);
    let mut current_msg = original_msg.clone();

    // Stage 0: conventional type suggestion
    if !patterns::has_conventional_type(&current_msg) {
        let suggested = suggest_type_header(&current_msg);
        if suggested != current_msg
            && propose(output, auto_accept, "Conventional type suggestion", &current_msg, &suggested)
        {
            current_msg = suggested;
        }
    }

    // Stage 1: duplicate scope
    let proposed = fix_duplicate_scope(&current_msg);
    if proposed != current_msg
        && propose(output, auto_accept, "Duplicate scope detected", &current_msg, &proposed)
    {
        current_msg = proposed;
    }

    // Stage 2: ticket placement
    let proposed = ensure_ticket_in_header(&current_msg, &ticket);
    if proposed != current_msg
        && propose(output, auto_accept, "Ticket placement", &current_msg, &proposed)
    {
        current_msg = proposed;
    }

    // Breaking changes get the Smart Commit footer; detected on the original
    // message so earlier stages cannot mask the marker
    let mut final_msg = if is_breaking {
        add_footer_if_breaking_change(&current_msg, &ticket)
    } else {
        current_msg
    };

    // Validation: commitlint when available, built-in rules otherwise
    let mut validator = CommitValidator::new();
    let (ok, errors) = validator.validate(&final_msg);
    if !ok {
        output.blank_line();
        output.warning("Validation found issues:");
        for err in &errors {
            output.list_item(err);
        }
        if !auto_accept {
            final_msg = output.prompt_default("Edit the message to fix issues", &final_msg);
        }
    }

    output.blank_line();
    output.info(&format!("Final commit message:\n{}", final_msg));

    if final_msg == original_msg {
        output.info("Message already in shape; nothing to amend");
        return Ok(());
    }

    if auto_accept || output.confirm("Amend commit with this message?") {
        operations::amend_commit_message(&repo_path, &final_msg)?;
        output.success("Commit amended");
    } else {
        output.info("No changes made");
    }
    Ok(())
}

/// Show a proposed change and ask for confirmation (auto-accepted in
/// non-interactive mode)
fn propose(output: &Output, auto_accept: bool, title: &str, current: &str, proposed: &str) -> bool {
    output.blank_line();
    output.step(title);
    output.key_value("Current:", current);
    output.key_value("Proposed:", proposed);
    auto_accept || output.confirm("Apply proposed fix?")
}
