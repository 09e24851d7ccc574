//! Workflow error types
//!
//! Workflow errors abort the current command with a non-zero exit and a
//! single-line message. Environment problems (missing optional tools) are
//! deliberately not represented here; those degrade to warnings.

use thiserror::Error;

/// Errors that abort a workflow command
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A git invocation exited non-zero
    #[error("git command failed: {0}")]
    GitCommand(String),

    /// Target path is not a git repository
    #[error("not a Git repository: {0}")]
    NotARepository(String),

    /// HEAD could not be resolved to a branch
    #[error("failed to resolve current branch")]
    NoCurrentBranch,

    /// Branch name carries no recognizable issue reference
    #[error("no issue ticket found in branch name: {0}")]
    NoTicketInBranch(String),

    /// Repository alias has no configuration
    #[error("repository alias '{0}' is not configured; set repo.{0}.url and repo.{0}.cloneto in git config")]
    UnknownAlias(String),

    /// Tracker credentials could not be resolved
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Issue tracker API call failed
    #[error("issue tracker request failed: {0}")]
    Tracker(String),

    /// Push did not succeed within the retry budget
    #[error("failed to push branch '{0}' after retries")]
    PushFailed(String),
}
