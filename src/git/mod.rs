//! Git integration layer
//!
//! Repository discovery and read-only queries use git2; everything that
//! mutates repository state or talks to a remote goes through the subprocess
//! wrappers in [`operations`], and configuration access lives in [`config`].

use anyhow::{Context, Result};
use git2::Repository;
use std::path::Path;

pub mod config;
pub mod operations;

pub use config::{ConfigScope, GitConfig};

/// Handle to a discovered repository
pub struct GitOperations {
    repo: Repository,
}

impl GitOperations {
    /// Discover and open a Git repository from the current directory
    pub fn discover() -> Result<Self> {
        let repo = Repository::discover(".").context("No Git repository found")?;
        Ok(Self { repo })
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;
        let branch_name = head.shorthand().context("Failed to get branch name")?;
        Ok(branch_name.to_string())
    }

    /// Get working directory path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }
}

/// Check if a path is a git repository (has `.git` metadata)
pub fn is_git_repository<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().join(".git").exists()
}
