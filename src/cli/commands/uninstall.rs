//! Uninstall command
//!
//! Removes generated dispatcher hooks from a repository. Hand-written hooks
//! (anything without the generated marker) are left alone.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Output;
use crate::installer::Installer;

pub async fn execute(repo_path: Option<PathBuf>, output: &Output) -> Result<()> {
    let repo_path = match repo_path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    output.header("Removing Git Hooks");
    let installer = Installer::new(std::env::current_dir()?, repo_path, false)?;
    installer.uninstall_local(output)?;
    Ok(())
}
