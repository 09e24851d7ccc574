//! Install command
//!
//! Writes dispatcher hooks into a repository's `.git/hooks` or, with
//! `--global`, into `~/.git-hooks` with `core.hooksPath` pointed at it.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Output;
use crate::installer::Installer;
use crate::runtime::RuntimeCache;

pub async fn execute(
    repo_path: Option<PathBuf>,
    source_dir: Option<PathBuf>,
    global: bool,
    force: bool,
    force_detect: bool,
    output: &Output,
) -> Result<()> {
    let repo_path = match repo_path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let source_dir = match source_dir {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    if force_detect {
        let cache = if global {
            RuntimeCache::global()
        } else {
            RuntimeCache::local(&repo_path)
        };
        cache.invalidate();
        output.info("Invalidated runtime cache - will re-detect bash, python, node");
    }

    output.header("Installing Git Hooks");
    let installer = Installer::new(source_dir, repo_path, force)?;
    let report = if global {
        installer.install_global(output)?
    } else {
        installer.install_local(output)?
    };

    if report.skipped > 0 {
        output.info("Re-run with --force to overwrite existing hooks");
    }
    output.success("Installation complete");
    Ok(())
}
