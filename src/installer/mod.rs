//! Hook installer
//!
//! Writes generated dispatcher scripts into a repository's `.git/hooks`
//! directory (local install) or a user-level hooks directory wired up via
//! `core.hooksPath` (global install). Re-running without `--force` leaves
//! existing hooks untouched; with `--force`, output is byte-identical given
//! identical inputs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::Output;
use crate::dispatch::{DISPATCHER_MARKER, HOOK_TYPES, generate_dispatcher};
use crate::error::WorkflowError;
use crate::git::{self, GitConfig};
use crate::runtime::RuntimeCache;

/// Name of the user-level hooks directory for global installs
const GLOBAL_HOOKS_DIR: &str = ".git-hooks";

/// Counts reported after an install run
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: usize,
    pub skipped: usize,
}

/// Installs dispatcher hooks into a repository or globally
pub struct Installer {
    /// Directory containing the per-hook-type source directories
    source_dir: PathBuf,
    /// Target repository for local installs
    repo_path: PathBuf,
    force: bool,
    /// Hookmint executable the generated dispatchers delegate to
    bin_path: PathBuf,
}

impl Installer {
    pub fn new(source_dir: PathBuf, repo_path: PathBuf, force: bool) -> Result<Self> {
        let bin_path = std::env::current_exe().context("Failed to resolve hookmint executable")?;
        Ok(Self {
            source_dir,
            repo_path,
            force,
            bin_path,
        })
    }

    /// Override the executable path baked into generated dispatchers
    pub fn with_bin_path(mut self, bin_path: PathBuf) -> Self {
        self.bin_path = bin_path;
        self
    }

    /// Install dispatchers into the repository's `.git/hooks`
    pub fn install_local(&self, output: &Output) -> Result<InstallReport> {
        if !git::is_git_repository(&self.repo_path) {
            return Err(
                WorkflowError::NotARepository(self.repo_path.display().to_string()).into(),
            );
        }

        let hooks_dir = self.repo_path.join(".git").join("hooks");
        std::fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;

        output.info(&format!("Repository: {}", self.repo_path.display()));
        output.info(&format!("Hooks directory: {}", hooks_dir.display()));

        let cache = RuntimeCache::local(&self.repo_path);
        self.install_into(&hooks_dir, &cache, output)
    }

    /// Install dispatchers globally and point `core.hooksPath` at them
    pub fn install_global(&self, output: &Output) -> Result<InstallReport> {
        let global_hooks_dir = global_hooks_dir()?;
        std::fs::create_dir_all(&global_hooks_dir)
            .context("Failed to create global hooks directory")?;
        output.info(&format!(
            "Global hooks directory: {}",
            global_hooks_dir.display()
        ));

        let config = GitConfig::global();
        if !config.set("core.hooksPath", &global_hooks_dir.display().to_string()) {
            anyhow::bail!("Failed to configure core.hooksPath");
        }
        output.success("Configured Git to use global hooks directory");

        let cache = RuntimeCache::global();
        self.install_into(&global_hooks_dir, &cache, output)
    }

    fn install_into(
        &self,
        hooks_dir: &Path,
        cache: &RuntimeCache,
        output: &Output,
    ) -> Result<InstallReport> {
        let runtimes = cache.resolve_all();
        let mut report = InstallReport::default();

        for hook_type in HOOK_TYPES {
            let source_dir = self.source_dir.join(hook_type);
            if !source_dir.is_dir() {
                continue;
            }

            let hook_file = hooks_dir.join(hook_type);
            if hook_file.exists() && !self.force {
                output.warning(&format!("Hook already exists (skipping): {}", hook_type));
                report.skipped += 1;
                continue;
            }

            let script = generate_dispatcher(hook_type, &source_dir, &self.bin_path, &runtimes);
            std::fs::write(&hook_file, script)
                .with_context(|| format!("Failed to write hook: {}", hook_file.display()))?;
            make_executable(&hook_file)?;

            output.success(&format!("Installed: {}", hook_type));
            report.installed += 1;
        }

        output.info(&format!("Installed {} hook(s)", report.installed));
        Ok(report)
    }

    /// Remove generated dispatchers from the repository's `.git/hooks`
    ///
    /// Only files carrying the generated marker are touched; hand-written
    /// hooks stay in place.
    pub fn uninstall_local(&self, output: &Output) -> Result<usize> {
        if !git::is_git_repository(&self.repo_path) {
            return Err(
                WorkflowError::NotARepository(self.repo_path.display().to_string()).into(),
            );
        }
        let hooks_dir = self.repo_path.join(".git").join("hooks");
        let mut removed = 0;
        for hook_type in HOOK_TYPES {
            let hook_file = hooks_dir.join(hook_type);
            if !hook_file.is_file() {
                continue;
            }
            let content = std::fs::read_to_string(&hook_file).unwrap_or_default();
            if content.contains(DISPATCHER_MARKER) {
                std::fs::remove_file(&hook_file)
                    .with_context(|| format!("Failed to remove hook: {}", hook_file.display()))?;
                output.success(&format!("Removed: {}", hook_type));
                removed += 1;
            }
        }
        output.info(&format!("Removed {} hook(s)", removed));
        Ok(removed)
    }
}

/// The user-level hooks directory (`~/.git-hooks`)
pub fn global_hooks_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to resolve home directory")?;
    Ok(home.join(GLOBAL_HOOKS_DIR))
}

fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)
            .context("Failed to get hook file metadata")?
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).context("Failed to set hook file permissions")?;
    }
    Ok(())
}
