//! Git config helpers
//!
//! Scoped read/write access to git configuration via list-form `git config`
//! invocations. This is the storage backing both the runtime-path cache and
//! the repository alias registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Config scope for reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Local,
    Global,
}

/// Scoped accessor for git configuration values
pub struct GitConfig {
    scope: ConfigScope,
    repo_path: Option<PathBuf>,
}

impl GitConfig {
    /// Local-scope config for the repository at `repo_path`
    pub fn local(repo_path: &Path) -> Self {
        Self {
            scope: ConfigScope::Local,
            repo_path: Some(repo_path.to_path_buf()),
        }
    }

    /// Global (user-level) config
    pub fn global() -> Self {
        Self {
            scope: ConfigScope::Global,
            repo_path: None,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("config");
        match self.scope {
            ConfigScope::Local => {
                cmd.arg("--local");
            }
            ConfigScope::Global => {
                cmd.arg("--global");
            }
        }
        if let Some(path) = &self.repo_path {
            cmd.current_dir(path);
        }
        cmd
    }

    /// Read a single config value, None when unset
    pub fn get(&self, key: &str) -> Option<String> {
        let output = self.command().args(["--get", key]).output().ok()?;
        if output.status.success() {
            Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            None
        }
    }

    /// Write a config value; failures are non-fatal and reported to the caller
    pub fn set(&self, key: &str, value: &str) -> bool {
        self.command()
            .args([key, value])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Remove a config value; missing keys are not an error
    pub fn unset(&self, key: &str) {
        let _ = self.command().args(["--unset", key]).output();
    }

    /// All config entries whose keys match `^prefix`
    pub fn get_regexp(&self, prefix: &str) -> HashMap<String, String> {
        let mut configs = HashMap::new();
        let Ok(output) = self
            .command()
            .args(["--get-regexp", &format!("^{}", prefix)])
            .output()
        else {
            return configs;
        };
        if output.status.success() {
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                if let Some((key, value)) = line.split_once(char::is_whitespace) {
                    configs.insert(key.to_string(), value.trim().to_string());
                }
            }
        }
        configs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    fn init_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        Command::new("git")
            .args(["init"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        dir
    }

    #[test]
    fn test_local_get_set_unset() {
        let dir = init_repo();
        let config = GitConfig::local(dir.path());

        assert_eq!(config.get("hooks.runtime.bash"), None);
        assert!(config.set("hooks.runtime.bash", "/bin/bash"));
        assert_eq!(config.get("hooks.runtime.bash"), Some("/bin/bash".to_string()));

        config.unset("hooks.runtime.bash");
        assert_eq!(config.get("hooks.runtime.bash"), None);
    }

    #[test]
    fn test_get_regexp() {
        let dir = init_repo();
        let config = GitConfig::local(dir.path());
        config.set("repo.demo.url", "https://example.com/demo.git");
        config.set("repo.demo.rootbranch", "develop");

        let entries = config.get_regexp("repo.demo");
        assert_eq!(
            entries.get("repo.demo.url").map(String::as_str),
            Some("https://example.com/demo.git")
        );
        assert_eq!(
            entries.get("repo.demo.rootbranch").map(String::as_str),
            Some("develop")
        );
    }
}
