//! Commit message validation
//!
//! Prefers the external commitlint CLI when it is resolvable on the host;
//! otherwise applies the built-in rules (conventional type present, ticket
//! present). External-tool probing happens at most once per validator
//! instance.

use std::path::PathBuf;
use std::process::Command;

use super::patterns::{extract_ticket, has_conventional_type};

/// Validates commit messages, owning the one-time external tool checks
///
/// Construct once per command invocation. The `node_checked` /
/// `commitlint_checked` flags replace process-global state so repeated
/// validations never re-probe or re-attempt installation.
pub struct CommitValidator {
    use_external: bool,
    node_checked: bool,
    commitlint_checked: bool,
    commitlint_path: Option<PathBuf>,
}

impl CommitValidator {
    pub fn new() -> Self {
        Self {
            use_external: true,
            node_checked: false,
            commitlint_checked: false,
            commitlint_path: None,
        }
    }

    /// Validator that skips external tools entirely (built-in rules only)
    pub fn builtin_only() -> Self {
        Self {
            use_external: false,
            ..Self::new()
        }
    }

    /// Validate a commit message, returning `(ok, errors)`
    pub fn validate(&mut self, msg: &str) -> (bool, Vec<String>) {
        if self.use_external {
            if let Some(result) = self.try_commitlint(msg) {
                return result;
            }
        }

        let mut errors = Vec::new();
        if !has_conventional_type(msg) {
            errors.push(
                "Missing conventional type (feat, fix, docs, style, refactor, test, chore, ci)"
                    .to_string(),
            );
        }
        if extract_ticket(msg).is_none() {
            errors.push("Missing Jira ticket in header/body".to_string());
        }
        (errors.is_empty(), errors)
    }

    /// Run commitlint over the message if the CLI is available
    ///
    /// Returns None when commitlint cannot be resolved or executed, letting
    /// the caller fall back to the built-in rules.
    fn try_commitlint(&mut self, msg: &str) -> Option<(bool, Vec<String>)> {
        let commitlint = self.resolve_commitlint()?;

        let tmp = std::env::temp_dir().join(format!("hookmint-commit-msg-{}.txt", std::process::id()));
        std::fs::write(&tmp, msg).ok()?;

        let output = Command::new(commitlint).arg("--edit").arg(&tmp).output();
        let _ = std::fs::remove_file(&tmp);
        let output = output.ok()?;

        if output.status.success() {
            return Some((true, Vec::new()));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let errors: Vec<String> = stdout
            .lines()
            .chain(stderr.lines())
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
            .collect();
        Some((false, errors))
    }

    /// Locate commitlint, probing node/npm and attempting one best-effort
    /// global install when npm exists but commitlint does not
    fn resolve_commitlint(&mut self) -> Option<PathBuf> {
        if self.commitlint_checked {
            return self.commitlint_path.clone();
        }
        self.commitlint_checked = true;

        if !self.node_checked {
            self.node_checked = true;
            if which::which("node").is_err() {
                return None;
            }
        }

        if let Ok(path) = which::which("commitlint") {
            self.commitlint_path = Some(path.clone());
            return Some(path);
        }

        let skip_install = std::env::var_os("HOOKMINT_SKIP_INSTALL").is_some();
        if !skip_install && which::which("npm").is_ok() {
            let _ = Command::new("npm")
                .args([
                    "install",
                    "--global",
                    "@commitlint/cli",
                    "@commitlint/config-conventional",
                ])
                .output();
            if let Ok(path) = which::which("commitlint") {
                self.commitlint_path = Some(path.clone());
                return Some(path);
            }
        }

        None
    }
}

impl Default for CommitValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_message() {
        let mut validator = CommitValidator::builtin_only();
        let (ok, errors) = validator.validate("feat(api): PROJ-123 add endpoint");
        assert!(ok);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_missing_type() {
        let mut validator = CommitValidator::builtin_only();
        let (ok, errors) = validator.validate("PROJ-123 add endpoint");
        assert!(!ok);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Missing conventional type"));
    }

    #[test]
    fn test_missing_ticket() {
        let mut validator = CommitValidator::builtin_only();
        let (ok, errors) = validator.validate("feat: add endpoint");
        assert!(!ok);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Missing Jira ticket"));
    }

    #[test]
    fn test_both_rules_fail() {
        let mut validator = CommitValidator::builtin_only();
        let (ok, errors) = validator.validate("just words");
        assert!(!ok);
        assert_eq!(errors.len(), 2);
    }
}
