//! Repository alias registry and branch conventions
//!
//! Repository aliases map a short name to a remote URL, a clone directory,
//! and workflow settings, persisted in the user's global git config under
//! `repo.<alias>.*`. This module also owns the branch-naming conventions the
//! workflow commands share: `<INITIALS>_<TICKET>_<slugged summary>`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;

use crate::error::WorkflowError;
use crate::git::{GitConfig, operations};

/// Default root branch for new clones
pub const DEFAULT_ROOT_BRANCH: &str = "develop";

/// Ticket pattern inside branch names (e.g. PROJ-123)
const BRANCH_TICKET_PATTERN: &str = r"([A-Z]+-\d+)";

/// Pull request body template
const PR_BODY_TEMPLATE: &str = "# [{ticket}]({jira_url}/browse/{ticket})

## Description

{summary}

## Commits

{commits}

## Test Steps

1. Review code changes
2. Run automated tests
3. Verify functionality
";

/// Configuration of one repository alias
#[derive(Debug, Clone)]
pub struct RepoConfig {
    pub url: String,
    pub clone_to: String,
    pub root_branch: String,
    pub jira_server: Option<String>,
    pub branch_prefix: String,
}

impl RepoConfig {
    /// Load an alias from global git config; None when url/cloneto are unset
    pub fn load(alias: &str) -> Option<Self> {
        let config = GitConfig::global();
        let url = config.get(&format!("repo.{}.url", alias))?;
        let clone_to = config.get(&format!("repo.{}.cloneto", alias))?;
        Some(Self {
            url,
            clone_to,
            root_branch: config
                .get(&format!("repo.{}.rootbranch", alias))
                .unwrap_or_else(|| DEFAULT_ROOT_BRANCH.to_string()),
            jira_server: config.get(&format!("repo.{}.jiraserver", alias)),
            branch_prefix: config
                .get(&format!("repo.{}.branchprefix", alias))
                .unwrap_or_default(),
        })
    }

    /// Load an alias or fail with a workflow error
    pub fn load_required(alias: &str) -> Result<Self> {
        Self::load(alias).ok_or_else(|| WorkflowError::UnknownAlias(alias.to_string()).into())
    }

    /// Persist this alias to global git config
    pub fn save(&self, alias: &str) -> bool {
        let config = GitConfig::global();
        let mut ok = config.set(&format!("repo.{}.url", alias), &self.url)
            && config.set(&format!("repo.{}.cloneto", alias), &self.clone_to)
            && config.set(&format!("repo.{}.rootbranch", alias), &self.root_branch);
        if let Some(server) = &self.jira_server {
            ok = ok && config.set(&format!("repo.{}.jiraserver", alias), server);
        }
        if !self.branch_prefix.is_empty() {
            ok = ok && config.set(&format!("repo.{}.branchprefix", alias), &self.branch_prefix);
        }
        ok
    }

    /// Locate the working copy for `branch_name` under the clone directory
    pub fn locate_branch_dir(&self, branch_name: &str) -> Result<PathBuf> {
        let dir_name = branch_name.rsplit('/').next().unwrap_or(branch_name);
        let repo_path = Path::new(&self.clone_to).join(dir_name);
        if !repo_path.join(".git").exists() {
            return Err(WorkflowError::NotARepository(repo_path.display().to_string()).into());
        }
        Ok(repo_path)
    }

    /// Most recently modified clone under the clone directory
    pub fn find_latest_clone(&self) -> Result<PathBuf> {
        let base = Path::new(&self.clone_to);
        let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
        if let Ok(entries) = std::fs::read_dir(base) {
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.join(".git").exists() {
                    continue;
                }
                let mtime = entry
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                if latest.as_ref().is_none_or(|(t, _)| mtime > *t) {
                    latest = Some((mtime, path));
                }
            }
        }
        latest
            .map(|(_, path)| path)
            .ok_or_else(|| WorkflowError::NotARepository(base.display().to_string()).into())
    }
}

/// Extract the issue ticket from a branch name, None when absent
pub fn extract_ticket_from_branch(branch_name: &str) -> Option<String> {
    Regex::new(BRANCH_TICKET_PATTERN)
        .unwrap()
        .captures(branch_name)
        .map(|caps| caps[1].to_string())
}

/// User initials from `git config user.name`
///
/// First letters of the name parts, reversed when there is more than one part
/// so "Last First" configurations come out as "FL".
pub fn get_user_initials() -> String {
    let name = GitConfig::global().get("user.name").unwrap_or_default();
    let mut parts: Vec<char> = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if parts.is_empty() {
        return "XX".to_string();
    }
    if parts.len() > 1 {
        parts.reverse();
    }
    parts.into_iter().collect()
}

/// Slug an issue summary for use inside a branch name
///
/// Lowercased, non-alphanumerics collapsed to underscores, truncated at a
/// word boundary to `max_length`.
pub fn format_summary_for_branch(summary: &str, max_length: usize) -> String {
    let lowered = summary.trim().to_lowercase();
    let slug = Regex::new(r"[^a-z0-9]+")
        .unwrap()
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string();
    if slug.len() <= max_length {
        return slug;
    }
    let mut result: Vec<&str> = Vec::new();
    let mut current_length = 0;
    for word in slug.split('_') {
        if current_length + word.len() + 1 > max_length {
            break;
        }
        result.push(word);
        current_length += word.len() + 1;
    }
    if result.is_empty() {
        slug[..max_length].to_string()
    } else {
        result.join("_")
    }
}

/// Build a branch name from a ticket and its summary
///
/// `<INITIALS>_<TICKET>_<slug>`, with the configured branch prefix (if any)
/// prepended as a path segment.
pub fn create_branch_name(ticket: &str, summary: &str, branch_prefix: &str) -> String {
    let initials = get_user_initials();
    let slug = format_summary_for_branch(summary, 50);
    let base = format!("{}_{}_{}", initials, ticket.to_uppercase(), slug);
    if branch_prefix.is_empty() {
        base
    } else if branch_prefix.ends_with('/') {
        format!("{}{}", branch_prefix, base)
    } else {
        format!("{}/{}", branch_prefix, base)
    }
}

/// Parse `(owner, repo)` out of a GitHub remote URL
pub fn get_repo_from_url(url: &str) -> Result<(String, String)> {
    let trimmed = url.trim_end_matches('/').trim_end_matches(".git");
    let path = trimmed
        .rsplit_once(':')
        .map(|(_, p)| p)
        .unwrap_or(trimmed);
    let mut segments = path.rsplit('/');
    let repo = segments.next().filter(|s| !s.is_empty());
    let owner = segments.next().filter(|s| !s.is_empty());
    match (owner, repo) {
        (Some(owner), Some(repo)) => Ok((owner.to_string(), repo.to_string())),
        _ => Err(WorkflowError::GitCommand(format!("unparseable remote URL: {}", url)).into()),
    }
}

/// Render the pull request body for a ticket
pub fn build_pr_body(ticket: &str, jira_server: &str, summary: &str, commits: &[String]) -> String {
    let commit_list = if commits.is_empty() {
        "- (no commits yet)".to_string()
    } else {
        commits
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n")
    };
    PR_BODY_TEMPLATE
        .replace("{ticket}", ticket)
        .replace("{jira_url}", jira_server)
        .replace("{summary}", summary)
        .replace("{commits}", &commit_list)
}

/// Commits on the current branch since the root branch
pub fn commits_since_root(repo_path: &Path, root_branch: &str) -> Vec<String> {
    operations::get_commits_since(repo_path, root_branch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ticket_from_branch() {
        assert_eq!(
            extract_ticket_from_branch("JT_PTEAE-2930_add_retry_logic"),
            Some("PTEAE-2930".to_string())
        );
        assert_eq!(
            extract_ticket_from_branch("feature/PROJ-12_cleanup"),
            Some("PROJ-12".to_string())
        );
        assert_eq!(extract_ticket_from_branch("main"), None);
        assert_eq!(extract_ticket_from_branch("issue-123-fix"), None);
    }

    #[test]
    fn test_format_summary_for_branch() {
        assert_eq!(
            format_summary_for_branch("Add retry logic!", 50),
            "add_retry_logic"
        );
        assert_eq!(
            format_summary_for_branch("  Fix: weird   spacing  ", 50),
            "fix_weird_spacing"
        );
        // Truncation happens on word boundaries
        let long = "one two three four five six seven eight nine ten eleven";
        let slug = format_summary_for_branch(long, 20);
        assert!(slug.len() <= 20);
        assert!(!slug.ends_with('_'));
    }

    #[test]
    fn test_create_branch_name_prefix() {
        // Initials depend on the host's git config; check the invariant parts
        let name = create_branch_name("proj-7", "Add thing", "feature");
        assert!(name.starts_with("feature/"));
        assert!(name.contains("_PROJ-7_add_thing"));

        let name = create_branch_name("proj-7", "Add thing", "");
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_get_repo_from_url() {
        assert_eq!(
            get_repo_from_url("https://github.com/octocat/hello.git").unwrap(),
            ("octocat".to_string(), "hello".to_string())
        );
        assert_eq!(
            get_repo_from_url("git@github.com:octocat/hello.git").unwrap(),
            ("octocat".to_string(), "hello".to_string())
        );
        assert!(get_repo_from_url("nonsense").is_err());
    }

    #[test]
    fn test_build_pr_body() {
        let body = build_pr_body(
            "PROJ-1",
            "https://jira.example.com",
            "Add endpoint",
            &["feat: PROJ-1 add endpoint".to_string()],
        );
        assert!(body.contains("[PROJ-1](https://jira.example.com/browse/PROJ-1)"));
        assert!(body.contains("Add endpoint"));
        assert!(body.contains("- feat: PROJ-1 add endpoint"));
    }
}
