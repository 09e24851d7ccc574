//! Runtime detection and caching
//!
//! Detects bash/python/node executables and caches the resolved paths in git
//! config so hook dispatch never repeats filesystem probes. Cached entries
//! expire after a TTL and are ignored when the path no longer exists on disk.
//!
//! Git config keys:
//!   hooks.runtime.bash
//!   hooks.runtime.python
//!   hooks.runtime.node
//!   hooks.runtime.detectedAt  (ISO-8601)

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local};

use crate::git::GitConfig;

const CACHE_KEYS: &[&str] = &["bash", "python", "node", "detectedAt"];

/// Detect a bash executable
///
/// Order: `which bash`, then the common install paths, then `sh` as a
/// reduced-feature fallback.
pub fn detect_bash() -> Option<PathBuf> {
    if let Ok(path) = which::which("bash") {
        return Some(path);
    }
    for candidate in ["/bin/bash", "/usr/bin/bash", "/usr/local/bin/bash"] {
        let path = Path::new(candidate);
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    which::which("sh").ok()
}

/// Detect a Python interpreter (`python3` preferred over `python`)
pub fn detect_python() -> Option<PathBuf> {
    which::which("python3").or_else(|_| which::which("python")).ok()
}

/// Detect a Node.js runtime; optional, hooks needing it degrade gracefully
pub fn detect_node() -> Option<PathBuf> {
    which::which("node").ok()
}

/// Resolved runtime paths handed to the dispatcher
#[derive(Debug, Clone, Default)]
pub struct RuntimePaths {
    pub bash: Option<PathBuf>,
    pub python: Option<PathBuf>,
    pub node: Option<PathBuf>,
}

/// Git-config-backed cache of detected runtime paths
///
/// Local scope for per-repository installs, global scope for `--global`.
/// A cached path is only served while the cache is inside its TTL and the
/// path still exists on disk; anything else triggers re-detection.
pub struct RuntimeCache {
    config: GitConfig,
    ttl: Duration,
}

impl RuntimeCache {
    /// Default cache TTL: 7 days
    pub const DEFAULT_TTL_DAYS: i64 = 7;

    /// Cache stored in the repository's local config
    pub fn local(repo_path: &Path) -> Self {
        Self {
            config: GitConfig::local(repo_path),
            ttl: Duration::days(Self::DEFAULT_TTL_DAYS),
        }
    }

    /// Cache stored in the user's global config
    pub fn global() -> Self {
        Self {
            config: GitConfig::global(),
            ttl: Duration::days(Self::DEFAULT_TTL_DAYS),
        }
    }

    #[cfg(test)]
    fn with_ttl(config: GitConfig, ttl: Duration) -> Self {
        Self { config, ttl }
    }

    /// Resolve a runtime by name ("bash", "python", "node"), consulting the
    /// cache first
    pub fn resolve(&self, runtime: &str) -> Option<PathBuf> {
        if let Some(cached) = self.read_cache(runtime) {
            return Some(cached);
        }
        let detected = match runtime {
            "bash" => detect_bash(),
            "python" => detect_python(),
            "node" => detect_node(),
            _ => None,
        }?;
        self.write_cache(runtime, &detected);
        Some(detected)
    }

    /// All three runtimes at once, for dispatcher generation
    pub fn resolve_all(&self) -> RuntimePaths {
        RuntimePaths {
            bash: self.resolve("bash"),
            python: self.resolve("python"),
            node: self.resolve("node"),
        }
    }

    /// Drop every cached entry, forcing re-detection on next access
    pub fn invalidate(&self) {
        for key in CACHE_KEYS {
            self.config.unset(&format!("hooks.runtime.{}", key));
        }
    }

    fn read_cache(&self, runtime: &str) -> Option<PathBuf> {
        let cached = self.config.get(&format!("hooks.runtime.{}", runtime))?;
        let path = PathBuf::from(cached);
        if self.is_cache_valid() && path.exists() {
            Some(path)
        } else {
            None
        }
    }

    fn write_cache(&self, runtime: &str, path: &Path) {
        self.config
            .set(&format!("hooks.runtime.{}", runtime), &path.display().to_string());
        self.config
            .set("hooks.runtime.detectedAt", &Local::now().to_rfc3339());
    }

    fn is_cache_valid(&self) -> bool {
        let Some(stamp) = self.config.get("hooks.runtime.detectedAt") else {
            return false;
        };
        match DateTime::parse_from_rfc3339(&stamp) {
            Ok(detected_at) => Local::now().signed_duration_since(detected_at) < self.ttl,
            Err(_) => false,
        }
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
    fn test_detect_bash_or_sh() {
        // Some shell always exists on the test hosts we care about
        assert!(detect_bash().is_some());
    }

    #[test]
    fn test_cache_roundtrip() {
        let dir = init_repo();
        let cache = RuntimeCache::local(dir.path());

        let first = cache.resolve("bash").unwrap();
        // Second resolve must come from the cache and agree
        let config = GitConfig::local(dir.path());
        assert_eq!(
            config.get("hooks.runtime.bash"),
            Some(first.display().to_string())
        );
        assert!(config.get("hooks.runtime.detectedAt").is_some());
        assert_eq!(cache.resolve("bash").unwrap(), first);
    }

    #[test]
    fn test_stale_path_is_ignored() {
        let dir = init_repo();
        let config = GitConfig::local(dir.path());
        config.set("hooks.runtime.bash", "/nonexistent/bash");
        config.set("hooks.runtime.detectedAt", &Local::now().to_rfc3339());

        let cache = RuntimeCache::local(dir.path());
        let resolved = cache.resolve("bash").unwrap();
        assert_ne!(resolved, PathBuf::from("/nonexistent/bash"));
    }

    #[test]
    fn test_expired_cache_is_ignored() {
        let dir = init_repo();
        let config = GitConfig::local(dir.path());
        let real = detect_bash().unwrap();
        config.set("hooks.runtime.bash", &real.display().to_string());
        let old = Local::now() - Duration::days(8);
        config.set("hooks.runtime.detectedAt", &old.to_rfc3339());

        let cache = RuntimeCache::with_ttl(GitConfig::local(dir.path()), Duration::days(7));
        // Expired entry forces re-detection, which rewrites the timestamp
        cache.resolve("bash").unwrap();
        let stamp = GitConfig::local(dir.path())
            .get("hooks.runtime.detectedAt")
            .unwrap();
        let refreshed = DateTime::parse_from_rfc3339(&stamp).unwrap();
        assert!(Local::now().signed_duration_since(refreshed) < Duration::days(1));
    }

    #[test]
    fn test_invalidate() {
        let dir = init_repo();
        let cache = RuntimeCache::local(dir.path());
        cache.resolve("bash").unwrap();
        cache.invalidate();

        let config = GitConfig::local(dir.path());
        assert_eq!(config.get("hooks.runtime.bash"), None);
        assert_eq!(config.get("hooks.runtime.detectedAt"), None);
    }
}
