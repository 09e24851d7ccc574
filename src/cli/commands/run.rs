//! Run command - the dispatcher entry point
//!
//! Generated hook scripts call `hookmint run <hook-type> --hooks-dir <dir>`.
//! This command resolves runtime paths (env overrides baked into the script,
//! falling back to the cache) and hands off to the dispatch engine. The
//! process exits with the first failing hook's exit code.

use std::path::PathBuf;

use anyhow::Result;

use crate::dispatch::HookDispatcher;
use crate::runtime::{RuntimeCache, RuntimePaths};

pub async fn execute(hook_type: &str, hooks_dir: Option<PathBuf>, args: Vec<String>) -> Result<()> {
    let hooks_dir = match hooks_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?.join(hook_type),
    };

    let runtimes = resolve_runtimes()?;
    let dispatcher = HookDispatcher::new(hooks_dir, runtimes);
    let exit_code = dispatcher.run(&args)?;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Runtime paths from the generated script's environment, with cache-backed
/// detection filling the gaps
fn resolve_runtimes() -> Result<RuntimePaths> {
    // Baked-in paths can go stale between install and dispatch; verify they
    // still exist before trusting them
    let from_env = |name: &str| {
        std::env::var_os(name)
            .map(PathBuf::from)
            .filter(|path| path.exists())
    };

    let mut paths = RuntimePaths {
        bash: from_env("HOOKMINT_BASH"),
        python: from_env("HOOKMINT_PYTHON"),
        node: from_env("HOOKMINT_NODE"),
    };

    if paths.bash.is_none() || paths.python.is_none() || paths.node.is_none() {
        let cwd = std::env::current_dir()?;
        if crate::git::is_git_repository(&cwd) {
            let cache = RuntimeCache::local(&cwd);
            paths.bash = paths.bash.or_else(|| cache.resolve("bash"));
            paths.python = paths.python.or_else(|| cache.resolve("python"));
            paths.node = paths.node.or_else(|| cache.resolve("node"));
        } else {
            // Outside a repository there is nowhere sensible to cache
            paths.bash = paths.bash.or_else(crate::runtime::detect_bash);
            paths.python = paths.python.or_else(crate::runtime::detect_python);
            paths.node = paths.node.or_else(crate::runtime::detect_node);
        }
    }
    Ok(paths)
}
