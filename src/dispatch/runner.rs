//! Hook execution engine
//!
//! Discovers `*.hook` files in a hook-type directory and runs them in sorted
//! filename order, forwarding the caller's arguments and stopping at the
//! first non-zero exit. Hooks are always started from an argument vector,
//! never a shell string, so hook filenames and arguments cannot inject shell
//! syntax.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;

use crate::runtime::RuntimePaths;

/// Runs the hook files of one hook-type directory
pub struct HookDispatcher {
    hooks_dir: PathBuf,
    runtimes: RuntimePaths,
}

impl HookDispatcher {
    pub fn new(hooks_dir: PathBuf, runtimes: RuntimePaths) -> Self {
        Self { hooks_dir, runtimes }
    }

    /// Enabled hook files in execution order
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut hooks = Vec::new();
        if !self.hooks_dir.is_dir() {
            return Ok(hooks);
        }
        for entry in std::fs::read_dir(&self.hooks_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".hook") || name == "dispatcher.hook" || name.ends_with(".disabled")
            {
                continue;
            }
            hooks.push(path);
        }
        hooks.sort();
        Ok(hooks)
    }

    /// Run all enabled hooks, returning the exit code Git should see
    ///
    /// Captured stdout/stderr of each hook is replayed to the dispatcher's
    /// own streams. The first non-zero exit code is propagated immediately
    /// and the remaining hooks never run.
    pub fn run(&self, args: &[String]) -> Result<i32> {
        for hook_file in self.discover()? {
            let code = self.run_hook(&hook_file, args);
            if code != 0 {
                return Ok(code);
            }
        }
        Ok(0)
    }

    fn run_hook(&self, hook_file: &Path, args: &[String]) -> i32 {
        let mut cmd = match self.interpreter_for(hook_file) {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(hook_file);
                cmd
            }
            None => Command::new(hook_file),
        };
        cmd.args(args);

        match cmd.output() {
            Ok(output) => {
                let _ = io::stdout().write_all(&output.stdout);
                let _ = io::stderr().write_all(&output.stderr);
                output.status.code().unwrap_or(1)
            }
            Err(e) => {
                eprintln!(
                    "Error executing {}: {}",
                    hook_file.file_name().unwrap_or_default().to_string_lossy(),
                    e
                );
                1
            }
        }
    }

    /// Pick an interpreter from the hook's shebang line, if any
    ///
    /// Shebangs naming python/bash/sh/node map to the detected runtime paths;
    /// everything else (including missing shebangs) runs the file directly.
    fn interpreter_for(&self, hook_file: &Path) -> Option<PathBuf> {
        let first_line = read_first_line(hook_file)?;
        if !first_line.starts_with("#!") {
            return None;
        }
        if first_line.contains("python") {
            return self.runtimes.python.clone();
        }
        if first_line.contains("bash") || first_line.contains("sh") {
            return self.runtimes.bash.clone();
        }
        if first_line.contains("node") {
            return self.runtimes.node.clone();
        }
        None
    }
}

fn read_first_line(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;
    Some(line.trim().to_string())
}
