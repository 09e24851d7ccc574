//! Dispatcher script generation
//!
//! Emits the small executable script installed under `.git/hooks/<type>`.
//! The script is a thin `sh` wrapper: it exports the runtime paths detected
//! at install time and delegates to the dispatch engine. Output is a pure
//! function of its inputs, so reinstalling with identical inputs rewrites
//! byte-identical files.

use std::path::Path;

use crate::runtime::RuntimePaths;

/// Marker line identifying generated dispatchers (checked by uninstall)
pub const DISPATCHER_MARKER: &str = "# Auto-generated by hookmint";

/// Generate the dispatcher script for one hook type
///
/// `hooks_source_dir` is the directory holding the `*.hook` files,
/// `bin_path` the hookmint executable the script delegates to.
pub fn generate_dispatcher(
    hook_type: &str,
    hooks_source_dir: &Path,
    bin_path: &Path,
    runtimes: &RuntimePaths,
) -> String {
    let mut script = String::new();
    script.push_str("#!/bin/sh\n");
    script.push_str(&format!("# {} hook - dispatcher\n", hook_type));
    script.push_str(DISPATCHER_MARKER);
    script.push_str(". Runs every *.hook file in the source directory\n");
    script.push_str("# in order, stopping at the first failure. Do not edit; reinstall to\n");
    script.push_str("# regenerate.\n\n");

    for (name, path) in [
        ("HOOKMINT_BASH", &runtimes.bash),
        ("HOOKMINT_PYTHON", &runtimes.python),
        ("HOOKMINT_NODE", &runtimes.node),
    ] {
        if let Some(path) = path {
            script.push_str(&format!(
                "{}={}; export {}\n",
                name,
                sh_quote(&path.display().to_string()),
                name
            ));
        }
    }

    script.push_str(&format!(
        "\nexec {} run {} --hooks-dir {} \"$@\"\n",
        sh_quote(&bin_path.display().to_string()),
        hook_type,
        sh_quote(&hooks_source_dir.display().to_string())
    ));
    script
}

/// Single-quote a string for POSIX sh, escaping embedded quotes
fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_runtimes() -> RuntimePaths {
        RuntimePaths {
            bash: Some(PathBuf::from("/bin/bash")),
            python: Some(PathBuf::from("/usr/bin/python3")),
            node: None,
        }
    }

    #[test]
    fn test_generated_script_shape() {
        let script = generate_dispatcher(
            "pre-commit",
            Path::new("/src/hooks/pre-commit"),
            Path::new("/usr/local/bin/hookmint"),
            &sample_runtimes(),
        );
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(DISPATCHER_MARKER));
        assert!(script.contains("HOOKMINT_BASH='/bin/bash'; export HOOKMINT_BASH"));
        assert!(script.contains("HOOKMINT_PYTHON='/usr/bin/python3'; export HOOKMINT_PYTHON"));
        // Node was not detected: no export line for it
        assert!(!script.contains("HOOKMINT_NODE"));
        assert!(script.contains(
            "exec '/usr/local/bin/hookmint' run pre-commit --hooks-dir '/src/hooks/pre-commit' \"$@\""
        ));
    }

    #[test]
    fn test_deterministic_output() {
        let a = generate_dispatcher(
            "commit-msg",
            Path::new("/src/hooks/commit-msg"),
            Path::new("/usr/local/bin/hookmint"),
            &sample_runtimes(),
        );
        let b = generate_dispatcher(
            "commit-msg",
            Path::new("/src/hooks/commit-msg"),
            Path::new("/usr/local/bin/hookmint"),
            &sample_runtimes(),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_sh_quote_escapes() {
        assert_eq!(sh_quote("plain"), "'plain'");
        assert_eq!(sh_quote("with space"), "'with space'");
        assert_eq!(sh_quote("o'brien"), r"'o'\''brien'");
    }
}
