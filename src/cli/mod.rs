//! Command-line interface for Hookmint
//!
//! Provides the main CLI structure and command handling. Uses clap for
//! argument parsing; each command lives in its own module under `commands`.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

/// Hookmint - Git hooks dispatcher and ticket-driven workflow automation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Install dispatcher hooks into a repository (or globally)
    Install {
        /// Path to the target Git repository (default: current directory)
        #[arg(long, value_name = "PATH")]
        repo_path: Option<PathBuf>,

        /// Directory containing the per-hook-type source directories
        /// (default: current directory)
        #[arg(long, value_name = "PATH")]
        source_dir: Option<PathBuf>,

        /// Install hooks globally for all repositories
        #[arg(long)]
        global: bool,

        /// Overwrite existing hooks
        #[arg(short, long)]
        force: bool,

        /// Force re-detection of runtime paths (bash, python, node)
        #[arg(long)]
        force_detect: bool,
    },
    /// Remove generated dispatcher hooks from a repository
    Uninstall {
        /// Path to the target Git repository (default: current directory)
        #[arg(long, value_name = "PATH")]
        repo_path: Option<PathBuf>,
    },
    /// Run the hook files of one hook type (dispatcher entry point)
    Run {
        /// Hook type to dispatch (e.g. pre-commit)
        hook_type: String,

        /// Directory containing the *.hook files
        /// (default: ./<hook-type> under the current directory)
        #[arg(long, value_name = "PATH")]
        hooks_dir: Option<PathBuf>,

        /// Arguments forwarded to each hook
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Interactively normalize the latest commit message for a ticket
    Commitmint {
        /// Repository alias
        repo_alias: String,

        /// Issue ticket (e.g. PROJ-123); inferred from the branch when empty
        ticket: String,

        /// Accept every proposed change without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Start work on an issue: branch, push, transition tracker
    Start {
        /// Repository alias
        repo_alias: String,

        /// JIRA ticket (PROJ-123) or GitHub issue (#123 / 123)
        issue: String,
    },
    /// Create a pull request: push branch, transition tracker, open PR
    Finish {
        /// Repository alias
        repo_alias: String,

        /// JIRA ticket
        ticket: String,
    },
    /// Publish finished work: transition Done, update root branch, clean up
    Publish {
        /// Repository alias
        repo_alias: String,
    },
    /// Show workflow status for a repository alias
    Status {
        /// Repository alias
        repo_alias: String,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let output = Output::new(self.verbose, self.quiet);

        match self.command {
            Some(Commands::Install {
                repo_path,
                source_dir,
                global,
                force,
                force_detect,
            }) => {
                commands::install::execute(repo_path, source_dir, global, force, force_detect, &output)
                    .await
            }
            Some(Commands::Uninstall { repo_path }) => {
                commands::uninstall::execute(repo_path, &output).await
            }
            Some(Commands::Run {
                hook_type,
                hooks_dir,
                args,
            }) => commands::run::execute(&hook_type, hooks_dir, args).await,
            Some(Commands::Commitmint {
                repo_alias,
                ticket,
                yes,
            }) => commands::commitmint::execute(&repo_alias, &ticket, yes, &output).await,
            Some(Commands::Start { repo_alias, issue }) => {
                commands::start::execute(&repo_alias, &issue, &output).await
            }
            Some(Commands::Finish { repo_alias, ticket }) => {
                commands::finish::execute(&repo_alias, &ticket, &output).await
            }
            Some(Commands::Publish { repo_alias }) => {
                commands::publish::execute(&repo_alias, &output).await
            }
            Some(Commands::Status { repo_alias, format }) => {
                commands::status::execute(&repo_alias, &format, &output).await
            }
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}
