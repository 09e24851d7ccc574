//! # Hookmint - Git Hooks & Ticket-Driven Workflow Automation
//!
//! Hookmint installs dispatcher scripts into a repository's hook directories,
//! runs discoverable `*.hook` files in order with first-failure semantics, and
//! automates a ticket-driven branch workflow (start/finish/publish/status)
//! against JIRA or GitHub Issues.
//!
//! The centerpiece is the commit-message correction pipeline (`commitmint`):
//! an ordered sequence of idempotent text transforms that normalizes a commit
//! message into conventional-commit form carrying its issue ticket.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install hookmint
//! cargo install hookmint
//!
//! # Install dispatchers into the current repository
//! hookmint install
//!
//! # Normalize the latest commit message for a ticket
//! hookmint commitmint myrepo PROJ-123
//! ```

pub mod cli;
pub mod commitmint;
pub mod dispatch;
pub mod error;
pub mod git;
pub mod installer;
pub mod repo;
pub mod runtime;
pub mod tracker;

pub use cli::{Cli, Output};

/// Result type alias for Hookmint operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
