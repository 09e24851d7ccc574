//! Hook dispatch
//!
//! The dispatcher is the entry point Git invokes: a generated per-hook-type
//! script ([`generator`]) that delegates to the engine ([`runner`]), which
//! discovers `*.hook` files and runs them in order with first-failure
//! semantics.

pub mod generator;
pub mod runner;

pub use generator::{DISPATCHER_MARKER, generate_dispatcher};
pub use runner::HookDispatcher;

/// Git hook types a dispatcher can be installed for
pub const HOOK_TYPES: &[&str] = &[
    "pre-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-push",
    "post-checkout",
    "pre-rebase",
    "post-rewrite",
    "pre-auto-gc",
    "post-receive",
    "pre-receive",
    "post-update",
    "applypatch-msg",
];
