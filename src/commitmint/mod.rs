//! Commit-message correction pipeline
//!
//! Normalizes a raw commit message through an ordered sequence of idempotent
//! text transforms: conventional type suggestion, duplicate-scope removal,
//! ticket placement, and a Smart Commit footer for breaking changes. The
//! final message is validated (commitlint when available, built-in rules
//! otherwise) before being applied via amend.

pub mod patterns;
pub mod stages;
pub mod validate;

pub use stages::{
    add_footer_if_breaking_change, correct_message, ensure_ticket_in_header, fix_duplicate_scope,
    suggest_type_header,
};
pub use validate::CommitValidator;
