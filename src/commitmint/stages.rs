//! Correction stages for commit messages
//!
//! Four order-sensitive transforms, each a total function over arbitrary
//! strings and idempotent on its own output. The pipeline order matters:
//! duplicate-scope removal runs before ticket insertion, and breaking-change
//! detection happens on the original message before any stage can move the
//! `!` marker.

use regex::Regex;

use super::patterns::{
    has_conventional_type, is_breaking_change, parse_scoped_header, split_header_prefix,
    split_message,
};

/// Prepend a conventional type when the message has none
///
/// Heuristic: messages touching docs or a readme get `docs:`, everything
/// else gets `feat:`. Output always satisfies [`has_conventional_type`].
pub fn suggest_type_header(msg: &str) -> String {
    if has_conventional_type(msg) {
        return msg.to_string();
    }
    let lowered = msg.to_lowercase();
    let suggested = if lowered.contains("doc") || lowered.contains("readme") {
        "docs"
    } else {
        "feat"
    };
    format!("{}: {}", suggested, msg)
}

/// Remove a duplicated scope from the commit header
///
/// `feat(scope): scope: rest` becomes `feat(scope): rest`. When the header is
/// not of the `type(scope):` shape, a fallback collapses one exactly-repeated
/// prefix (`feat: feat: x` -> `feat: x`). A single pass only; deeper
/// repetitions are left alone.
pub fn fix_duplicate_scope(msg: &str) -> String {
    let (header, body) = split_message(msg);

    if let Some(h) = parse_scoped_header(header) {
        let redundant = format!("{}: ", h.scope);
        let stripped = h.body.strip_prefix(redundant.as_str()).unwrap_or(h.body);
        return format!("{}({}): {}{}", h.commit_type, h.scope, stripped, body);
    }

    // Fallback: collapse an exactly repeated header prefix
    let re = Regex::new(r"^(\w+(?:\([^)]*\))?:)\s*(.*)$").unwrap();
    if let Some(caps) = re.captures(header) {
        let prefix = caps.get(1).unwrap().as_str();
        let rest = caps.get(2).unwrap().as_str();
        if let Some(deduped) = rest.strip_prefix(prefix) {
            return format!("{}{}{}", prefix, deduped, body);
        }
    }

    msg.to_string()
}

/// Ensure the issue ticket appears in the commit header
///
/// The ticket is upper-cased and inserted right after the header prefix
/// (`feat(scope): TICKET rest`, `feat(scope)!: TICKET rest`). Messages
/// without a recognizable header get the ticket prepended. Messages already
/// containing the ticket anywhere are returned unchanged, so the ticket
/// appears exactly once no matter how often this runs.
pub fn ensure_ticket_in_header(msg: &str, ticket: &str) -> String {
    let ticket = ticket.to_uppercase();
    if msg.contains(ticket.as_str()) {
        return msg.to_string();
    }

    let (header, body) = split_message(msg);
    if let Some((prefix, rest)) = split_header_prefix(header) {
        return format!("{}{} {}{}", prefix, ticket, rest, body);
    }
    format!("{} {}", ticket, msg)
}

/// Append the Smart Commit footer when the change is breaking
///
/// Breaking is detected via the header `!` marker or a `BREAKING CHANGE:`
/// footer. The appended trailer is the byte-exact Smart Commit format the
/// issue tracker's automation consumes; a message already carrying it is
/// returned unchanged.
pub fn add_footer_if_breaking_change(msg: &str, ticket: &str) -> String {
    if !is_breaking_change(msg) {
        return msg.to_string();
    }
    let footer = format!(
        "\n\n{} #comment Breaking change; review impacts #resolve",
        ticket.to_uppercase()
    );
    if msg.contains(footer.trim_start()) {
        return msg.to_string();
    }
    format!("{}{}", msg, footer)
}

/// Run the full correction pipeline over a message
///
/// Breaking-ness is computed on the original message, then the stages run in
/// their fixed order. Applying this twice yields the same result as applying
/// it once.
pub fn correct_message(original: &str, ticket: &str) -> String {
    let is_breaking = is_breaking_change(original);

    let mut msg = original.to_string();
    if !has_conventional_type(&msg) {
        msg = suggest_type_header(&msg);
    }
    msg = fix_duplicate_scope(&msg);
    msg = ensure_ticket_in_header(&msg, ticket);
    if is_breaking {
        msg = add_footer_if_breaking_change(&msg, ticket);
    }
    msg
}
