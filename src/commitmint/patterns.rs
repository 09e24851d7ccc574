//! Pattern matchers for conventional-commit structure
//!
//! Pure predicates and header parsers shared by the correction stages and the
//! validator. All regexes operate on the header (first line) unless noted.

use regex::Regex;

/// Check if a commit message starts with a conventional commit type
///
/// Matches `type:`, `type(scope):` and the breaking variants `type!:`,
/// `type(scope)!:` for the types feat, fix, docs, style, refactor, test,
/// chore, ci.
pub fn has_conventional_type(message: &str) -> bool {
    Regex::new(r"^(feat|fix|docs|style|refactor|test|chore|ci)(\(.*?\))?(!)?:")
        .unwrap()
        .is_match(message)
}

/// Check if a message indicates a breaking change
///
/// Either the header carries the `!` marker (`feat!:`, `feat(api)!:`) or the
/// body contains a `BREAKING CHANGE:` footer.
pub fn is_breaking_change(message: &str) -> bool {
    Regex::new(r"^(\w+)(\(.*?\))?!:(\s|$)")
        .unwrap()
        .is_match(message)
        || message.contains("BREAKING CHANGE:")
}

/// Find the first ticket-shaped substring (`PROJ-123`) anywhere in the message
pub fn extract_ticket(message: &str) -> Option<&str> {
    Regex::new(r"\b([A-Z]{2,}-\d+)\b")
        .unwrap()
        .find(message)
        .map(|m| m.as_str())
}

/// Parsed `type(scope): body` header
pub struct ScopedHeader<'a> {
    pub commit_type: &'a str,
    pub scope: &'a str,
    pub body: &'a str,
}

/// Parse a header of the exact shape `type(scope): body`
pub fn parse_scoped_header(header: &str) -> Option<ScopedHeader<'_>> {
    let re = Regex::new(r"^(\w+)\(([^)]+)\):\s*(.*)$").unwrap();
    let caps = re.captures(header)?;
    Some(ScopedHeader {
        commit_type: caps.get(1).unwrap().as_str(),
        scope: caps.get(2).unwrap().as_str(),
        body: caps.get(3).unwrap().as_str(),
    })
}

/// Split a header into `(prefix, rest)` where prefix is `type`, optional
/// `(scope)`, optional breaking `!`, the colon, and any trailing whitespace
pub fn split_header_prefix(header: &str) -> Option<(&str, &str)> {
    let re = Regex::new(r"^(\w+(?:\(.*?\))?!?:\s*)(.*)$").unwrap();
    let caps = re.captures(header)?;
    Some((caps.get(1).unwrap().as_str(), caps.get(2).unwrap().as_str()))
}

/// Split a message into its header line and the remainder (including the
/// separating newline), so header transforms leave the body untouched
pub fn split_message(message: &str) -> (&str, &str) {
    match message.find('\n') {
        Some(idx) => (&message[..idx], &message[idx..]),
        None => (message, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_conventional_type() {
        assert!(has_conventional_type("feat: add new feature"));
        assert!(has_conventional_type("fix(api): handle error cases"));
        assert!(has_conventional_type("feat!: breaking change"));
        assert!(has_conventional_type("feat(api)!: breaking change"));
        assert!(has_conventional_type("chore: update dependencies"));

        assert!(!has_conventional_type("add new feature"));
        assert!(!has_conventional_type("feature: wrong type"));
        assert!(!has_conventional_type(""));
    }

    #[test]
    fn test_is_breaking_change() {
        assert!(is_breaking_change("feat!: drop v1 endpoints"));
        assert!(is_breaking_change("feat(api)!: change request format"));
        assert!(is_breaking_change("feat: x\n\nBREAKING CHANGE: renamed field"));

        assert!(!is_breaking_change("feat: add endpoint"));
        assert!(!is_breaking_change("fix(api): timeout"));
        // The marker must sit on the header, not mid-word
        assert!(!is_breaking_change("update important! stuff"));
    }

    #[test]
    fn test_extract_ticket() {
        assert_eq!(extract_ticket("feat: PROJ-123 add"), Some("PROJ-123"));
        assert_eq!(extract_ticket("body mentions ISSUE-42."), Some("ISSUE-42"));
        assert_eq!(extract_ticket("no ticket here"), None);
        // Single-letter project keys are not tickets
        assert_eq!(extract_ticket("A-1 too short"), None);
        // Word boundaries: underscore-joined identifiers are not tickets
        assert_eq!(extract_ticket("JT_PTEAE-2930_description"), None);
    }

    #[test]
    fn test_parse_scoped_header() {
        let h = parse_scoped_header("feat(core): core: implement feature").unwrap();
        assert_eq!(h.commit_type, "feat");
        assert_eq!(h.scope, "core");
        assert_eq!(h.body, "core: implement feature");

        assert!(parse_scoped_header("feat: no scope").is_none());
        assert!(parse_scoped_header("plain message").is_none());
    }

    #[test]
    fn test_split_header_prefix() {
        let (prefix, rest) = split_header_prefix("feat(api)!: change format").unwrap();
        assert_eq!(prefix, "feat(api)!: ");
        assert_eq!(rest, "change format");

        let (prefix, rest) = split_header_prefix("fix: timeout").unwrap();
        assert_eq!(prefix, "fix: ");
        assert_eq!(rest, "timeout");

        assert!(split_header_prefix("no header here").is_none());
    }

    #[test]
    fn test_split_message() {
        assert_eq!(split_message("header"), ("header", ""));
        assert_eq!(split_message("header\nbody"), ("header", "\nbody"));
        assert_eq!(split_message("header\n\nbody\n"), ("header", "\n\nbody\n"));
    }
}
