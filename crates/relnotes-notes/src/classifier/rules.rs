//! Message rules: type prefixes, scope, ticket ids and description cleanup

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::types::CommitType;

/// Prefixes tested top to bottom against the lower-cased message
const TYPE_PREFIXES: &[(&str, CommitType)] = &[
    ("feat:", CommitType::Feature),
    ("feature:", CommitType::Feature),
    ("fix:", CommitType::BugFix),
    ("bugfix:", CommitType::BugFix),
    ("refactor:", CommitType::Refactor),
    ("docs:", CommitType::Documentation),
    ("doc:", CommitType::Documentation),
    ("test:", CommitType::Test),
    ("tests:", CommitType::Test),
    ("chore:", CommitType::Chore),
    ("build:", CommitType::Chore),
    ("ci:", CommitType::Chore),
];

/// `type(scope):` at the very start of a message
static SCOPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>\w+)\((?P<scope>[^)]+)\):").expect("Invalid regex")
});

/// Uppercase project key, hyphen, digits, as a whole word
static TICKET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]+-[0-9]+\b").expect("Invalid regex"));

/// Leading `type:` or `type(scope):` plus trailing whitespace
static PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+(?:\([^)]+\))?:\s*").expect("Invalid regex"));

/// Detect the commit type from the message's leading prefix.
///
/// The test is case-insensitive and purely prefix based: `"features: x"` is
/// not a feature. A `(scope)` group is ignored, so `chore(build):` counts as
/// `chore:`.
pub fn detect_type(message: &str) -> CommitType {
    let lowered = message.to_lowercase();
    let head = SCOPE_REGEX.replace(&lowered, "${type}:");

    TYPE_PREFIXES
        .iter()
        .find(|(prefix, _)| head.starts_with(prefix))
        .map(|(_, commit_type)| *commit_type)
        .unwrap_or(CommitType::Other)
}

/// Extract the scope from a `type(scope):` message
pub fn extract_scope(message: &str) -> Option<String> {
    SCOPE_REGEX
        .captures(message)
        .and_then(|caps| caps.name("scope"))
        .map(|m| m.as_str().to_string())
}

/// Collect ticket ids in first-occurrence order without duplicates
pub fn extract_tickets(message: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TICKET_REGEX
        .find_iter(message)
        .map(|m| m.as_str())
        .filter(|ticket| seen.insert(*ticket))
        .map(str::to_string)
        .collect()
}

/// Strip one leading type prefix and capitalise the first remaining character
pub fn clean_description(message: &str) -> String {
    let stripped = PREFIX_REGEX.replace(message, "");
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
