//! Commit classification

mod rules;

pub use rules::{clean_description, detect_type, extract_scope, extract_tickets};

use relnotes_git::CommitInfo;
use tracing::{debug, instrument};

use crate::types::Commit;

/// Classify one raw commit.
///
/// Type, scope and description come from the subject line; ticket ids are
/// collected from the whole message including the body.
pub fn classify(raw: &CommitInfo) -> Commit {
    Commit {
        hash: raw.hash.clone(),
        short_hash: raw.short_hash.clone(),
        message: raw.message.clone(),
        author: raw.author.clone(),
        timestamp: raw.timestamp,
        commit_type: detect_type(&raw.message),
        scope: extract_scope(&raw.message),
        tickets: extract_tickets(&raw.full_message()),
    }
}

/// Classify a batch of raw commits, preserving order
#[instrument(skip(raw), fields(commit_count = raw.len()))]
pub fn classify_all(raw: &[CommitInfo]) -> Vec<Commit> {
    let commits: Vec<Commit> = raw.iter().map(classify).collect();
    debug!(
        with_tickets = commits.iter().filter(|c| !c.tickets.is_empty()).count(),
        "commits classified"
    );
    commits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommitType;
    use chrono::Utc;

    fn make_commit(message: &str) -> CommitInfo {
        CommitInfo::new(
            "abc1234567890",
            message,
            "Test Author",
            "test@example.com",
            Utc::now(),
        )
    }

    #[test]
    fn test_classify_simple_feat() {
        let commit = classify(&make_commit("feat: add new feature"));

        assert_eq!(commit.commit_type, CommitType::Feature);
        assert_eq!(commit.short_hash, "abc1234");
        assert_eq!(commit.description(), "Add new feature");
        assert!(commit.scope.is_none());
        assert!(commit.tickets.is_empty());
    }

    #[test]
    fn test_classify_scoped_chore() {
        let commit = classify(&make_commit("chore(build): x"));

        assert_eq!(commit.commit_type, CommitType::Chore);
        assert_eq!(commit.scope.as_deref(), Some("build"));
        assert_eq!(commit.description(), "X");
    }

    #[test]
    fn test_classify_collects_body_tickets() {
        let raw = make_commit("fix: correct Y (ABC-1)").with_body("Also closes XY-9 and ABC-1");
        let commit = classify(&raw);

        assert_eq!(commit.tickets, vec!["ABC-1", "XY-9"]);
        assert_eq!(commit.description(), "Correct Y (ABC-1)");
    }

    #[test]
    fn test_classify_non_conventional() {
        let commit = classify(&make_commit("Just a regular commit message"));
        assert_eq!(commit.commit_type, CommitType::Other);
        assert_eq!(commit.description(), "Just a regular commit message");
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let raw = vec![
            make_commit("docs: readme"),
            make_commit("test: more"),
            make_commit("feat: first"),
        ];
        let commits = classify_all(&raw);
        let types: Vec<_> = commits.iter().map(|c| c.commit_type).collect();
        assert_eq!(
            types,
            vec![CommitType::Documentation, CommitType::Test, CommitType::Feature]
        );
    }
}
