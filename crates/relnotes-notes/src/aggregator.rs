//! Release note aggregation

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::matcher::{HeuristicMatcher, MergeRequestMatcher};
use crate::types::{
    Commit, CommitType, MergeRequest, ReleaseNote, ReleaseNoteItem, ReleaseNoteSection,
};

/// Version label used when the range has no end ref
pub const UNRELEASED: &str = "Unreleased";

/// Display value of an open-ended range's end
pub const HEAD: &str = "HEAD";

/// Groups classified commits into typed sections and links merge requests.
///
/// Holds nothing but its matching strategy; every call works only on the
/// collections passed in.
pub struct ReleaseNoteAggregator {
    matcher: Box<dyn MergeRequestMatcher>,
}

impl ReleaseNoteAggregator {
    /// Create an aggregator using [`HeuristicMatcher`]
    pub fn new() -> Self {
        Self {
            matcher: Box::new(HeuristicMatcher::new()),
        }
    }

    /// Use a custom matching strategy
    pub fn with_matcher<M: MergeRequestMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Build a release note stamped with the current time
    pub fn aggregate(
        &self,
        commits: &[Commit],
        merge_requests: &[MergeRequest],
        from_ref: &str,
        to_ref: Option<&str>,
    ) -> ReleaseNote {
        self.aggregate_at(commits, merge_requests, from_ref, to_ref, Utc::now())
    }

    /// Build a release note stamped with `generated_at`
    #[instrument(
        skip(self, commits, merge_requests),
        fields(commit_count = commits.len(), merge_request_count = merge_requests.len())
    )]
    pub fn aggregate_at(
        &self,
        commits: &[Commit],
        merge_requests: &[MergeRequest],
        from_ref: &str,
        to_ref: Option<&str>,
        generated_at: DateTime<Utc>,
    ) -> ReleaseNote {
        info!(
            from_ref,
            to_ref = to_ref.unwrap_or(HEAD),
            commit_count = commits.len(),
            "aggregating release note"
        );

        let mut sections = Vec::new();

        for commit_type in CommitType::ALL {
            let mut section = ReleaseNoteSection::new(commit_type);

            for commit in commits.iter().filter(|c| c.commit_type == commit_type) {
                let merge_request = self
                    .matcher
                    .find_match(commit, merge_requests)
                    .cloned();

                section.items.push(ReleaseNoteItem {
                    description: commit.description(),
                    tickets: commit.tickets.clone(),
                    short_hash: commit.short_hash.clone(),
                    merge_request,
                });
            }

            if !section.is_empty() {
                sections.push(section);
            }
        }

        let note = ReleaseNote {
            version: to_ref.unwrap_or(UNRELEASED).to_string(),
            from_ref: from_ref.to_string(),
            to_ref: to_ref.unwrap_or(HEAD).to_string(),
            generated_at,
            total_commits: commits.len(),
            sections,
            merge_requests: merge_requests.to_vec(),
        };

        debug!(
            section_count = note.sections.len(),
            linked = note
                .sections
                .iter()
                .flat_map(|s| &s.items)
                .filter(|i| i.merge_request.is_some())
                .count(),
            "release note sections built"
        );

        note
    }
}

impl Default for ReleaseNoteAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate with the default heuristic matcher
pub fn aggregate(
    commits: &[Commit],
    merge_requests: &[MergeRequest],
    from_ref: &str,
    to_ref: Option<&str>,
) -> ReleaseNote {
    ReleaseNoteAggregator::new().aggregate(commits, merge_requests, from_ref, to_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_all;
    use crate::matcher::NoMatcher;
    use relnotes_git::CommitInfo;

    fn make_commits(messages: &[&str]) -> Vec<Commit> {
        let raw: Vec<CommitInfo> = messages
            .iter()
            .enumerate()
            .map(|(i, m)| {
                CommitInfo::new(
                    format!("{:07x}0000000", i + 1),
                    *m,
                    "Test Author",
                    "test@example.com",
                    Utc::now(),
                )
            })
            .collect();
        classify_all(&raw)
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let commits = make_commits(&["docs: guide", "feat: one", "docs: api", "feat: two"]);
        let note = aggregate(&commits, &[], "v1.0.0", Some("v1.1.0"));

        assert_eq!(note.sections.len(), 2);
        assert_eq!(note.sections[0].commit_type, CommitType::Feature);
        assert_eq!(note.sections[1].commit_type, CommitType::Documentation);

        let features: Vec<_> = note.sections[0].items.iter().map(|i| &i.description).collect();
        assert_eq!(features, vec!["One", "Two"]);
        let docs: Vec<_> = note.sections[1].items.iter().map(|i| &i.description).collect();
        assert_eq!(docs, vec!["Guide", "Api"]);
    }

    #[test]
    fn test_every_commit_lands_in_one_section() {
        let commits = make_commits(&[
            "feat: a", "fix: b", "refactor: c", "doc: d", "tests: e", "ci: f", "misc g",
        ]);
        let note = aggregate(&commits, &[], "a", None);

        assert_eq!(note.sections.len(), 7);
        assert_eq!(note.item_count(), commits.len());
        let types: Vec<_> = note.sections.iter().map(|s| s.commit_type).collect();
        assert_eq!(types, CommitType::ALL.to_vec());
        assert_eq!(note.sections[6].title, "Other");
        assert_eq!(note.sections[6].glyph, "📦");
    }

    #[test]
    fn test_version_and_refs() {
        let note = aggregate(&[], &[], "v1.0.0", Some("v2.0.0"));
        assert_eq!(note.version, "v2.0.0");
        assert_eq!(note.to_ref, "v2.0.0");

        let note = aggregate(&[], &[], "v1.0.0", None);
        assert_eq!(note.version, UNRELEASED);
        assert_eq!(note.to_ref, HEAD);
        assert_eq!(note.from_ref, "v1.0.0");
    }

    #[test]
    fn test_empty_inputs() {
        let note = aggregate(&[], &[], "v1.0.0", None);
        assert!(note.is_empty());
        assert_eq!(note.total_commits, 0);
        assert!(note.orphan_merge_requests().is_empty());
    }

    #[test]
    fn test_items_carry_matches_and_orphans_are_the_rest() {
        let commits = make_commits(&["fix: correct totals ABC-1", "feat: add export"]);
        let mrs = vec![
            MergeRequest::new(5, "ABC-1 fix", "u5"),
            MergeRequest::new(6, "Unrelated cleanup", "u6"),
        ];
        let note = aggregate(&commits, &mrs, "v1", None);

        let fixes = &note.sections[1];
        assert_eq!(fixes.commit_type, CommitType::BugFix);
        assert_eq!(fixes.items[0].merge_request.as_ref().map(|m| m.iid), Some(5));
        assert_eq!(fixes.items[0].tickets, vec!["ABC-1"]);
        assert!(note.sections[0].items[0].merge_request.is_none());

        let orphans: Vec<_> = note.orphan_merge_requests().iter().map(|m| m.iid).collect();
        assert_eq!(orphans, vec![6]);
        assert_eq!(note.merge_requests.len(), 2);
    }

    #[test]
    fn test_custom_matcher() {
        let commits = make_commits(&["fix: ABC-1"]);
        let mrs = vec![MergeRequest::new(5, "ABC-1", "u")];
        let note = ReleaseNoteAggregator::new()
            .with_matcher(NoMatcher)
            .aggregate(&commits, &mrs, "v1", None);

        assert!(note.sections[0].items[0].merge_request.is_none());
        assert_eq!(note.orphan_merge_requests().len(), 1);
    }

    #[test]
    fn test_aggregate_at_uses_given_time() {
        let at = Utc::now() - chrono::Duration::days(3);
        let note = ReleaseNoteAggregator::new().aggregate_at(&[], &[], "v1", None, at);
        assert_eq!(note.generated_at, at);
    }
}
