//! Release note types

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::classifier::clean_description;

/// Commit category, declared in section display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitType {
    /// New feature
    Feature,
    /// Bug fix
    BugFix,
    /// Refactoring
    Refactor,
    /// Documentation
    Documentation,
    /// Tests
    Test,
    /// Maintenance, build and CI
    Chore,
    /// Anything unrecognised
    Other,
}

impl CommitType {
    /// All types in section display order
    pub const ALL: [CommitType; 7] = [
        Self::Feature,
        Self::BugFix,
        Self::Refactor,
        Self::Documentation,
        Self::Test,
        Self::Chore,
        Self::Other,
    ];

    /// Section title for this type
    pub fn title(&self) -> &'static str {
        match self {
            Self::Feature => "Features",
            Self::BugFix => "Bug Fixes",
            Self::Refactor => "Refactoring",
            Self::Documentation => "Documentation",
            Self::Test => "Tests",
            Self::Chore => "Chore",
            Self::Other => "Other",
        }
    }

    /// Section glyph for this type
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Feature => "🎉",
            Self::BugFix => "🐛",
            Self::Refactor => "🔧",
            Self::Documentation => "📝",
            Self::Test => "🧪",
            Self::Chore => "⚙️",
            Self::Other => "📦",
        }
    }
}

/// A classified commit. Built once by the classifier and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Abbreviated hash
    pub short_hash: String,
    /// Raw commit message (subject line)
    pub message: String,
    /// Author name
    pub author: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
    /// Derived type
    pub commit_type: CommitType,
    /// Scope from `type(scope):`, if any
    pub scope: Option<String>,
    /// Ticket ids in first-occurrence order, without duplicates
    pub tickets: Vec<String>,
}

impl Commit {
    /// The message with its type prefix removed and first letter capitalised
    pub fn description(&self) -> String {
        clean_description(&self.message)
    }
}

/// Lifecycle state of a merge request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    Opened,
    Closed,
    Locked,
    Merged,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A user reference attached to a merge request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub username: String,
}

/// A merge request as delivered by the hosting platform.
///
/// Field names follow the platform's API so a saved API response can be
/// read directly. Null or missing fields take their empty defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Project-scoped merge request number, 0 when absent
    #[serde(default, deserialize_with = "null_to_default")]
    pub iid: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub state: MergeRequestState,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub merged_at: Option<DateTime<Utc>>,
    /// Canonical URL of the merge request
    #[serde(default, deserialize_with = "null_to_default")]
    pub web_url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub source_branch: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub target_branch: String,
    #[serde(default)]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub merged_by: Option<UserRef>,
}

impl MergeRequest {
    /// Create a merge request with the given number, title and URL
    pub fn new(iid: u64, title: impl Into<String>, web_url: impl Into<String>) -> Self {
        Self {
            iid,
            title: title.into(),
            web_url: web_url.into(),
            state: MergeRequestState::Merged,
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the source branch
    pub fn with_source_branch(mut self, branch: impl Into<String>) -> Self {
        self.source_branch = branch.into();
        self
    }

    /// Set the author by username
    pub fn with_author(mut self, username: impl Into<String>) -> Self {
        self.author = Some(UserRef {
            username: username.into(),
            ..Default::default()
        });
        self
    }

    /// Add a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Set the merge time
    pub fn with_merged_at(mut self, merged_at: DateTime<Utc>) -> Self {
        self.merged_at = Some(merged_at);
        self
    }

    /// Username of the author, if known and non-empty
    pub fn author_username(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.username.as_str())
            .filter(|u| !u.is_empty())
    }
}

fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| {
        let parsed = relnotes_git::parse_timestamp(&r);
        if parsed.is_none() {
            warn!(merged_at = %r, "unparseable merge request timestamp, ignoring");
        }
        parsed
    }))
}

/// One line of a release note section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseNoteItem {
    /// Cleaned commit description
    pub description: String,
    /// Ticket ids of the commit
    pub tickets: Vec<String>,
    /// Short hash of the commit
    pub short_hash: String,
    /// Merge request the commit was correlated with
    pub merge_request: Option<MergeRequest>,
}

/// A typed section of the release note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseNoteSection {
    /// Type of every commit in this section
    pub commit_type: CommitType,
    /// Section title
    pub title: String,
    /// Section glyph
    pub glyph: String,
    /// Items in original commit order
    pub items: Vec<ReleaseNoteItem>,
}

impl ReleaseNoteSection {
    /// Create an empty section for a commit type
    pub fn new(commit_type: CommitType) -> Self {
        Self {
            commit_type,
            title: commit_type.title().to_string(),
            glyph: commit_type.glyph().to_string(),
            items: Vec::new(),
        }
    }

    /// Check if section is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An aggregated release note, ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseNote {
    /// Version label (the to-ref, or "Unreleased")
    pub version: String,
    /// Start of the range
    pub from_ref: String,
    /// End of the range as displayed ("HEAD" when open-ended)
    pub to_ref: String,
    /// When the note was generated
    pub generated_at: DateTime<Utc>,
    /// Number of commits fed to the aggregator
    pub total_commits: usize,
    /// Non-empty sections in display order
    pub sections: Vec<ReleaseNoteSection>,
    /// Every merge request supplied, in input order
    pub merge_requests: Vec<MergeRequest>,
}

impl ReleaseNote {
    /// Merge requests not referenced by any item, in input order.
    ///
    /// Computed from the current items on every call.
    pub fn orphan_merge_requests(&self) -> Vec<&MergeRequest> {
        let linked: HashSet<u64> = self
            .sections
            .iter()
            .flat_map(|s| &s.items)
            .filter_map(|i| i.merge_request.as_ref().map(|mr| mr.iid))
            .collect();

        self.merge_requests
            .iter()
            .filter(|mr| !linked.contains(&mr.iid))
            .collect()
    }

    /// Total number of items across all sections
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Check if the note has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_type_order() {
        let mut shuffled = vec![
            CommitType::Other,
            CommitType::Test,
            CommitType::Feature,
            CommitType::Chore,
            CommitType::BugFix,
        ];
        shuffled.sort();
        assert_eq!(shuffled[0], CommitType::Feature);
        assert_eq!(shuffled[1], CommitType::BugFix);
        assert_eq!(shuffled[4], CommitType::Other);
        assert!(CommitType::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_section_titles_and_glyphs() {
        let section = ReleaseNoteSection::new(CommitType::BugFix);
        assert_eq!(section.title, "Bug Fixes");
        assert_eq!(section.glyph, "🐛");
        assert!(section.is_empty());
        assert_eq!(CommitType::Chore.glyph(), "⚙️");
    }

    #[test]
    fn test_merge_request_from_api_json() {
        let json = r#"{
            "iid": 42,
            "title": "ABC-1 fix totals",
            "description": null,
            "state": "merged",
            "merged_at": "2024-02-01T12:00:00.000Z",
            "web_url": "https://git.example.com/p/-/merge_requests/42",
            "labels": ["backend", "bug"],
            "source_branch": "feature/ABC-1",
            "target_branch": "main",
            "author": {"id": 7, "name": "Jane Doe", "username": "jdoe"},
            "merged_by": null
        }"#;
        let mr: MergeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(mr.iid, 42);
        assert_eq!(mr.description, "");
        assert_eq!(mr.state, MergeRequestState::Merged);
        assert!(mr.merged_at.is_some());
        assert_eq!(mr.labels, vec!["backend", "bug"]);
        assert_eq!(mr.author_username(), Some("jdoe"));
        assert!(mr.merged_by.is_none());
    }

    #[test]
    fn test_merge_request_tolerates_sparse_json() {
        let json = r#"{"iid": 3, "labels": null, "state": "whatever", "merged_at": "soon"}"#;
        let mr: MergeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(mr.title, "");
        assert!(mr.labels.is_empty());
        assert_eq!(mr.state, MergeRequestState::Unknown);
        assert!(mr.merged_at.is_none());
        assert_eq!(mr.author_username(), None);
    }

    #[test]
    fn test_merge_request_tolerates_null_numbers() {
        let json = r#"{"iid": 3, "title": "x", "author": {"id": null, "username": "bob"}}"#;
        let mr: MergeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(mr.author.as_ref().map(|a| a.id), Some(0));
        assert_eq!(mr.author_username(), Some("bob"));

        let mr: MergeRequest = serde_json::from_str(r#"{"title": "no number"}"#).unwrap();
        assert_eq!(mr.iid, 0);

        let mr: MergeRequest = serde_json::from_str(r#"{"iid": null, "title": "null"}"#).unwrap();
        assert_eq!(mr.iid, 0);
        assert_eq!(mr.title, "null");
    }

    #[test]
    fn test_orphans_exclude_linked() {
        let linked = MergeRequest::new(1, "linked", "u1");
        let orphan = MergeRequest::new(2, "orphan", "u2");

        let mut section = ReleaseNoteSection::new(CommitType::Feature);
        section.items.push(ReleaseNoteItem {
            description: "Thing".to_string(),
            tickets: vec![],
            short_hash: "abc1234".to_string(),
            merge_request: Some(linked.clone()),
        });

        let note = ReleaseNote {
            version: "v1".to_string(),
            from_ref: "v0".to_string(),
            to_ref: "v1".to_string(),
            generated_at: Utc::now(),
            total_commits: 1,
            sections: vec![section],
            merge_requests: vec![linked, orphan],
        };

        let orphans = note.orphan_merge_requests();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].iid, 2);
        assert_eq!(note.item_count(), 1);
        assert!(!note.is_empty());
    }
}
