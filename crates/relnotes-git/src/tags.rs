//! Tag operations

use chrono::{TimeZone, Utc};
use regex::Regex;
use semver::Version;
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;
use relnotes_core::error::GitError;

impl GitRepo {
    /// Get all tags, newest first.
    ///
    /// Lightweight tags take the time of the commit they point to; annotated
    /// tags take the tagger time.
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if let Ok(commit) = self.repo.find_commit(oid) {
                let timestamp = Utc.timestamp_opt(commit.time().seconds(), 0).single();
                let mut info = TagInfo::new(&name, commit.id().to_string());
                if let Some(ts) = timestamp {
                    info = info.with_timestamp(ts);
                }
                tags.push(info);
            } else if let Ok(tag) = self.repo.find_tag(oid) {
                let mut info = TagInfo::new(&name, tag.target_id().to_string());
                if let Some(ts) = tag
                    .tagger()
                    .and_then(|t| Utc.timestamp_opt(t.when().seconds(), 0).single())
                {
                    info = info.with_timestamp(ts);
                }
                tags.push(info);
            }

            true
        })?;

        tags.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.name.cmp(&a.name)));

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }

    /// Get tags matching a pattern, newest first
    pub fn tags_matching(&self, pattern: &str) -> Result<Vec<TagInfo>> {
        let regex = Regex::new(pattern).map_err(|e| GitError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let matching: Vec<_> = self
            .tags()?
            .into_iter()
            .filter(|t| regex.is_match(&t.name))
            .collect();

        Ok(matching)
    }

    /// The previous and latest release tags, ordered by semantic version.
    ///
    /// Returns `(None, Some(latest))` when only one versioned tag exists and
    /// `(None, None)` when there are none.
    #[instrument(skip(self))]
    pub fn release_range(&self, pattern: Option<&str>) -> Result<(Option<TagInfo>, Option<TagInfo>)> {
        let tags = match pattern {
            Some(p) => self.tags_matching(p)?,
            None => self.tags()?,
        };

        let mut versioned: Vec<_> = tags
            .into_iter()
            .filter_map(|t| {
                t.version
                    .as_ref()
                    .and_then(|v| Version::parse(v).ok())
                    .map(|v| (t, v))
            })
            .collect();

        versioned.sort_by(|a, b| b.1.cmp(&a.1));

        let mut newest = versioned.into_iter().map(|(t, _)| t);
        let latest = newest.next();
        let previous = newest.next();

        debug!(
            latest = ?latest.as_ref().map(|t| &t.name),
            previous = ?previous.as_ref().map(|t| &t.name),
            "resolved release range"
        );
        Ok((previous, latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_repo_with_tags(tags: &[&str]) -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();

        std::fs::write(temp.path().join("file.txt"), "content").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("file.txt")).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let commit = repo.find_commit(oid).unwrap();
        for tag in tags {
            repo.tag_lightweight(tag, commit.as_object(), false).unwrap();
        }

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo)
    }

    #[test]
    fn test_list_tags() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        let tags = repo.tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v1.0.0");
        assert!(tags[0].timestamp.is_some());
    }

    #[test]
    fn test_tag_version_extracted() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        let tags = repo.tags().unwrap();
        assert_eq!(tags[0].version, Some("1.0.0".to_string()));
    }

    #[test]
    fn test_invalid_tag_pattern() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        let err = repo.tags_matching("v(").unwrap_err();
        assert!(matches!(
            err,
            GitError::InvalidPattern { ref pattern, .. } if pattern == "v("
        ));
        assert!(err.to_string().starts_with("Invalid tag pattern 'v('"));
        assert!(repo.release_range(Some("v(")).is_err());
    }

    #[test]
    fn test_release_range_orders_by_version() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.2.0", "v1.10.0", "v1.9.3", "nightly"]);
        let (previous, latest) = repo.release_range(None).unwrap();
        assert_eq!(latest.unwrap().name, "v1.10.0");
        assert_eq!(previous.unwrap().name, "v1.9.3");
    }

    #[test]
    fn test_release_range_single_tag() {
        let (_temp, repo) = setup_repo_with_tags(&["v0.1.0"]);
        let (previous, latest) = repo.release_range(None).unwrap();
        assert!(previous.is_none());
        assert_eq!(latest.unwrap().name, "v0.1.0");
    }

    #[test]
    fn test_release_range_with_pattern() {
        let (_temp, repo) = setup_repo_with_tags(&["api-v2.0.0", "v1.0.0", "v1.1.0"]);
        let (previous, latest) = repo.release_range(Some(r"^v\d")).unwrap();
        assert_eq!(latest.unwrap().name, "v1.1.0");
        assert_eq!(previous.unwrap().name, "v1.0.0");
    }
}
