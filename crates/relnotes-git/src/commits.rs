//! Commit history operations

use chrono::{TimeZone, Utc};
use git2::{Oid, Sort};
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::CommitInfo;

impl GitRepo {
    /// Get the commits reachable from `to` (default HEAD) but not from `from`,
    /// newest first.
    #[instrument(skip(self))]
    pub fn commits_between(&self, from: &str, to: Option<&str>) -> Result<Vec<CommitInfo>> {
        let from_oid = self.resolve_commit(from)?.id();
        let to_oid = match to {
            Some(reference) => self.resolve_commit(reference)?.id(),
            None => self.head_commit()?.id(),
        };

        let commits = self.walk(to_oid, Some(from_oid))?;
        debug!(from, to = to.unwrap_or("HEAD"), count = commits.len(), "collected commits");
        Ok(commits)
    }

    fn walk(&self, start: Oid, hide: Option<Oid>) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(start)?;
        if let Some(hide) = hide {
            revwalk.hide(hide)?;
        }

        let mut commits = Vec::new();

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(commit_to_info(&commit));
        }

        Ok(commits)
    }
}

/// Convert a git2 Commit to CommitInfo
fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
    let hash = commit.id().to_string();
    let author = commit.author();

    let message = commit.summary().unwrap_or_default().to_string();

    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    CommitInfo::new(
        hash,
        message,
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or_default(),
        timestamp,
    )
    .with_body(commit.body().unwrap_or_default())
}
