//! Commit to merge request correlation

use tracing::trace;

use crate::types::{Commit, MergeRequest};

/// Strategy that picks at most one merge request for a commit
pub trait MergeRequestMatcher: Send + Sync {
    /// Find the merge request a commit most plausibly came from
    fn find_match<'a>(
        &self,
        commit: &Commit,
        candidates: &'a [MergeRequest],
    ) -> Option<&'a MergeRequest>;
}

/// Cheap first-match heuristic.
///
/// 1. For each ticket id of the commit (in extraction order), the first
///    candidate whose title, description or source branch contains it,
///    ignoring case.
/// 2. Otherwise the first candidate whose lower-cased title contains the
///    lower-cased cleaned description, or is contained in it.
///
/// Ties go to the earliest candidate. Known limitation: a short or empty
/// title is a substring of many descriptions and will match them.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMatcher;

impl HeuristicMatcher {
    /// Create a new matcher
    pub fn new() -> Self {
        Self
    }

    fn match_by_ticket<'a>(
        commit: &Commit,
        candidates: &'a [MergeRequest],
    ) -> Option<&'a MergeRequest> {
        commit.tickets.iter().find_map(|ticket| {
            let needle = ticket.to_lowercase();
            candidates.iter().find(|mr| {
                mr.title.to_lowercase().contains(&needle)
                    || mr.description.to_lowercase().contains(&needle)
                    || mr.source_branch.to_lowercase().contains(&needle)
            })
        })
    }

    fn match_by_title<'a>(
        commit: &Commit,
        candidates: &'a [MergeRequest],
    ) -> Option<&'a MergeRequest> {
        let description = commit.description().to_lowercase();
        candidates.iter().find(|mr| {
            let title = mr.title.to_lowercase();
            title.contains(&description) || description.contains(&title)
        })
    }
}

impl MergeRequestMatcher for HeuristicMatcher {
    fn find_match<'a>(
        &self,
        commit: &Commit,
        candidates: &'a [MergeRequest],
    ) -> Option<&'a MergeRequest> {
        if let Some(mr) = Self::match_by_ticket(commit, candidates) {
            trace!(commit = %commit.short_hash, iid = mr.iid, "matched by ticket");
            return Some(mr);
        }

        let found = Self::match_by_title(commit, candidates);
        if let Some(mr) = found {
            trace!(commit = %commit.short_hash, iid = mr.iid, "matched by title");
        }
        found
    }
}

/// Matcher that never links anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMatcher;

impl MergeRequestMatcher for NoMatcher {
    fn find_match<'a>(&self, _: &Commit, _: &'a [MergeRequest]) -> Option<&'a MergeRequest> {
        None
    }
}
