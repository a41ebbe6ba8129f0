//! Commit and merge request input files

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use relnotes_core::config::MergeRequestsConfig;
use relnotes_core::InputError;
use relnotes_git::{parse_timestamp, CommitInfo};
use relnotes_notes::{MergeRequest, MergeRequestState};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON array of commit records
#[instrument]
pub fn load_commits(path: &Path) -> Result<Vec<CommitInfo>, InputError> {
    let commits: Vec<CommitInfo> = read_json(path)?;
    info!(count = commits.len(), "loaded commits from file");
    Ok(commits)
}

/// Load a JSON array of merge requests
#[instrument]
pub fn load_merge_requests(path: &Path) -> Result<Vec<MergeRequest>, InputError> {
    let merge_requests: Vec<MergeRequest> = read_json(path)?;
    info!(count = merge_requests.len(), "loaded merge requests from file");
    Ok(merge_requests)
}

/// Parse a date given on the command line
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, InputError> {
    parse_timestamp(raw).ok_or_else(|| InputError::InvalidDate(raw.to_string()))
}

/// Parse the end of a window; a bare date covers that whole day
pub fn parse_end_date(raw: &str) -> Result<DateTime<Utc>, InputError> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(day) => day
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| InputError::InvalidDate(raw.to_string())),
        Err(_) => parse_date(raw),
    }
}

/// Which merge requests are handed to the aggregator
#[derive(Debug, Clone)]
pub struct MergeRequestFilter {
    /// Keep only merged merge requests with a merge time in the window
    pub merged_only: bool,
    /// Start of the merge window
    pub since: DateTime<Utc>,
    /// End of the merge window
    pub until: DateTime<Utc>,
}

impl MergeRequestFilter {
    /// Window ending `until` (default now) and starting `since`, or
    /// `lookback_days` before the end when no start is given
    pub fn from_config(
        config: &MergeRequestsConfig,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Self {
        let until = until.unwrap_or_else(Utc::now);
        let since = since.unwrap_or_else(|| {
            until
                .checked_sub_signed(Duration::days(i64::from(config.lookback_days)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        });

        Self {
            merged_only: config.merged_only,
            since,
            until,
        }
    }

    fn in_window(&self, at: DateTime<Utc>) -> bool {
        at >= self.since && at <= self.until
    }

    /// Whether a merge request passes the filter
    pub fn accepts(&self, mr: &MergeRequest) -> bool {
        match (self.merged_only, mr.merged_at) {
            (true, Some(at)) => mr.state == MergeRequestState::Merged && self.in_window(at),
            (true, None) => false,
            (false, Some(at)) => self.in_window(at),
            (false, None) => true,
        }
    }

    /// Keep the accepted merge requests in their original order
    pub fn apply(&self, merge_requests: Vec<MergeRequest>) -> Vec<MergeRequest> {
        let total = merge_requests.len();
        let kept: Vec<_> = merge_requests
            .into_iter()
            .filter(|mr| self.accepts(mr))
            .collect();

        debug!(
            total,
            kept = kept.len(),
            since = %self.since,
            until = %self.until,
            "filtered merge requests"
        );
        kept
    }
}
