//! Configuration types

use serde::{Deserialize, Serialize};

/// Main configuration for relnotes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Git configuration
    pub git: GitConfig,

    /// Release notes rendering configuration
    pub release_notes: ReleaseNotesConfig,

    /// Merge request input configuration
    pub merge_requests: MergeRequestsConfig,
}

/// Git configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Regex restricting which tags count as releases
    pub tag_pattern: Option<String>,
}

/// Release notes configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseNotesConfig {
    /// strftime format of the header date line
    pub date_format: String,

    /// strftime format of the footer timestamp
    pub timestamp_format: String,

    /// Whether to list merge requests that no commit was linked to
    pub include_orphans: bool,

    /// Whether to correlate commits with merge requests at all
    pub match_merge_requests: bool,
}

impl Default for ReleaseNotesConfig {
    fn default() -> Self {
        Self {
            date_format: "%d %B %Y".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            include_orphans: true,
            match_merge_requests: true,
        }
    }
}

/// Merge request input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeRequestsConfig {
    /// How far back to accept merged merge requests when no window is given
    pub lookback_days: u32,

    /// Whether to drop merge requests that are not in the merged state
    pub merged_only: bool,
}

impl Default for MergeRequestsConfig {
    fn default() -> Self {
        Self {
            lookback_days: 180,
            merged_only: true,
        }
    }
}
