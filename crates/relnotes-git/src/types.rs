//! Git types

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Information about a git commit.
///
/// Deserializing accepts both these field names and the hosting platform's
/// compare-API names (`id`, `short_id`, `author_name`, `created_at`). Missing
/// or null fields fall back to defaults instead of failing the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawCommitRecord")]
pub struct CommitInfo {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash
    pub short_hash: String,
    /// Commit message (first line)
    pub message: String,
    /// Remainder of the commit message after the first line
    pub body: Option<String>,
    /// Author name
    pub author: String,
    /// Author email
    pub author_email: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// Create a new CommitInfo
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        author_email: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = short_hash_of(&hash);

        Self {
            hash,
            short_hash,
            message: message.into(),
            body: None,
            author: author.into(),
            author_email: author_email.into(),
            timestamp,
        }
    }

    /// Set the commit body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.body = if body.trim().is_empty() {
            None
        } else {
            Some(body)
        };
        self
    }

    /// Override the short hash
    pub fn with_short_hash(mut self, short_hash: impl Into<String>) -> Self {
        self.short_hash = short_hash.into();
        self
    }

    /// Get the full message including body
    pub fn full_message(&self) -> String {
        match &self.body {
            Some(body) => format!("{}\n\n{}", self.message, body),
            None => self.message.clone(),
        }
    }
}

/// Wire shape of a commit record before normalization
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCommitRecord {
    #[serde(alias = "id")]
    hash: Option<String>,
    #[serde(alias = "short_id")]
    short_hash: Option<String>,
    message: Option<String>,
    body: Option<String>,
    #[serde(alias = "author_name")]
    author: Option<String>,
    author_email: Option<String>,
    #[serde(alias = "created_at")]
    timestamp: Option<String>,
}

impl From<RawCommitRecord> for CommitInfo {
    fn from(raw: RawCommitRecord) -> Self {
        let hash = raw.hash.unwrap_or_default();
        let timestamp = parse_timestamp_or_now(raw.timestamp.as_deref(), &hash);

        // A multi-line message carries its body after the first line
        let full = raw.message.unwrap_or_default();
        let (message, inline_body) = match full.split_once('\n') {
            Some((first, rest)) => (first.trim_end().to_string(), Some(rest.trim().to_string())),
            None => (full, None),
        };

        let mut info = CommitInfo::new(
            hash,
            message,
            raw.author.unwrap_or_default(),
            raw.author_email.unwrap_or_default(),
            timestamp,
        );

        if let Some(short) = raw.short_hash.filter(|s| !s.is_empty()) {
            info = info.with_short_hash(short);
        }

        match raw.body.or(inline_body) {
            Some(body) => info.with_body(body),
            None => info,
        }
    }
}

fn short_hash_of(hash: &str) -> String {
    hash.chars().take(7).collect()
}

/// Parse a timestamp in any of the formats commit sources commonly emit.
///
/// Accepts RFC 3339, git's `%ai` form (`2024-01-31 10:00:00 +0100`), a naive
/// ISO date-time (taken as UTC) and a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a timestamp, substituting the current time when it is missing or malformed
fn parse_timestamp_or_now(raw: Option<&str>, hash: &str) -> DateTime<Utc> {
    match raw.map(|r| (r, parse_timestamp(r))) {
        Some((_, Some(ts))) => ts,
        Some((r, None)) => {
            warn!(hash, timestamp = r, "unparseable commit timestamp, using current time");
            Utc::now()
        }
        None => {
            warn!(hash, "commit has no timestamp, using current time");
            Utc::now()
        }
    }
}

/// Information about a git tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Time of the tagged commit (or tagger time for annotated tags)
    pub timestamp: Option<DateTime<Utc>>,
    /// Extracted version from tag name
    pub version: Option<String>,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        let name = name.into();
        let version = extract_version(&name);

        Self {
            name,
            commit_hash: commit_hash.into(),
            timestamp: None,
            version,
        }
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Extract version from a tag name
fn extract_version(tag: &str) -> Option<String> {
    // v1.0.0, 1.0.0, package@1.0.0, package-v1.0.0
    let tag = tag.strip_prefix('v').unwrap_or(tag);

    if let Some(pos) = tag.rfind('@') {
        let version_part = &tag[pos + 1..];
        let version = version_part.strip_prefix('v').unwrap_or(version_part);
        if looks_like_version(version) {
            return Some(version.to_string());
        }
    }

    if let Some(pos) = tag.rfind("-v") {
        let version = &tag[pos + 2..];
        if looks_like_version(version) {
            return Some(version.to_string());
        }
    }

    if looks_like_version(tag) {
        return Some(tag.to_string());
    }

    None
}

fn looks_like_version(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    parts.len() >= 2 && parts[0].parse::<u64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version("v1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("package@v1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("pkg-v2.0.0"), Some("2.0.0".to_string()));
        assert_eq!(extract_version("not-a-version"), None);
    }

    #[test]
    fn test_commit_info() {
        let commit = CommitInfo::new(
            "abc1234567890",
            "feat: add feature",
            "Author",
            "author@example.com",
            Utc::now(),
        );
        assert_eq!(commit.short_hash, "abc1234");
        assert_eq!(commit.full_message(), "feat: add feature");
    }

    #[test]
    fn test_blank_body_is_dropped() {
        let commit = CommitInfo::new("abc", "fix: x", "A", "a@b", Utc::now()).with_body("  \n");
        assert!(commit.body.is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-05T10:20:30+02:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-03-05T08:20:30+00:00");

        let git = parse_timestamp("2024-03-05 10:20:30 +0100").unwrap();
        assert_eq!(git.to_rfc3339(), "2024-03-05T09:20:30+00:00");

        let naive = parse_timestamp("2024-03-05T10:20:30.123").unwrap();
        assert_eq!(naive.day(), 5);

        let date = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-05T00:00:00+00:00");

        assert!(parse_timestamp("last tuesday").is_none());
    }

    #[test]
    fn test_deserialize_compare_api_shape() {
        let json = r#"{
            "id": "0123456789abcdef",
            "short_id": "0123456",
            "message": "fix: correct totals ABC-1\n\nAlso touches XY-2",
            "author_name": "Jane",
            "created_at": "2024-01-02T03:04:05Z"
        }"#;
        let commit: CommitInfo = serde_json::from_str(json).unwrap();
        assert_eq!(commit.hash, "0123456789abcdef");
        assert_eq!(commit.short_hash, "0123456");
        assert_eq!(commit.message, "fix: correct totals ABC-1");
        assert_eq!(commit.body.as_deref(), Some("Also touches XY-2"));
        assert_eq!(commit.author, "Jane");
        assert_eq!(commit.timestamp.year(), 2024);
    }

    #[test]
    fn test_deserialize_tolerates_missing_and_null() {
        let json = r#"{"hash": "deadbeefcafe", "message": null, "timestamp": "garbage"}"#;
        let before = Utc::now();
        let commit: CommitInfo = serde_json::from_str(json).unwrap();
        assert_eq!(commit.short_hash, "deadbee");
        assert_eq!(commit.message, "");
        assert_eq!(commit.author, "");
        assert!(commit.timestamp >= before);
    }

    #[test]
    fn test_serialized_commit_reads_back() {
        let commit = CommitInfo::new("abc1234567890", "docs: readme", "A", "a@b", Utc::now())
            .with_body("details");
        let json = serde_json::to_string(&commit).unwrap();
        let back: CommitInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, "docs: readme");
        assert_eq!(back.body.as_deref(), Some("details"));
        assert_eq!(back.timestamp.timestamp(), commit.timestamp.timestamp());
    }
}
