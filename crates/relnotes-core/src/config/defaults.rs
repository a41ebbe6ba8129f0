//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "relnotes.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "relnotes.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".relnotes.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".relnotes.toml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# relnotes configuration

git:
  # Only tags matching this regex are considered releases
  # e.g. "^v\\d+\\.\\d+\\.\\d+$"
  tag_pattern: ~

release_notes:
  date_format: "%d %B %Y"
  timestamp_format: "%Y-%m-%d %H:%M:%S"
  include_orphans: true
  match_merge_requests: true

merge_requests:
  lookback_days: 180
  merged_only: true
"#;
