//! Configuration validation

use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_git(config)?;
    validate_release_notes(config)?;
    validate_merge_requests(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if let Some(pattern) = &config.git.tag_pattern {
        if let Err(e) = Regex::new(pattern) {
            return Err(ConfigError::InvalidValue {
                field: "git.tag_pattern".to_string(),
                message: e.to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_release_notes(config: &Config) -> Result<()> {
    let notes = &config.release_notes;
    check_strftime("release_notes.date_format", &notes.date_format)?;
    check_strftime("release_notes.timestamp_format", &notes.timestamp_format)?;
    Ok(())
}

fn validate_merge_requests(config: &Config) -> Result<()> {
    if config.merge_requests.lookback_days == 0 {
        return Err(ConfigError::InvalidValue {
            field: "merge_requests.lookback_days".to_string(),
            message: "must be at least 1".to_string(),
        }
        .into());
    }

    Ok(())
}

fn check_strftime(field: &str, format: &str) -> Result<()> {
    if format.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: "format cannot be empty".to_string(),
        }
        .into());
    }

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("'{}' is not a valid strftime format", format),
        }
        .into());
    }

    Ok(())
}
