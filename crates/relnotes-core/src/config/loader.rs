//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find a configuration file in `start_dir` or any of its parents.
///
/// The first name from [`config_file_names`] that exists wins at each level.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration or use defaults.
///
/// A config file that exists but fails to parse or validate is reported as
/// an error; only a missing file falls back to defaults.
pub fn load_config_or_default(dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            warn!(dir = %dir.display(), "no config found, using defaults");
            Ok((Config::default(), None))
        }
    }
}

/// Serialize a configuration as TOML
pub fn config_to_toml(config: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(config).map_err(ConfigError::TomlSerialize)?)
}
