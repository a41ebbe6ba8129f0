//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use relnotes_core::config::defaults::{
    DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML,
};
use relnotes_core::config::{config_to_toml, Config};

use crate::cli::output;
use crate::cli::Cli;

/// Write a default configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self.write_config(&cwd)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
        }

        Ok(())
    }

    /// Write the default configuration under `dir`, returning its path
    pub fn write_config(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let default_name = if self.toml {
            DEFAULT_CONFIG_TOML
        } else {
            DEFAULT_CONFIG_YAML
        };
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| dir.join(default_name));

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let content = if self.toml {
            let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
            config_to_toml(&config)?
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };

        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }
}
