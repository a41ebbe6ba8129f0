//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{CompletionsCommand, GenerateCommand, InitCommand, TagsCommand};

/// relnotes - Release notes from conventional commits and merge requests
#[derive(Debug, Parser)]
#[command(name = "relnotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate release notes for a range of commits
    Generate(GenerateCommand),

    /// List repository tags, newest first
    Tags(TagsCommand),

    /// Write a default configuration file
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Generate(ref cmd) => cmd.execute(&self),
            Commands::Tags(ref cmd) => cmd.execute(&self),
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}
