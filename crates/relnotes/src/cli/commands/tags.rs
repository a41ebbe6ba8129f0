//! Tags command

use clap::Args;
use console::style;
use tracing::info;

use relnotes_core::config::load_config_or_default;
use relnotes_git::{GitRepo, TagInfo};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// List repository tags, newest first
#[derive(Debug, Args)]
pub struct TagsCommand {
    /// Ignore the configured tag pattern
    #[arg(short, long)]
    pub all: bool,

    /// Show at most this many tags
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl TagsCommand {
    /// Execute the tags command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(all = self.all, limit = ?self.limit, "executing tags command");
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd)?;
        let repo = GitRepo::discover(&cwd)?;

        let pattern = config.git.tag_pattern.as_deref().filter(|_| !self.all);
        let tags = self.collect(&repo, pattern)?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tags)?),
            OutputFormat::Text => {
                if tags.is_empty() {
                    if !cli.quiet {
                        output::warning("No tags found");
                    }
                    return Ok(());
                }

                for tag in &tags {
                    println!("{}", format_tag_line(tag));
                }
            }
        }

        Ok(())
    }

    fn collect(&self, repo: &GitRepo, pattern: Option<&str>) -> anyhow::Result<Vec<TagInfo>> {
        let mut tags = match pattern {
            Some(p) => repo.tags_matching(p)?,
            None => repo.tags()?,
        };

        if let Some(limit) = self.limit {
            tags.truncate(limit);
        }

        Ok(tags)
    }
}

fn format_tag_line(tag: &TagInfo) -> String {
    let short: String = tag.commit_hash.chars().take(7).collect();
    let date = tag
        .timestamp
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    format!(
        "{:<24} {} {}",
        output::tag_style().apply_to(&tag.name),
        style(short).dim(),
        date
    )
}
