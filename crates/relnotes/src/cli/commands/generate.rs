//! Generate command

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use relnotes_core::config::load_config_or_default;
use relnotes_core::{Config, GitError};
use relnotes_git::{GitRepo, TagInfo};
use relnotes_notes::{
    classify_all, MarkdownRenderer, NoMatcher, ReleaseNote, ReleaseNoteAggregator,
    ReleaseNoteRenderer,
};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};
use crate::input::{self, MergeRequestFilter};

/// Generate release notes for a range of commits
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Start of the range (exclusive); defaults to the previous release tag
    #[arg(long, value_name = "REF")]
    pub from: Option<String>,

    /// End of the range (inclusive); defaults to the latest release tag
    #[arg(long, value_name = "REF")]
    pub to: Option<String>,

    /// Read commits from a JSON file instead of the local repository
    #[arg(long, value_name = "FILE")]
    pub commits: Option<PathBuf>,

    /// Read merge requests from a JSON file
    #[arg(long = "merge-requests", value_name = "FILE")]
    pub merge_requests: Option<PathBuf>,

    /// Write the release notes to a file as well
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Earliest merge time of merge requests to consider
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,

    /// Latest merge time of merge requests to consider
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,
}

/// Commit range a release note covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRange {
    pub from: String,
    /// `None` means HEAD
    pub to: Option<String>,
}

/// Pick the range from the release tags when `--from` is absent.
///
/// With an explicit `to`, the range starts at the newest release tag other
/// than `to`. Otherwise it spans the two latest release tags, or runs from
/// the only release tag to HEAD.
fn pick_range(
    to: Option<&str>,
    previous: Option<&TagInfo>,
    latest: Option<&TagInfo>,
) -> Option<ReleaseRange> {
    match to {
        Some(to) => {
            let base = match latest {
                Some(l) if l.name == to => previous,
                other => other,
            }?;
            Some(ReleaseRange {
                from: base.name.clone(),
                to: Some(to.to_string()),
            })
        }
        None => match (previous, latest) {
            (Some(p), Some(l)) => Some(ReleaseRange {
                from: p.name.clone(),
                to: Some(l.name.clone()),
            }),
            (None, Some(l)) => Some(ReleaseRange {
                from: l.name.clone(),
                to: None,
            }),
            _ => None,
        },
    }
}

/// Write a rendered document as-is; it already ends with a newline
fn emit<W: Write>(mut out: W, document: &str) -> std::io::Result<()> {
    out.write_all(document.as_bytes())?;
    out.flush()
}

impl GenerateCommand {
    /// Execute the generate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            from = ?self.from,
            to = ?self.to,
            commits_file = ?self.commits,
            merge_requests_file = ?self.merge_requests,
            "executing generate command"
        );
        let cwd = std::env::current_dir()?;
        let (config, config_path) = load_config_or_default(&cwd)?;

        if cli.verbose {
            if let Some(path) = &config_path {
                output::info(&format!(
                    "Using configuration {}",
                    output::path_style().apply_to(path.display())
                ));
            }
        }

        let note = self.build_note(&cwd, &config)?;

        if !cli.quiet {
            output::info(&format!(
                "Release notes for {} → {}: {} commits, {} merge requests",
                output::tag_style().apply_to(&note.from_ref),
                output::tag_style().apply_to(&note.to_ref),
                note.total_commits,
                note.merge_requests.len()
            ));
            if note.is_empty() {
                output::warning("No commits found in range");
            }
        }

        let document = match cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(&note)?,
            OutputFormat::Text => MarkdownRenderer::from_config(&config.release_notes).render(&note),
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, &document)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !cli.quiet {
                    output::success(&format!(
                        "Release notes written to {}",
                        output::path_style().apply_to(path.display())
                    ));
                }
            }
            None => emit(std::io::stdout().lock(), &document)?,
        }

        Ok(())
    }

    /// Resolve the range, load inputs and aggregate them
    pub fn build_note(&self, cwd: &Path, config: &Config) -> anyhow::Result<ReleaseNote> {
        // A repository is only needed when something must be read from it
        let repo = match (&self.commits, &self.from) {
            (Some(_), Some(_)) => None,
            _ => Some(GitRepo::discover(cwd)?),
        };

        let range = match (&self.from, &repo) {
            (Some(from), _) => ReleaseRange {
                from: from.clone(),
                to: self.to.clone(),
            },
            (None, Some(repo)) => {
                let pattern = config.git.tag_pattern.as_deref();
                let (previous, latest) = repo.release_range(pattern)?;
                pick_range(self.to.as_deref(), previous.as_ref(), latest.as_ref())
                    .ok_or_else(|| GitError::NoTags(pattern.unwrap_or("*").to_string()))?
            }
            (None, None) => anyhow::bail!("--from is required outside a git repository"),
        };

        let raw_commits = match (&self.commits, &repo) {
            (Some(path), _) => input::load_commits(path)?,
            (None, Some(repo)) => repo.commits_between(&range.from, range.to.as_deref())?,
            (None, None) => anyhow::bail!("--commits is required outside a git repository"),
        };

        let merge_requests = match &self.merge_requests {
            Some(path) => {
                let since = self.since.as_deref().map(input::parse_date).transpose()?;
                let until = self.until.as_deref().map(input::parse_end_date).transpose()?;
                MergeRequestFilter::from_config(&config.merge_requests, since, until)
                    .apply(input::load_merge_requests(path)?)
            }
            None => Vec::new(),
        };

        let commits = classify_all(&raw_commits);

        let mut aggregator = ReleaseNoteAggregator::new();
        if !config.release_notes.match_merge_requests {
            aggregator = aggregator.with_matcher(NoMatcher);
        }

        Ok(aggregator.aggregate(&commits, &merge_requests, &range.from, range.to.as_deref()))
    }
}
