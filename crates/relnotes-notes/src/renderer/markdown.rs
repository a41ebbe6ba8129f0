//! Markdown release note renderer

use std::fmt::Write as _;

use relnotes_core::config::ReleaseNotesConfig;
use tracing::{debug, instrument};

use super::ReleaseNoteRenderer;
use crate::types::{MergeRequest, ReleaseNote, ReleaseNoteItem};

/// Markdown release note renderer
pub struct MarkdownRenderer {
    /// strftime format of the header date line
    pub date_format: String,
    /// strftime format of the footer timestamp
    pub timestamp_format: String,
    /// Whether to list merge requests no item links to
    pub include_orphans: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer with default formats
    pub fn new() -> Self {
        Self::from_config(&ReleaseNotesConfig::default())
    }

    /// Create a renderer from configuration
    pub fn from_config(config: &ReleaseNotesConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            timestamp_format: config.timestamp_format.clone(),
            include_orphans: config.include_orphans,
        }
    }

    /// Set whether the orphan block is rendered
    pub fn with_orphans(mut self, include: bool) -> Self {
        self.include_orphans = include;
        self
    }

    fn write_header(&self, out: &mut String, note: &ReleaseNote) {
        let _ = writeln!(out, "# Release Notes - {}", note.version);
        out.push('\n');
        let _ = writeln!(out, "**Date**: {}", note.generated_at.format(&self.date_format));
        let _ = writeln!(out, "**Range**: `{}` → `{}`", note.from_ref, note.to_ref);
        let _ = writeln!(out, "**Commits**: {}", note.total_commits);

        if !note.merge_requests.is_empty() {
            let _ = writeln!(out, "**Merge Requests**: {}", note.merge_requests.len());
        }

        out.push('\n');
    }

    fn write_item(out: &mut String, item: &ReleaseNoteItem) {
        out.push_str("- ");

        if !item.tickets.is_empty() {
            let _ = write!(out, "**[{}]** ", item.tickets.join(", "));
        }

        out.push_str(&item.description);

        match &item.merge_request {
            Some(mr) => {
                let _ = write!(out, " ([!{}]({}))", mr.iid, mr.web_url);
                write_author(out, mr);
            }
            None => {
                let _ = write!(out, " (`{}`)", item.short_hash);
            }
        }

        out.push('\n');
    }

    fn write_orphans(out: &mut String, orphans: &[&MergeRequest]) {
        out.push_str("## 🔗 Other Merge Requests\n\n");

        for mr in orphans {
            let _ = write!(out, "- **!{}**: {}", mr.iid, mr.title);
            write_author(out, mr);

            if !mr.labels.is_empty() {
                let _ = write!(out, " `{}`", mr.labels.join("`, `"));
            }

            out.push('\n');
        }

        out.push('\n');
    }
}

fn write_author(out: &mut String, mr: &MergeRequest) {
    if let Some(username) = mr.author_username() {
        let _ = write!(out, " by @{}", username);
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseNoteRenderer for MarkdownRenderer {
    #[instrument(skip(self, note), fields(version = %note.version, section_count = note.sections.len()))]
    fn render(&self, note: &ReleaseNote) -> String {
        let mut output = String::new();

        self.write_header(&mut output, note);

        for section in &note.sections {
            if section.is_empty() {
                continue;
            }

            let _ = writeln!(output, "## {} {}", section.glyph, section.title);
            output.push('\n');

            for item in &section.items {
                Self::write_item(&mut output, item);
            }

            output.push('\n');
        }

        // Re-scan the items being rendered so a linked merge request never shows twice
        let orphans = note.orphan_merge_requests();
        if self.include_orphans && !orphans.is_empty() {
            Self::write_orphans(&mut output, &orphans);
        }

        output.push_str("---\n");
        let _ = writeln!(
            output,
            "*Generated on {}*",
            note.generated_at.format(&self.timestamp_format)
        );

        debug!(
            output_len = output.len(),
            orphan_count = orphans.len(),
            "markdown release note rendered"
        );
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}
