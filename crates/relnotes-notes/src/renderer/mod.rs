//! Release note renderers

mod markdown;

pub use markdown::MarkdownRenderer;

use crate::types::ReleaseNote;

/// Trait for release note renderers
pub trait ReleaseNoteRenderer: Send + Sync {
    /// Render a release note to a document
    fn render(&self, note: &ReleaseNote) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}
