//! Relnotes Notes - Release note assembly
//!
//! Classifies commits, links them to merge requests and renders the
//! grouped result as a Markdown document.

pub mod aggregator;
pub mod classifier;
pub mod matcher;
pub mod renderer;
pub mod types;

pub use aggregator::{aggregate, ReleaseNoteAggregator};
pub use classifier::{classify, classify_all};
pub use matcher::{HeuristicMatcher, MergeRequestMatcher, NoMatcher};
pub use renderer::{MarkdownRenderer, ReleaseNoteRenderer};
pub use types::{
    Commit, CommitType, MergeRequest, MergeRequestState, ReleaseNote, ReleaseNoteItem,
    ReleaseNoteSection, UserRef,
};
