//! relnotes git - local repository data source
//!
//! This crate reads commit history and tags from a local git repository and
//! defines the raw commit record the release note engine consumes.

mod commits;
mod repository;
mod tags;
pub mod types;

pub use repository::{GitRepo, Result};
pub use types::{parse_timestamp, CommitInfo, TagInfo};
