//! relnotes core - shared configuration and error handling
//!
//! This crate provides the error taxonomy and the configuration layer used by
//! the git data source, the release note engine and the CLI.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{ConfigError, GitError, InputError, RelnotesError, Result};
