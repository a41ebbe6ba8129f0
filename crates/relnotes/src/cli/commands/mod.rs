//! CLI commands

mod completions;
mod generate;
mod init;
mod tags;

pub use completions::CompletionsCommand;
pub use generate::GenerateCommand;
pub use init::InitCommand;
pub use tags::TagsCommand;
