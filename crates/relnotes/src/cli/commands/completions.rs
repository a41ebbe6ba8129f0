//! Shell completions generation command

use std::io;

use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::Cli;

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

/// Supported shell types
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

impl From<ShellType> for Shell {
    fn from(shell: ShellType) -> Self {
        match shell {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
            ShellType::PowerShell => Shell::PowerShell,
            ShellType::Elvish => Shell::Elvish,
        }
    }
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = ?self.shell, "executing completions command");
        let mut cmd = Cli::command();
        let shell: Shell = self.shell.into();

        match &self.output {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                generate(shell, &mut cmd, "relnotes", &mut file);

                if !cli.quiet {
                    crate::cli::output::success(&format!(
                        "Completions written to {}",
                        path.display()
                    ));
                }
            }
            None => generate(shell, &mut cmd, "relnotes", &mut io::stdout()),
        }

        Ok(())
    }
}
