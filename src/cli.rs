//! CLI interface for smart-commit.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod analyze;
pub mod config;
pub mod output;
pub mod suggest;

pub use output::{OutputFormat, SuggestionReport};

/// smart-commit: commit message suggestions from your pending changes.
#[derive(Parser)]
#[command(name = "smart-commit")]
#[command(about = "Suggests commit messages from git diffs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Suggests a commit message for the pending changes of a repository.
    Suggest(suggest::SuggestCommand),
    /// Suggests a commit message for a diff read from a file or stdin.
    Analyze(analyze::AnalyzeCommand),
    /// Settings inspection.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Suggest(suggest_cmd) => suggest_cmd.execute(),
            Commands::Analyze(analyze_cmd) => analyze_cmd.execute(),
            Commands::Config(config_cmd) => config_cmd.execute(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_suggest_flags() {
        let cli = Cli::try_parse_from([
            "smart-commit",
            "suggest",
            "--branch",
            "feature/login",
            "--source",
            "unstaged",
            "--color",
            "never",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Suggest(cmd) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(cmd.branch.as_deref(), Some("feature/login"));
        assert_eq!(cmd.source, crate::git::DiffSource::Unstaged);
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_unknown_color() {
        assert!(Cli::try_parse_from(["smart-commit", "analyze", "--color", "sometimes"]).is_err());
    }
}
