//! Suggest command: analyze the pending changes of a repository.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::analysis::ColorMode;
use crate::cli::output::{OutputFormat, SuggestionReport};
use crate::git::DiffSource;
use crate::utils::{check_git_repository, Settings};

/// Suggest command options.
#[derive(Parser)]
pub struct SuggestCommand {
    /// Path inside the git repository.
    #[arg(long, short = 'p', default_value = ".")]
    pub path: PathBuf,

    /// Branch shown in the message instead of the checked-out one.
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Which changes to analyze; `auto` prefers staged changes.
    #[arg(long, value_enum, default_value_t = DiffSource::Auto)]
    pub source: DiffSource,

    /// When to style the display block.
    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl SuggestCommand {
    /// Executes the suggest command.
    pub fn execute(self) -> Result<()> {
        let repo = check_git_repository(&self.path)?;
        let settings = Settings::load_or_default();

        let branch = self.branch.unwrap_or_else(|| repo.current_branch());
        debug!(branch = %branch, source = %self.source, "Reading pending changes");

        let Some(pending) = repo.pending_diff(self.source)? else {
            println!("{}", nothing_to_commit(self.source));
            return Ok(());
        };

        if pending.fell_back {
            eprintln!("Note: No staged changes found. Analyzing unstaged changes instead.");
            eprintln!("      Run 'git add <files>' to stage changes before committing.\n");
        }

        let color = if self.format.is_structured() {
            Some(ColorMode::Never)
        } else {
            self.color
        };
        let result = settings.composer(color).compose(&pending.text, &branch);

        SuggestionReport::new(&result, &branch, Some(pending.source))
            .write_to(&mut io::stdout().lock(), self.format)
    }
}

fn nothing_to_commit(source: DiffSource) -> &'static str {
    match source {
        DiffSource::Auto => "Nothing to commit: no staged or unstaged changes found.",
        DiffSource::Staged => "Nothing to commit: no staged changes found.",
        DiffSource::Unstaged => "Nothing to commit: no unstaged changes found.",
    }
}
