//! Analyze command: suggest a message for a diff supplied directly.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::analysis::ColorMode;
use crate::cli::output::{OutputFormat, SuggestionReport};
use crate::utils::Settings;

/// Analyze command options.
#[derive(Parser)]
pub struct AnalyzeCommand {
    /// Unified diff to read; `-` or no value reads standard input.
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Branch shown in the message.
    #[arg(long, short = 'b', default_value = "")]
    pub branch: String,

    /// When to style the display block.
    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl AnalyzeCommand {
    /// Executes the analyze command.
    pub fn execute(self) -> Result<()> {
        let settings = Settings::load_or_default();
        let diff = self.read_input()?;

        let color = if self.format.is_structured() {
            Some(ColorMode::Never)
        } else {
            self.color
        };
        let result = settings.composer(color).compose(&diff, &self.branch);

        SuggestionReport::new(&result, &self.branch, None)
            .write_to(&mut io::stdout().lock(), self.format)
    }

    fn read_input(&self) -> Result<String> {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => fs::read(path)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .with_context(|| format!("Failed to read diff file: {}", path.display())),
            _ => {
                let mut bytes = Vec::new();
                io::stdin()
                    .read_to_end(&mut bytes)
                    .context("Failed to read diff from stdin")?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}
