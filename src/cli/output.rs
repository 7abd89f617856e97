//! Rendering of a suggestion as text, YAML or JSON.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::conventional::ConventionalCommit;
use crate::data::{to_yaml, CommitResult};
use crate::git::DiffSource;

/// Output format of `suggest` and `analyze`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Display block followed by the `git commit` command.
    #[default]
    Text,
    /// The full suggestion as YAML.
    Yaml,
    /// The full suggestion as pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Whether the format is meant for programs rather than terminals.
    pub fn is_structured(self) -> bool {
        self != Self::Text
    }
}

/// Everything one run produces, as serialized by `--format yaml|json`.
#[derive(Debug, Serialize)]
pub struct SuggestionReport<'a> {
    /// Branch shown in the subject; empty for none.
    pub branch: &'a str,
    /// Where the diff came from; absent for `analyze`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DiffSource>,
    /// Tagged subject, display block and per-file descriptors.
    pub result: &'a CommitResult,
    /// Conventional-commit rendering of the result.
    pub conventional: ConventionalCommit,
    /// Conventional subject line.
    pub conventional_subject: String,
    /// Shell-quoted `git commit` command.
    pub command: String,
}

impl<'a> SuggestionReport<'a> {
    /// Builds the report for `result` on `branch`.
    pub fn new(result: &'a CommitResult, branch: &'a str, source: Option<DiffSource>) -> Self {
        let conventional = ConventionalCommit::from_result(result, branch);
        Self {
            branch,
            source,
            result,
            conventional_subject: conventional.subject(),
            command: conventional.command(),
            conventional,
        }
    }

    /// Writes the report in `format`.
    pub fn write_to(&self, out: &mut impl Write, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Text => {
                writeln!(out, "{}", self.result.display)?;
                writeln!(out, "\n  To commit, run:")?;
                writeln!(out, "  {}\n", self.command)?;
            }
            OutputFormat::Yaml => {
                write!(out, "{}", to_yaml(self)?)?;
            }
            OutputFormat::Json => {
                let json =
                    serde_json::to_string_pretty(self).context("Failed to serialize to JSON")?;
                writeln!(out, "{json}")?;
            }
        }
        Ok(())
    }
}
