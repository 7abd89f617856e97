//! `config` commands: inspect the settings file.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::data::to_yaml;
use crate::utils::Settings;

/// Settings inspection.
#[derive(Parser)]
pub struct ConfigCommand {
    /// What to inspect.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Settings subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Prints the effective settings as YAML.
    Show(ShowCommand),
    /// Prints where the settings file is looked up.
    Path,
}

/// Options of `config show`.
#[derive(Parser)]
pub struct ShowCommand {
    /// Print the built-in defaults instead of the file contents.
    #[arg(long)]
    pub defaults: bool,
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(),
            ConfigSubcommands::Path => {
                println!("{}", Settings::get_settings_path()?.display());
                Ok(())
            }
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let path = Settings::get_settings_path()?;
        let (settings, origin) = if self.defaults {
            (Settings::default(), None)
        } else {
            (Settings::load_from_path(&path)?, Some(path.as_path()))
        };
        write_settings(&mut io::stdout().lock(), &settings, origin)
    }
}

/// Writes `settings` as YAML, preceded by a comment naming the file when
/// it exists.
fn write_settings(out: &mut impl Write, settings: &Settings, origin: Option<&Path>) -> Result<()> {
    match origin {
        Some(path) if path.exists() => writeln!(out, "# {}", path.display())?,
        Some(path) => writeln!(out, "# {} (not found, showing defaults)", path.display())?,
        None => writeln!(out, "# built-in defaults")?,
    }
    write!(out, "{}", to_yaml(settings)?)?;
    Ok(())
}
