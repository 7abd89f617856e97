//! Boxed terminal display of a composed commit message.
//!
//! Rendering is a pure function of its inputs. Styling goes through
//! `termcolor`, so the same code path produces ANSI output or plain text
//! depending on the [`ColorMode`].

use std::io::{self, IsTerminal, Write};

use serde::{Deserialize, Serialize};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};
use tracing::warn;

use crate::data::{FileDescriptor, Tag};

/// Interior width of the box, in columns.
pub const BOX_WIDTH: usize = 66;

/// Paths longer than this collapse to their last two segments.
pub const PATH_DISPLAY_LIMIT: usize = 42;

/// When to emit ANSI styling.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Style only when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always style.
    Always,
    /// Never style.
    Never,
}

impl ColorMode {
    /// Resolves the mode against the current environment.
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// Everything the display block shows.
#[derive(Debug, Clone)]
pub struct DisplayBlock<'a> {
    /// Full plain subject line, starting with the lead tag.
    pub subject: &'a str,
    /// Tag the subject starts with.
    pub lead_tag: Tag,
    /// Branch name, empty when unknown.
    pub branch: &'a str,
    /// Per-file descriptors in diff order.
    pub files: &'a [FileDescriptor],
    /// Total added lines.
    pub added_lines: usize,
    /// Total removed lines.
    pub removed_lines: usize,
    /// Tag tallies in order of first appearance.
    pub tag_counts: &'a [(Tag, usize)],
}

/// Renders the display block, styled when `color` resolves to enabled.
///
/// Never fails; a write error (which an in-memory buffer does not produce)
/// is logged and yields an empty string.
pub fn render(block: &DisplayBlock<'_>, color: ColorMode) -> String {
    let mut buffer = if color.enabled() {
        Buffer::ansi()
    } else {
        Buffer::no_color()
    };
    match write_block(&mut buffer, block) {
        Ok(()) => String::from_utf8_lossy(buffer.as_slice()).into_owned(),
        Err(e) => {
            warn!("Failed to render display block: {e}");
            String::new()
        }
    }
}

/// Writes the display block to any color-capable writer.
fn write_block(out: &mut impl WriteColor, block: &DisplayBlock<'_>) -> io::Result<()> {
    let rule = "─".repeat(BOX_WIDTH);

    writeln!(out)?;
    dimmed(out, &format!("╭{rule}╮"))?;
    writeln!(out)?;

    // Header
    rail(out)?;
    write!(out, "  ")?;
    styled(out, "git commit message", spec(Some(Color::Cyan), true))?;
    if !block.branch.is_empty() {
        dimmed(out, "  •  branch: ")?;
        styled(out, block.branch, spec(Some(Color::Yellow), false))?;
    }
    writeln!(out)?;
    dimmed(out, &format!("├{rule}"))?;
    writeln!(out)?;

    write_subject(out, block)?;
    rail(out)?;
    writeln!(out)?;

    // Files
    let count = block.files.len();
    rail(out)?;
    write!(out, "  ")?;
    styled(out, "Changes", spec(Some(Color::White), true))?;
    write!(out, "  ")?;
    dimmed(out, &format!("{count} file{}", if count == 1 { "" } else { "s" }))?;
    writeln!(out)?;
    rail(out)?;
    write!(out, "  ")?;
    dimmed(out, &rule)?;
    writeln!(out)?;

    for file in block.files {
        write_file(out, file)?;
    }

    write_footer(out, block, &rule)
}

fn write_subject(out: &mut impl WriteColor, block: &DisplayBlock<'_>) -> io::Result<()> {
    let label = block.lead_tag.label();
    let mut rest = block
        .subject
        .strip_prefix(label.as_str())
        .unwrap_or(block.subject)
        .to_string();
    let branch_token = format!("[{}]", block.branch);
    let show_branch = !block.branch.is_empty() && rest.contains(&branch_token);
    if show_branch {
        rest = rest.replace(&branch_token, "");
    }

    rail(out)?;
    write!(out, "  ")?;
    tag(out, block.lead_tag)?;
    write!(out, " ")?;
    if show_branch {
        dimmed(out, &branch_token)?;
        write!(out, " ")?;
    }
    styled(out, rest.trim(), spec(None, true))?;
    writeln!(out)
}

fn write_file(out: &mut impl WriteColor, file: &FileDescriptor) -> io::Result<()> {
    rail(out)?;
    write!(out, "  ")?;
    tag(out, file.tag)?;
    write!(out, " ")?;
    styled(out, &file.summary, spec(Some(Color::White), false))?;
    if !file.language.is_empty() {
        let icon = crate::analysis::language::language_icon(&file.language);
        write!(out, " ")?;
        dimmed(out, &format!("{icon} {}", file.language))?;
    }
    writeln!(out)?;

    rail(out)?;
    write!(out, "     ")?;
    dimmed(out, &format!("↳ {}", display_path(&file.path)))?;
    writeln!(out)?;

    for detail in &file.details {
        rail(out)?;
        write!(out, "       ")?;
        let rest = || detail.chars().skip(2).collect::<String>();
        if detail.starts_with('+') {
            styled(out, "+", spec(Some(Color::Green), false))?;
            write!(out, " ")?;
            dimmed(out, &rest())?;
        } else if detail.starts_with('-') {
            styled(out, "-", spec(Some(Color::Red), false))?;
            write!(out, " ")?;
            dimmed(out, &rest())?;
        } else {
            dimmed(out, &format!("· {detail}"))?;
        }
        writeln!(out)?;
    }

    rail(out)?;
    writeln!(out)
}

fn write_footer(
    out: &mut impl WriteColor,
    block: &DisplayBlock<'_>,
    rule: &str,
) -> io::Result<()> {
    dimmed(out, &format!("├{rule}"))?;
    writeln!(out)?;

    rail(out)?;
    write!(out, "  ")?;
    dimmed(out, "Files")?;
    write!(out, " ")?;
    styled(out, &block.files.len().to_string(), spec(None, true))?;
    write!(out, "  ")?;
    styled(
        out,
        &format!("+{}", block.added_lines),
        spec(Some(Color::Green), false),
    )?;
    write!(out, "  ")?;
    styled(
        out,
        &format!("-{}", block.removed_lines),
        spec(Some(Color::Red), false),
    )?;
    write!(out, "  ")?;
    match block.added_lines.cmp(&block.removed_lines) {
        std::cmp::Ordering::Greater => styled(
            out,
            &format!("net +{}", block.added_lines - block.removed_lines),
            spec(Some(Color::Green), false),
        )?,
        std::cmp::Ordering::Less => styled(
            out,
            &format!("net -{}", block.removed_lines - block.added_lines),
            spec(Some(Color::Red), false),
        )?,
        std::cmp::Ordering::Equal => dimmed(out, "net 0")?,
    }
    writeln!(out)?;

    if block.tag_counts.len() > 1 {
        let mut legend = block.tag_counts.to_vec();
        legend.sort_by(|a, b| b.1.cmp(&a.1));
        rail(out)?;
        for (t, count) in &legend {
            write!(out, "  ")?;
            tag(out, *t)?;
            write!(out, " ")?;
            dimmed(out, &format!("×{count}"))?;
        }
        writeln!(out)?;
    }

    write!(out, "╰{rule}╯")
}

/// Shortens long paths to `.../<parent>/<name>`.
pub fn display_path(path: &str) -> String {
    if path.chars().count() <= PATH_DISPLAY_LIMIT {
        return path.to_string();
    }
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() > 2 {
        format!(".../{}", parts[parts.len() - 2..].join("/"))
    } else {
        path.to_string()
    }
}

fn tag_color(tag: Tag) -> Color {
    match tag {
        Tag::Add => Color::Green,
        Tag::Fix | Tag::Remove => Color::Red,
        Tag::Update => Color::Blue,
        Tag::Refactor | Tag::Test => Color::Magenta,
        Tag::Style | Tag::Rename => Color::Cyan,
        Tag::Docs | Tag::Config => Color::Yellow,
        Tag::Chore => Color::Black,
    }
}

fn spec(fg: Option<Color>, bold: bool) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(fg).set_bold(bold).set_intense(fg.is_some());
    spec
}

fn styled(out: &mut impl WriteColor, text: &str, spec: ColorSpec) -> io::Result<()> {
    out.set_color(&spec)?;
    write!(out, "{text}")?;
    out.reset()
}

fn dimmed(out: &mut impl WriteColor, text: &str) -> io::Result<()> {
    let mut spec = ColorSpec::new();
    spec.set_dimmed(true);
    styled(out, text, spec)
}

fn tag(out: &mut impl WriteColor, tag: Tag) -> io::Result<()> {
    styled(out, &tag.label(), spec(Some(tag_color(tag)), true))
}

fn rail(out: &mut impl WriteColor) -> io::Result<()> {
    dimmed(out, "│")
}
