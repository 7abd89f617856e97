//! Aggregation of per-file descriptors into one commit message.

use tracing::debug;

use crate::analysis::classify::Thresholds;
use crate::analysis::describe::describe_file;
use crate::analysis::diff::parse_diff;
use crate::analysis::render::{render, ColorMode, DisplayBlock};
use crate::data::{CommitResult, FileDescriptor, Tag};

/// Runs the whole pipeline with configured thresholds and styling.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    thresholds: Thresholds,
    color: ColorMode,
}

impl Composer {
    /// Creates a composer.
    pub fn new(thresholds: Thresholds, color: ColorMode) -> Self {
        Self { thresholds, color }
    }

    /// Returns the thresholds in use.
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Builds the commit message for `diff` on `branch` (empty for none).
    ///
    /// Blank input, or input without any `diff --git` header, yields
    /// [`CommitResult::minor_changes`].
    pub fn compose(&self, diff: &str, branch: &str) -> CommitResult {
        if diff.trim().is_empty() {
            return CommitResult::minor_changes();
        }
        let records = parse_diff(diff);
        if records.is_empty() {
            debug!("No file headers in diff");
            return CommitResult::minor_changes();
        }

        let files: Vec<FileDescriptor> = records
            .iter()
            .map(|record| describe_file(record, &self.thresholds))
            .collect();
        let added_lines = records.iter().map(|r| r.added.len()).sum();
        let removed_lines = records.iter().map(|r| r.removed.len()).sum();
        let tag_counts = tally_tags(&files);

        let (lead_tag, body) = lead_summary(&files);
        let branch_token = if branch.is_empty() {
            String::new()
        } else {
            format!("[{branch}]")
        };
        let subject = truncate_subject(
            &format!("{}{branch_token} {body}", lead_tag.label()),
            self.thresholds.subject_limit,
        );
        debug!(
            files = files.len(),
            primary = %pick_primary_tag(&tag_counts),
            lead = %lead_tag,
            "Composed subject"
        );

        let display = render(
            &DisplayBlock {
                subject: &subject,
                lead_tag,
                branch,
                files: &files,
                added_lines,
                removed_lines,
                tag_counts: &tag_counts,
            },
            self.color,
        );

        CommitResult {
            subject,
            display,
            files,
            added_lines,
            removed_lines,
        }
    }
}

/// Builds the commit message for a diff with default thresholds and a
/// plain (unstyled) display.
pub fn create_commit_message(diff: &str, branch: &str) -> CommitResult {
    Composer::new(Thresholds::default(), ColorMode::Never).compose(diff, branch)
}

/// Counts descriptors per tag, in order of first appearance.
pub fn tally_tags(files: &[FileDescriptor]) -> Vec<(Tag, usize)> {
    let mut counts: Vec<(Tag, usize)> = Vec::new();
    for file in files {
        match counts.iter_mut().find(|(tag, _)| *tag == file.tag) {
            Some((_, count)) => *count += 1,
            None => counts.push((file.tag, 1)),
        }
    }
    counts
}

/// Picks the dominant tag of a change set.
///
/// A tag holding at least half of all files wins, checked in priority
/// order; otherwise the highest-priority tag present; otherwise UPDATE.
pub fn pick_primary_tag(counts: &[(Tag, usize)]) -> Tag {
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    let count_of = |tag: Tag| {
        counts
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(0, |(_, count)| *count)
    };

    Tag::PRIORITY
        .iter()
        .copied()
        .find(|&tag| total > 0 && count_of(tag) * 2 >= total)
        .or_else(|| {
            Tag::PRIORITY
                .iter()
                .copied()
                .find(|&tag| count_of(tag) > 0)
        })
        .unwrap_or(Tag::Update)
}

/// Chooses the tag and body of the subject line.
///
/// One file is used verbatim. Otherwise the first file carrying the
/// highest-priority tag present leads, followed by ` (+N more)`.
fn lead_summary(files: &[FileDescriptor]) -> (Tag, String) {
    match files {
        [] => (Tag::Update, "Minor changes".to_string()),
        [only] => (only.tag, only.summary.clone()),
        _ => {
            let lead = files
                .iter()
                .min_by_key(|file| file.tag)
                .unwrap_or(&files[0]);
            (
                lead.tag,
                format!("{} (+{} more)", lead.summary, files.len() - 1),
            )
        }
    }
}

/// Truncates a subject to `limit` characters, appending `...` when cut.
///
/// The cut happens at the last space that leaves room for the ellipsis,
/// provided it lies past 60% of the limit; otherwise the text is hard-cut
/// at `limit - 3`.
pub fn truncate_subject(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit.saturating_sub(3)).collect();
    let min_cut = limit * 3 / 5;
    let kept = match head.rfind(' ') {
        Some(cut) if head[..cut].chars().count() > min_cut => &head[..cut],
        _ => head.as_str(),
    };
    format!("{kept}...")
}
