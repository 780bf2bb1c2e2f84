//! Labels and helpers shared by the renderers

use chrono::{DateTime, Utc};
use termcolor::{Color, ColorSpec};

use crate::color::{color_for_extension, parse_hex};
use crate::git::GitStatus;
use crate::metrics::{MetricFlags, format_number, format_size, format_timestamp};
use crate::tree::{FileEntry, Totals};

pub const ROOT_ICON: &str = "📂";
pub const DIR_ICON: &str = "📁";
pub const FILE_ICON: &str = "📄";
pub const MAX_DEPTH_LABEL: &str = "⋯ (max depth reached)";

/// Connector drawn before an entry.
pub fn connector(is_last: bool) -> &'static str {
    if is_last { "└── " } else { "├── " }
}

/// Prefix for the entries below one drawn with `connector(is_last)`.
pub fn child_prefix(prefix: &str, is_last: bool) -> String {
    if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    }
}

fn metric_parts(
    flags: MetricFlags,
    lines: Option<u64>,
    size: Option<u64>,
    modified: Option<DateTime<Utc>>,
) -> Vec<String> {
    let mut parts = Vec::new();
    if flags.lines {
        if let Some(lines) = lines {
            parts.push(format!("{} lines", format_number(lines)));
        }
    }
    if flags.size {
        if let Some(size) = size {
            parts.push(format_size(size));
        }
    }
    if flags.mtime {
        if let Some(modified) = modified {
            parts.push(format_timestamp(&modified));
        }
    }
    parts
}

fn parenthesize(parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(format!("({})", parts.join(", ")))
    }
}

/// `(20 lines, 1.2K, 2024-01-01 10:00)` for the active metrics of a file.
pub fn file_annotation(entry: &FileEntry, flags: MetricFlags) -> Option<String> {
    parenthesize(metric_parts(flags, entry.lines, entry.size, entry.modified))
}

/// The same annotation for a directory's totals.
pub fn totals_annotation(totals: Option<&Totals>, flags: MetricFlags) -> Option<String> {
    let totals = totals?;
    parenthesize(metric_parts(
        flags,
        Some(totals.lines),
        Some(totals.size),
        totals.latest_modified,
    ))
}

/// `[M]` style marker text.
pub fn git_label(status: GitStatus) -> String {
    format!("[{}]", status.marker())
}

/// Terminal color of a git marker.
pub fn git_color(status: GitStatus) -> Color {
    match status {
        GitStatus::Untracked | GitStatus::Added => Color::Green,
        GitStatus::Modified => Color::Yellow,
        GitStatus::Deleted => Color::Red,
    }
}

/// Foreground for a file name. Files without an extension keep the
/// terminal's default color.
pub fn file_color_spec(entry: &FileEntry) -> ColorSpec {
    let mut spec = ColorSpec::new();
    if let Some((r, g, b)) = entry
        .extension()
        .and_then(|ext| parse_hex(&color_for_extension(&ext)))
    {
        spec.set_fg(Some(Color::Rgb(r, g, b)));
    }
    spec
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
