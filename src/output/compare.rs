//! Comparison views
//!
//! Both trees are drawn in full. Entries only the shown side has get a green
//! background, entries only the other side has get a red one, so each tree
//! also shows what it is missing.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;

use termcolor::{Ansi, Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::color::{color_for_extension, color_map};
use crate::filter::PatternKind;
use crate::tree::{
    Comparison, DirDiff, DirectoryNode, FileDiff, LevelDiff, Presence, compare_entries, diff_level,
};

use super::config::OutputConfig;
use super::html::BASE_STYLE;
use super::text::{dir_spec, write_annotation, write_sentinel};
use super::utils::{
    DIR_ICON, FILE_ICON, MAX_DEPTH_LABEL, ROOT_ICON, child_prefix, connector, escape_html,
    file_annotation, file_color_spec, totals_annotation,
};

/// What was compared and with which filters, for legends and headers.
#[derive(Debug, Clone, Default)]
pub struct ComparisonInfo {
    pub left_name: String,
    pub right_name: String,
    pub left_path: PathBuf,
    pub right_path: PathBuf,
    pub exclude_patterns: Vec<String>,
    pub include_patterns: Vec<String>,
    pub pattern_kind: PatternKind,
    pub max_depth: usize,
}

impl ComparisonInfo {
    fn filter_lines(&self) -> Vec<String> {
        let kind = self.pattern_kind.label();
        let mut lines = Vec::new();
        if self.max_depth > 0 {
            lines.push(format!("Depth limited to {} levels", self.max_depth));
        }
        if !self.exclude_patterns.is_empty() {
            lines.push(format!(
                "Exclude patterns ({}): {}",
                kind,
                self.exclude_patterns.join(", ")
            ));
        }
        if !self.include_patterns.is_empty() {
            lines.push(format!(
                "Include patterns ({}): {}",
                kind,
                self.include_patterns.join(", ")
            ));
        }
        lines
    }
}

/// Files ordered like the single-tree views, then dirs by name.
fn ordered<'a>(mut level: LevelDiff<'a>, config: &OutputConfig) -> LevelDiff<'a> {
    level
        .files
        .sort_by(|a, b| compare_entries(a.entry, b.entry, config.metrics));
    level.dirs.sort_by(|a, b| a.name.cmp(b.name));
    level
}

fn presence_spec(presence: Presence) -> Option<ColorSpec> {
    let bg = match presence {
        Presence::Both => return None,
        Presence::OnlyThis => Color::Green,
        Presence::OnlyOther => Color::Red,
    };
    let mut spec = ColorSpec::new();
    spec.set_bg(Some(bg)).set_fg(Some(Color::Black));
    Some(spec)
}

fn file_spec(diff: &FileDiff<'_>) -> ColorSpec {
    presence_spec(diff.presence).unwrap_or_else(|| file_color_spec(diff.entry))
}

fn directory_spec(diff: &DirDiff<'_>) -> ColorSpec {
    presence_spec(diff.presence)
        .map(|mut spec| {
            spec.set_bold(true);
            spec
        })
        .unwrap_or_else(dir_spec)
}

fn write_side<W: WriteColor>(
    out: &mut W,
    name: &str,
    this: &DirectoryNode,
    other: &DirectoryNode,
    config: &OutputConfig,
) -> io::Result<()> {
    out.set_color(&dir_spec())?;
    write!(out, "{} {}", ROOT_ICON, name)?;
    out.reset()?;
    write_annotation(out, totals_annotation(this.totals.as_ref(), config.metrics))?;
    writeln!(out)?;
    write_level(out, diff_level(Some(this), Some(other)), "", config)
}

fn write_level<W: WriteColor>(
    out: &mut W,
    level: LevelDiff<'_>,
    prefix: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    let level = ordered(level, config);
    let total = level.files.len() + level.dirs.len();

    for (i, file) in level.files.iter().enumerate() {
        write!(out, "{}{}", prefix, connector(i + 1 == total))?;
        out.set_color(&file_spec(file))?;
        write!(out, "{} {}", FILE_ICON, config.file_label(file.entry))?;
        out.reset()?;
        write_annotation(out, file_annotation(file.entry, config.metrics))?;
        writeln!(out)?;
    }

    for (i, dir) in level.dirs.iter().enumerate() {
        let is_last = level.files.len() + i + 1 == total;
        write!(out, "{}{}", prefix, connector(is_last))?;
        out.set_color(&directory_spec(dir))?;
        write!(out, "{} {}", DIR_ICON, dir.name)?;
        out.reset()?;
        let totals = dir.this.or(dir.other).and_then(|n| n.totals.as_ref());
        write_annotation(out, totals_annotation(totals, config.metrics))?;
        writeln!(out)?;

        let next = child_prefix(prefix, is_last);
        if dir.is_sentinel() {
            write_sentinel(out, &next)?;
        } else {
            write_level(out, dir.level(), &next, config)?;
        }
    }
    Ok(())
}

fn write_legend<W: WriteColor>(
    out: &mut W,
    info: &ComparisonInfo,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(out, "Comparing:")?;
    writeln!(out, "  {}", info.left_path.display())?;
    writeln!(out, "  {}", info.right_path.display())?;
    writeln!(out)?;

    write!(out, "Legend: ")?;
    if let Some(spec) = presence_spec(Presence::OnlyThis) {
        out.set_color(&spec)?;
    }
    write!(out, " unique to this directory ")?;
    out.reset()?;
    write!(out, "  ")?;
    if let Some(spec) = presence_spec(Presence::OnlyOther) {
        out.set_color(&spec)?;
    }
    write!(out, " unique to the other directory ")?;
    out.reset()?;
    writeln!(out)?;

    for line in info.filter_lines() {
        writeln!(out, "{}", line)?;
    }
    if config.show_full_path {
        writeln!(out, "Showing full file paths")?;
    }
    writeln!(out)
}

fn write_comparison<W: WriteColor>(
    out: &mut W,
    comparison: &Comparison,
    info: &ComparisonInfo,
    config: &OutputConfig,
) -> io::Result<()> {
    write_legend(out, info, config)?;
    write_side(out, &info.left_name, &comparison.left, &comparison.right, config)?;
    writeln!(out)?;
    write_side(out, &info.right_name, &comparison.right, &comparison.left, config)
}

/// Render the two labelled trees with a legend, with ANSI escapes when
/// color is enabled.
pub fn render_comparison(
    comparison: &Comparison,
    info: &ComparisonInfo,
    config: &OutputConfig,
) -> String {
    // Writing into a Vec cannot fail.
    let bytes = if config.use_color {
        let mut out = Ansi::new(Vec::new());
        let _ = write_comparison(&mut out, comparison, info, config);
        out.into_inner()
    } else {
        let mut out = NoColor::new(Vec::new());
        let _ = write_comparison(&mut out, comparison, info, config);
        out.into_inner()
    };
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn print_comparison(
    comparison: &Comparison,
    info: &ComparisonInfo,
    config: &OutputConfig,
) -> io::Result<()> {
    let choice = if config.use_color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_comparison(&mut stdout, comparison, info, config)?;
    stdout.flush()
}

const COMPARE_STYLE: &str = "\
.container { display: flex; gap: 40px; }
.column { flex: 1; }
.unique-this { background-color: #c8f7c5; }
.unique-other { background-color: #f7c5c5; }
.legend { margin-bottom: 20px; }
.legend span { padding: 2px 6px; margin-right: 12px; }
.meta { color: #666; margin-bottom: 6px; }
";

fn presence_class(presence: Presence) -> &'static str {
    match presence {
        Presence::Both => "",
        Presence::OnlyThis => " unique-this",
        Presence::OnlyOther => " unique-other",
    }
}

fn html_level(out: &mut String, level: LevelDiff<'_>, config: &OutputConfig) {
    let level = ordered(level, config);
    out.push_str("<ul>\n");

    for file in &level.files {
        let style = file
            .entry
            .extension()
            .map(|ext| format!(" style=\"color: {}\"", color_for_extension(&ext)))
            .unwrap_or_default();
        let _ = write!(
            out,
            "<li class=\"file{}\"{}>{} {}",
            presence_class(file.presence),
            style,
            FILE_ICON,
            escape_html(config.file_label(file.entry))
        );
        if let Some(text) = file_annotation(file.entry, config.metrics) {
            let _ = write!(out, "<span class=\"metric\">{}</span>", escape_html(&text));
        }
        out.push_str("</li>\n");
    }

    for dir in &level.dirs {
        let _ = write!(
            out,
            "<li class=\"directory{}\">{} {}",
            presence_class(dir.presence),
            DIR_ICON,
            escape_html(dir.name)
        );
        let totals = dir.this.or(dir.other).and_then(|n| n.totals.as_ref());
        if let Some(text) = totals_annotation(totals, config.metrics) {
            let _ = write!(out, "<span class=\"metric\">{}</span>", escape_html(&text));
        }
        out.push('\n');
        if dir.is_sentinel() {
            let _ = writeln!(out, "<ul><li class=\"max-depth\">{}</li></ul>", MAX_DEPTH_LABEL);
        } else {
            html_level(out, dir.level(), config);
        }
        out.push_str("</li>\n");
    }

    out.push_str("</ul>\n");
}

fn html_column(
    out: &mut String,
    name: &str,
    this: &DirectoryNode,
    other: &DirectoryNode,
    config: &OutputConfig,
) {
    let _ = writeln!(out, "<div class=\"column\">");
    let _ = writeln!(out, "<h2>{} {}</h2>", ROOT_ICON, escape_html(name));
    html_level(out, diff_level(Some(this), Some(other)), config);
    let _ = writeln!(out, "</div>");
}

/// Render the comparison as a two-column HTML document.
pub fn render_comparison_html(
    comparison: &Comparison,
    info: &ComparisonInfo,
    config: &OutputConfig,
) -> String {
    let left = escape_html(&info.left_name);
    let right = escape_html(&info.right_name);
    let mut body = String::new();

    let _ = writeln!(body, "<h1>Directory Comparison: {} vs {}</h1>", left, right);
    let _ = writeln!(
        body,
        "<div class=\"meta\">{} &harr; {}</div>",
        escape_html(&info.left_path.display().to_string()),
        escape_html(&info.right_path.display().to_string())
    );
    for line in info.filter_lines() {
        let _ = writeln!(body, "<div class=\"meta\">{}</div>", escape_html(&line));
    }
    if config.show_full_path {
        let _ = writeln!(body, "<div class=\"path-info\">Showing full file paths</div>");
    }
    body.push_str(
        "<div class=\"legend\"><span class=\"unique-this\">Unique to this directory</span>\
         <span class=\"unique-other\">Unique to the other directory</span></div>\n",
    );

    let colors = color_map(&comparison.extensions);
    if !colors.is_empty() {
        body.push_str("<div class=\"legend\">");
        for (ext, color) in &colors {
            let _ = write!(body, "<span style=\"color: {}\">{}</span>", color, escape_html(ext));
        }
        body.push_str("</div>\n");
    }

    body.push_str("<div class=\"container\">\n");
    html_column(&mut body, &info.left_name, &comparison.left, &comparison.right, config);
    html_column(&mut body, &info.right_name, &comparison.right, &comparison.left, config);
    body.push_str("</div>\n");

    format!(
        "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>Directory Comparison - {left} vs {right}</title>
<style>
{base}{compare}</style>
</head>
<body>
{body}</body>
</html>
",
        left = left,
        right = right,
        base = BASE_STYLE,
        compare = COMPARE_STYLE,
        body = body,
    )
}
