//! Box-drawing tree writer
//!
//! Writes to any `WriteColor`, so the same code produces the colored
//! terminal view and the plain `txt` export (through `NoColor`).

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, NoColor, WriteColor};

use crate::tree::{DirectoryNode, sort_entries};

use super::config::OutputConfig;
use super::utils::{
    DIR_ICON, FILE_ICON, MAX_DEPTH_LABEL, ROOT_ICON, child_prefix, connector, file_annotation,
    file_color_spec, git_color, git_label, totals_annotation,
};

/// Directory and file counts of what was written. Directories cut by the
/// depth limit are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub dirs: usize,
    pub files: usize,
}

/// Render the `txt` export.
pub fn render_text(node: &DirectoryNode, root_name: &str, config: &OutputConfig) -> String {
    let mut out = NoColor::new(Vec::new());
    // Writing into a Vec cannot fail.
    let _ = write_tree(&mut out, node, root_name, config);
    String::from_utf8_lossy(&out.into_inner()).into_owned()
}

/// Write the root line and everything below it.
pub fn write_tree<W: WriteColor>(
    out: &mut W,
    node: &DirectoryNode,
    root_name: &str,
    config: &OutputConfig,
) -> io::Result<Counts> {
    out.set_color(&dir_spec())?;
    write!(out, "{} {}", ROOT_ICON, root_name)?;
    out.reset()?;
    write_annotation(out, totals_annotation(node.totals.as_ref(), config.metrics))?;
    writeln!(out)?;

    let mut counts = Counts::default();
    write_children(out, node, "", config, &mut counts)?;
    Ok(counts)
}

fn write_children<W: WriteColor>(
    out: &mut W,
    node: &DirectoryNode,
    prefix: &str,
    config: &OutputConfig,
    counts: &mut Counts,
) -> io::Result<()> {
    let files = sort_entries(&node.files, config.metrics);
    let total = files.len() + node.children.len();

    for (i, file) in files.into_iter().enumerate() {
        let is_last = i + 1 == total;
        write!(out, "{}{}", prefix, connector(is_last))?;
        out.set_color(&file_color_spec(file))?;
        write!(out, "{} {}", FILE_ICON, config.file_label(file))?;
        out.reset()?;
        write_annotation(out, file_annotation(file, config.metrics))?;
        if let Some(status) = node.git_marker(&file.name) {
            write!(out, " ")?;
            out.set_color(ColorSpec::new().set_fg(Some(git_color(status))).set_bold(true))?;
            write!(out, "{}", git_label(status))?;
            out.reset()?;
        }
        writeln!(out)?;
        counts.files += 1;
    }

    for (i, (name, child)) in node.children.iter().enumerate() {
        let is_last = node.files.len() + i + 1 == total;
        write!(out, "{}{}", prefix, connector(is_last))?;
        out.set_color(&dir_spec())?;
        write!(out, "{} {}", DIR_ICON, name)?;
        out.reset()?;
        write_annotation(out, totals_annotation(child.totals.as_ref(), config.metrics))?;
        writeln!(out)?;

        let next = child_prefix(prefix, is_last);
        if child.is_sentinel() {
            write_sentinel(out, &next)?;
        } else {
            counts.dirs += 1;
            write_children(out, child, &next, config, counts)?;
        }
    }
    Ok(())
}

/// The dimmed marker line under a directory cut by the depth limit.
pub fn write_sentinel<W: WriteColor>(out: &mut W, prefix: &str) -> io::Result<()> {
    write!(out, "{}{}", prefix, connector(true))?;
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    write!(out, "{}", MAX_DEPTH_LABEL)?;
    out.reset()?;
    writeln!(out)
}

pub(super) fn write_annotation<W: WriteColor>(out: &mut W, text: Option<String>) -> io::Result<()> {
    if let Some(text) = text {
        write!(out, " ")?;
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, "{}", text)?;
        out.reset()?;
    }
    Ok(())
}

pub(super) fn dir_spec() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Blue)).set_bold(true);
    spec
}
