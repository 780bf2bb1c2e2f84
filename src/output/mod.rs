//! Tree rendering and export
//!
//! Every renderer is a pure function of a built tree, its root name and an
//! [`OutputConfig`]:
//! - Terminal output with extension colors
//! - `txt`, `json`, `html`, `md` and `jsx` exports
//! - Comparison views for two trees
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `utils` - Icons, connectors, metric labels and escaping
//! - `text` - Box-drawing tree writer shared by the terminal and `txt`
//! - `terminal` - Colored terminal output with a summary line
//! - `json`, `html`, `markdown`, `jsx` - Export formats
//! - `compare` - Terminal and HTML comparison views

mod compare;
mod config;
mod html;
mod json;
mod jsx;
mod markdown;
mod terminal;
mod text;
mod utils;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::tree::DirectoryNode;

pub use compare::{ComparisonInfo, print_comparison, render_comparison, render_comparison_html};
pub use config::OutputConfig;
pub use html::render_html;
pub use json::render_json;
pub use jsx::render_jsx;
pub use markdown::render_markdown;
pub use terminal::TerminalRenderer;
pub use text::{Counts, render_text, write_tree};
pub use utils::escape_html;

/// A file format the tree can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Txt,
    Json,
    Html,
    Md,
    Jsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Txt,
        ExportFormat::Json,
        ExportFormat::Html,
        ExportFormat::Md,
        ExportFormat::Jsx,
    ];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
            ExportFormat::Md => "md",
            ExportFormat::Jsx => "jsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == lower)
            .ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}

/// Render one export format to a string.
pub fn render(
    format: ExportFormat,
    node: &DirectoryNode,
    root_name: &str,
    config: &OutputConfig,
) -> Result<String> {
    match format {
        ExportFormat::Txt => Ok(render_text(node, root_name, config)),
        ExportFormat::Json => render_json(node, root_name, config),
        ExportFormat::Html => Ok(render_html(node, root_name, config)),
        ExportFormat::Md => Ok(render_markdown(node, root_name, config)),
        ExportFormat::Jsx => render_jsx(node, root_name, config),
    }
}

/// Write `<prefix>.<ext>` into `output_dir`, creating the directory.
pub fn export(
    format: ExportFormat,
    node: &DirectoryNode,
    root_name: &str,
    config: &OutputConfig,
    output_dir: &Path,
    prefix: &str,
) -> Result<PathBuf> {
    let contents = render(format, node, root_name, config)?;
    write_export(output_dir, prefix, format.extension(), &contents)
}

/// Export every requested format independently.
///
/// Returns one result per requested name, in request order. An unknown or
/// failing format does not stop the others.
pub fn export_all(
    formats: &[String],
    node: &DirectoryNode,
    root_name: &str,
    config: &OutputConfig,
    output_dir: &Path,
    prefix: &str,
) -> Vec<(String, Result<PathBuf>)> {
    formats
        .par_iter()
        .map(|name| {
            let result = name
                .parse::<ExportFormat>()
                .and_then(|format| export(format, node, root_name, config, output_dir, prefix));
            (name.clone(), result)
        })
        .collect()
}

pub(crate) fn write_export(
    output_dir: &Path,
    prefix: &str,
    extension: &str,
    contents: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;
    let path = output_dir.join(format!("{}.{}", prefix, extension));
    fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

/// Write the HTML comparison to `<prefix>.html` in `output_dir`.
pub fn export_comparison(
    comparison: &crate::tree::Comparison,
    info: &ComparisonInfo,
    config: &OutputConfig,
    output_dir: &Path,
    prefix: &str,
) -> Result<PathBuf> {
    let html = render_comparison_html(comparison, info, config);
    write_export(output_dir, prefix, "html", &html)
}
