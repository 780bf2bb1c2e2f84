//! Standalone HTML document export

use std::fmt::Write;

use crate::color::color_for_extension;
use crate::tree::{DirectoryNode, sort_entries};

use super::config::OutputConfig;
use super::utils::{
    DIR_ICON, FILE_ICON, MAX_DEPTH_LABEL, ROOT_ICON, escape_html, file_annotation, git_label,
    totals_annotation,
};

pub(super) const BASE_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
ul { list-style-type: none; padding-left: 20px; }
.directory { color: #2c3e50; font-weight: bold; }
.file { color: #34495e; }
.max-depth { color: #999; font-style: italic; }
.metric { color: #7f8c8d; font-size: 0.9em; margin-left: 6px; }
.git-marker { font-weight: bold; margin-left: 6px; }
.git-u, .git-a { color: #27ae60; }
.git-m { color: #d35400; }
.git-d { color: #c0392b; }
.path-info { margin-bottom: 20px; font-style: italic; color: #666; }
";

/// Render the tree as a standalone HTML document.
pub fn render_html(node: &DirectoryNode, root_name: &str, config: &OutputConfig) -> String {
    let root = escape_html(root_name);
    let mut body = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(body, "<h1>{} {}</h1>", ROOT_ICON, root);
    if let Some(banner) = config.full_path_banner() {
        let _ = writeln!(body, "<div class=\"path-info\">{}</div>", escape_html(&banner));
    }
    write_list(&mut body, node, config);

    format!(
        "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>Directory Structure - {root}</title>
<style>
{style}</style>
</head>
<body>
{body}</body>
</html>
",
        root = root,
        style = BASE_STYLE,
        body = body,
    )
}

fn write_list(out: &mut String, node: &DirectoryNode, config: &OutputConfig) {
    out.push_str("<ul>\n");

    for file in sort_entries(&node.files, config.metrics) {
        let style = file
            .extension()
            .map(|ext| format!(" style=\"color: {}\"", color_for_extension(&ext)))
            .unwrap_or_default();
        let _ = write!(
            out,
            "<li class=\"file\"{}>{} {}",
            style,
            FILE_ICON,
            escape_html(config.file_label(file))
        );
        if let Some(text) = file_annotation(file, config.metrics) {
            let _ = write!(out, "<span class=\"metric\">{}</span>", escape_html(&text));
        }
        if let Some(status) = node.git_marker(&file.name) {
            let _ = write!(
                out,
                "<span class=\"git-marker git-{}\">{}</span>",
                status.marker().to_ascii_lowercase(),
                git_label(status)
            );
        }
        out.push_str("</li>\n");
    }

    for (name, child) in &node.children {
        let _ = write!(out, "<li class=\"directory\">{} {}", DIR_ICON, escape_html(name));
        if let Some(text) = totals_annotation(child.totals.as_ref(), config.metrics) {
            let _ = write!(out, "<span class=\"metric\">{}</span>", escape_html(&text));
        }
        out.push('\n');
        if child.is_sentinel() {
            let _ = writeln!(out, "<ul><li class=\"max-depth\">{}</li></ul>", MAX_DEPTH_LABEL);
        } else {
            write_list(out, child, config);
        }
        out.push_str("</li>\n");
    }

    out.push_str("</ul>\n");
}
