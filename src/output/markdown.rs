//! Markdown output formatting
//!
//! The tree becomes a nested markdown list, suitable for documentation or
//! LLM context. Each level is indented by 4 spaces.

use crate::tree::{DirectoryNode, sort_entries};

use super::config::OutputConfig;
use super::utils::{DIR_ICON, FILE_ICON, ROOT_ICON, file_annotation, git_label, totals_annotation};

const INDENT: &str = "    ";

/// Render the tree as a markdown document.
pub fn render_markdown(node: &DirectoryNode, root_name: &str, config: &OutputConfig) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {} {}", ROOT_ICON, root_name));
    if let Some(text) = totals_annotation(node.totals.as_ref(), config.metrics) {
        output.push(' ');
        output.push_str(&text);
    }
    output.push_str("\n\n");

    if let Some(banner) = config.full_path_banner() {
        output.push_str("> ");
        output.push_str(&banner);
        output.push_str("\n\n");
    }

    write_level(&mut output, node, 0, config);
    output
}

fn write_level(output: &mut String, node: &DirectoryNode, level: usize, config: &OutputConfig) {
    let indent = INDENT.repeat(level);

    for file in sort_entries(&node.files, config.metrics) {
        output.push_str(&indent);
        output.push_str(&format!("- {} `{}`", FILE_ICON, config.file_label(file)));
        if let Some(text) = file_annotation(file, config.metrics) {
            output.push(' ');
            output.push_str(&text);
        }
        if let Some(status) = node.git_marker(&file.name) {
            output.push(' ');
            output.push_str(&git_label(status));
        }
        output.push('\n');
    }

    for (name, child) in &node.children {
        output.push_str(&indent);
        output.push_str(&format!("- {} **{}**", DIR_ICON, name));
        if let Some(text) = totals_annotation(child.totals.as_ref(), config.metrics) {
            output.push(' ');
            output.push_str(&text);
        }
        output.push('\n');

        if child.is_sentinel() {
            output.push_str(&indent);
            output.push_str(INDENT);
            output.push_str("- ⋯ *(max depth reached)*\n");
        } else {
            write_level(output, child, level + 1, config);
        }
    }
}
