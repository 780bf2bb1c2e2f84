//! JSON output formatting

use serde::Serialize;

use crate::error::Result;
use crate::tree::DirectoryNode;

use super::config::OutputConfig;

#[derive(Serialize)]
struct JsonExport<'a> {
    root: &'a str,
    show_full_path: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    metrics: Vec<&'static str>,
    structure: &'a DirectoryNode,
}

/// Render the tree as pretty-printed JSON.
pub fn render_json(node: &DirectoryNode, root_name: &str, config: &OutputConfig) -> Result<String> {
    let flags = config.metrics;
    let metrics = [
        (flags.lines, "lines"),
        (flags.size, "size"),
        (flags.mtime, "mtime"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();

    let export = JsonExport {
        root: root_name,
        show_full_path: config.show_full_path,
        metrics,
        structure: node,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}
