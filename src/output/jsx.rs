//! React component export
//!
//! The tree is embedded as JSON data in a self-contained `DirectoryViewer`
//! component with collapsible folders.

use serde::Serialize;

use crate::color::color_for_extension;
use crate::error::Result;
use crate::metrics::{MetricFlags, format_size, format_timestamp};
use crate::tree::{DirectoryNode, FileEntry, sort_entries};

use super::config::OutputConfig;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ViewNode {
    #[serde(rename_all = "camelCase")]
    Directory {
        name: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        max_depth_reached: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        loc_count: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size_count: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mtime_formatted: Option<String>,
        children: Vec<ViewNode>,
    },
    #[serde(rename_all = "camelCase")]
    File {
        name: String,
        display_path: String,
        color: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        loc_count: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size_formatted: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mtime_formatted: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        git_status: Option<char>,
    },
}

fn file_view(entry: &FileEntry, node: &DirectoryNode, config: &OutputConfig) -> ViewNode {
    let flags = config.metrics;
    ViewNode::File {
        name: entry.name.clone(),
        display_path: config.file_label(entry).to_string(),
        color: color_for_extension(&entry.extension().unwrap_or_default()),
        loc_count: entry.lines.filter(|_| flags.lines),
        size_formatted: entry.size.filter(|_| flags.size).map(format_size),
        mtime_formatted: entry
            .modified
            .filter(|_| flags.mtime)
            .map(|m| format_timestamp(&m)),
        git_status: node.git_marker(&entry.name).map(|s| s.marker()),
    }
}

fn dir_view(name: &str, node: &DirectoryNode, config: &OutputConfig) -> ViewNode {
    let flags = config.metrics;
    let mut children: Vec<ViewNode> = sort_entries(&node.files, flags)
        .into_iter()
        .map(|f| file_view(f, node, config))
        .collect();
    children.extend(
        node.children
            .iter()
            .map(|(child_name, child)| dir_view(child_name, child, config)),
    );

    let totals = node.totals.as_ref();
    ViewNode::Directory {
        name: name.to_string(),
        max_depth_reached: node.is_sentinel(),
        loc_count: totals.filter(|_| flags.lines).map(|t| t.lines),
        size_count: totals.filter(|_| flags.size).map(|t| t.size),
        mtime_formatted: totals
            .filter(|_| flags.mtime)
            .and_then(|t| t.latest_modified)
            .map(|m| format_timestamp(&m)),
        children,
    }
}

fn metric_props(flags: MetricFlags) -> String {
    format!(
        "{{ showLoc: {}, showSize: {}, showMtime: {} }}",
        flags.lines, flags.size, flags.mtime
    )
}

const COMPONENT: &str = r#"import React, { useState } from 'react';

const TREE_DATA = __TREE_DATA__;
const METRICS = __METRICS__;
const FULL_PATH_INFO = __FULL_PATH_INFO__;

const GIT_COLORS = { U: '#27ae60', A: '#27ae60', M: '#d35400', D: '#c0392b' };

const formatSize = (bytes) => {
  if (bytes >= 1073741824) return (bytes / 1073741824).toFixed(1) + 'G';
  if (bytes >= 1048576) return (bytes / 1048576).toFixed(1) + 'M';
  if (bytes >= 1024) return (bytes / 1024).toFixed(1) + 'K';
  return bytes + 'B';
};

const Metrics = ({ item, metrics }) => {
  const parts = [];
  if (metrics.showLoc && item.locCount !== undefined) parts.push(`${item.locCount} lines`);
  if (metrics.showSize && item.sizeFormatted !== undefined) parts.push(item.sizeFormatted);
  if (metrics.showSize && item.sizeCount !== undefined) parts.push(formatSize(item.sizeCount));
  if (metrics.showMtime && item.mtimeFormatted !== undefined) parts.push(item.mtimeFormatted);
  if (parts.length === 0) return null;
  return (
    <span style={{ marginLeft: 8, color: '#7f8c8d', fontSize: '0.85em' }}>
      ({parts.join(', ')})
    </span>
  );
};

const FileItem = ({ item, metrics }) => (
  <li style={{ color: item.color === '#ffffff' ? undefined : item.color }}>
    📄 {item.displayPath}
    <Metrics item={item} metrics={metrics} />
    {item.gitStatus && (
      <span style={{ marginLeft: 8, fontWeight: 'bold', color: GIT_COLORS[item.gitStatus] }}>
        [{item.gitStatus}]
      </span>
    )}
  </li>
);

const DirectoryItem = ({ item, metrics, isRoot }) => {
  const [open, setOpen] = useState(true);
  return (
    <li>
      <span
        onClick={() => setOpen(!open)}
        style={{ cursor: 'pointer', fontWeight: 'bold', color: '#2c3e50' }}
      >
        {isRoot ? '📂' : open ? '📂' : '📁'} {item.name}
      </span>
      <Metrics item={item} metrics={metrics} />
      {open && (
        <ul style={{ listStyle: 'none', paddingLeft: 20 }}>
          {item.maxDepthReached ? (
            <li style={{ color: '#999', fontStyle: 'italic' }}>⋯ (max depth reached)</li>
          ) : (
            item.children.map((child) =>
              child.type === 'directory' ? (
                <DirectoryItem key={`d-${child.name}`} item={child} metrics={metrics} />
              ) : (
                <FileItem key={`f-${child.name}`} item={child} metrics={metrics} />
              )
            )
          )}
        </ul>
      )}
    </li>
  );
};

const DirectoryViewer = () => (
  <div style={{ fontFamily: 'Arial, sans-serif', margin: 20 }}>
    {FULL_PATH_INFO && (
      <div style={{ marginBottom: 20, fontStyle: 'italic', color: '#666' }}>{FULL_PATH_INFO}</div>
    )}
    <ul style={{ listStyle: 'none', paddingLeft: 0 }}>
      <DirectoryItem item={TREE_DATA} metrics={METRICS} isRoot />
    </ul>
  </div>
);

export default DirectoryViewer;
"#;

/// Render a React component source file.
pub fn render_jsx(node: &DirectoryNode, root_name: &str, config: &OutputConfig) -> Result<String> {
    let data = serde_json::to_string_pretty(&dir_view(root_name, node, config))?;
    let path_info = serde_json::to_string(&config.full_path_banner())?;

    Ok(COMPONENT
        .replace("__TREE_DATA__", &data)
        .replace("__METRICS__", &metric_props(config.metrics))
        .replace("__FULL_PATH_INFO__", &path_info))
}
