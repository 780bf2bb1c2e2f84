//! Tree model produced by the builder

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::extension_of;
use crate::git::GitStatus;

/// One retained file. Metric fields are populated only for the metrics
/// requested during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_path: None,
            lines: None,
            size: None,
            modified: None,
        }
    }

    /// Lower-cased extension including the dot, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    /// The full path when one was recorded, otherwise the name.
    pub fn display_name(&self) -> &str {
        self.display_path.as_deref().unwrap_or(&self.name)
    }
}

/// Aggregate metrics over a directory and everything below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub lines: u64,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_modified: Option<DateTime<Utc>>,
}

impl Totals {
    pub fn add_file(&mut self, entry: &FileEntry) {
        self.lines += entry.lines.unwrap_or(0);
        self.size += entry.size.unwrap_or(0);
        self.merge_modified(entry.modified);
    }

    pub fn add(&mut self, other: &Totals) {
        self.lines += other.lines;
        self.size += other.size;
        self.merge_modified(other.latest_modified);
    }

    fn merge_modified(&mut self, modified: Option<DateTime<Utc>>) {
        self.latest_modified = match (self.latest_modified, modified) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }
}

/// A directory in the filtered tree.
///
/// Child directories live in their own map, so a directory named like one
/// of the other fields is an ordinary child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryNode {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileEntry>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, DirectoryNode>,
    /// Set on a node that was not expanded because of the depth limit.
    /// Such a node has no files and no children.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub max_depth_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
    /// File name to status marker, for files with a status.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub git_markers: BTreeMap<String, GitStatus>,
}

impl DirectoryNode {
    /// A leaf marking where the depth limit stopped expansion.
    pub fn sentinel() -> Self {
        Self {
            max_depth_reached: true,
            ..Default::default()
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.max_depth_reached
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&DirectoryNode> {
        self.children.get(name)
    }

    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn git_marker(&self, name: &str) -> Option<GitStatus> {
        self.git_markers.get(name).copied()
    }

    /// Follow a `/`-separated path of directory names.
    pub fn descend(&self, path: &str) -> Option<&DirectoryNode> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| node.child(part))
    }

    /// Number of files in this subtree.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.children.values().map(|c| c.file_count()).sum::<usize>()
    }

    /// Number of directories below this one, sentinels excluded.
    pub fn dir_count(&self) -> usize {
        self.children
            .values()
            .filter(|c| !c.is_sentinel())
            .map(|c| 1 + c.dir_count())
            .sum()
    }

    /// Deepest level below this node that holds real content.
    pub fn depth(&self) -> usize {
        self.children
            .values()
            .filter(|c| !c.is_sentinel())
            .map(|c| 1 + c.depth())
            .max()
            .unwrap_or(0)
    }
}
