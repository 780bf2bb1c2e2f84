//! Side-by-side comparison of two filtered trees
//!
//! Both roots are built independently with the same options. Which names
//! are unique to one side is worked out per level at render time with
//! [`diff_level`]; nothing about the comparison is stored in the nodes.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::Result;

use super::builder::TreeBuilder;
use super::config::BuildOptions;
use super::node::{DirectoryNode, FileEntry};

/// Two trees built with identical options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub left: DirectoryNode,
    pub right: DirectoryNode,
    /// Union of the extensions seen on both sides.
    pub extensions: BTreeSet<String>,
}

/// Where a name at one level exists, seen from one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Both,
    OnlyThis,
    OnlyOther,
}

/// A file at one level, classified against the other side.
#[derive(Debug, Clone, Copy)]
pub struct FileDiff<'a> {
    pub entry: &'a FileEntry,
    pub presence: Presence,
}

/// A subdirectory at one level with both of its sides.
#[derive(Debug, Clone, Copy)]
pub struct DirDiff<'a> {
    pub name: &'a str,
    pub this: Option<&'a DirectoryNode>,
    pub other: Option<&'a DirectoryNode>,
    pub presence: Presence,
}

impl<'a> DirDiff<'a> {
    /// True when the side being shown stopped at the depth limit here.
    pub fn is_sentinel(&self) -> bool {
        self.this.or(self.other).is_some_and(DirectoryNode::is_sentinel)
    }

    /// The next level down.
    pub fn level(&self) -> LevelDiff<'a> {
        diff_level(self.this, self.other)
    }
}

/// One level of `this`, classified against the matching level of `other`.
///
/// Entries of `this` come first, followed by the entries only `other` has.
#[derive(Debug, Clone, Default)]
pub struct LevelDiff<'a> {
    pub files: Vec<FileDiff<'a>>,
    pub dirs: Vec<DirDiff<'a>>,
}

impl LevelDiff<'_> {
    pub fn file_names(&self, presence: Presence) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.presence == presence)
            .map(|f| f.entry.name.as_str())
            .collect()
    }

    pub fn dir_names(&self, presence: Presence) -> Vec<&str> {
        self.dirs
            .iter()
            .filter(|d| d.presence == presence)
            .map(|d| d.name)
            .collect()
    }
}

/// Build both trees with the same options and diagnostics sent to `tracing`.
pub fn compare_trees(left: &Path, right: &Path, options: &BuildOptions) -> Result<Comparison> {
    compare_with(&TreeBuilder::new(options.clone()), left, right)
}

/// Build both trees with one builder. Ignore-file state is per traversal,
/// so nothing leaks from one side to the other.
pub fn compare_with(builder: &TreeBuilder, left: &Path, right: &Path) -> Result<Comparison> {
    let left = builder.build(left)?;
    let right = builder.build(right)?;

    let mut extensions = left.extensions;
    extensions.extend(right.extensions);

    Ok(Comparison {
        left: left.root,
        right: right.root,
        extensions,
    })
}

/// Classify files and subdirectories by name at one level.
/// A missing side is treated as an empty directory.
pub fn diff_level<'a>(
    this: Option<&'a DirectoryNode>,
    other: Option<&'a DirectoryNode>,
) -> LevelDiff<'a> {
    let names = |node: Option<&'a DirectoryNode>| -> BTreeSet<&'a str> {
        node.map(|n| n.files.iter().map(|f| f.name.as_str()).collect())
            .unwrap_or_default()
    };
    let this_files = names(this);
    let other_files = names(other);

    let mut files = Vec::new();
    for entry in this.into_iter().flat_map(|n| n.files.iter()) {
        let presence = if other_files.contains(entry.name.as_str()) {
            Presence::Both
        } else {
            Presence::OnlyThis
        };
        files.push(FileDiff { entry, presence });
    }
    for entry in other.into_iter().flat_map(|n| n.files.iter()) {
        if !this_files.contains(entry.name.as_str()) {
            files.push(FileDiff {
                entry,
                presence: Presence::OnlyOther,
            });
        }
    }

    let mut dirs = Vec::new();
    for (name, node) in this.into_iter().flat_map(|n| n.children.iter()) {
        let counterpart = other.and_then(|o| o.child(name));
        dirs.push(DirDiff {
            name,
            this: Some(node),
            other: counterpart,
            presence: if counterpart.is_some() {
                Presence::Both
            } else {
                Presence::OnlyThis
            },
        });
    }
    for (name, node) in other.into_iter().flat_map(|n| n.children.iter()) {
        if this.and_then(|t| t.child(name)).is_none() {
            dirs.push(DirDiff {
                name,
                this: None,
                other: Some(node),
                presence: Presence::OnlyOther,
            });
        }
    }

    LevelDiff { files, dirs }
}
