//! Filtered directory tree construction
//!
//! - `TreeBuilder`: walks a directory and builds a [`DirectoryNode`] tree
//! - `sort_entries`: display order for the files of one directory
//! - `compare_trees`: two independent builds for a side-by-side view

mod builder;
mod compare;
mod config;
mod node;
mod sort;

pub use builder::{BuiltTree, TreeBuilder, build_tree};
pub use compare::{
    Comparison, DirDiff, FileDiff, LevelDiff, Presence, compare_trees, compare_with, diff_level,
};
pub use config::BuildOptions;
pub use node::{DirectoryNode, FileEntry, Totals};
pub use sort::{compare_entries, sort_entries};
