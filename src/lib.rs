//! Canopy - filtered directory trees with ignore rules, metrics, exports and comparisons

pub mod color;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod git;
pub mod metrics;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use color::color_for_extension;
pub use diagnostics::{CollectingReporter, Diagnostic, Reporter, TracingReporter};
pub use error::{Error, Result};
pub use filter::{PatternKind, parse_ignore_file};
pub use git::{GitStatus, GitStatusMap, collect_git_status};
pub use metrics::MetricFlags;
pub use output::{ComparisonInfo, ExportFormat, OutputConfig, TerminalRenderer, export_all};
pub use tree::{
    BuildOptions, BuiltTree, Comparison, DirectoryNode, FileEntry, TreeBuilder, build_tree,
    compare_trees, sort_entries,
};
