//! Configuration types for the tree builder

use crate::filter::PatternKind;
use crate::metrics::MetricFlags;

/// Everything that decides which entries are visible and what is recorded
/// for them.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Directory names that are always skipped, matched exactly.
    pub exclude_dirs: Vec<String>,
    /// Bare ignore-file name looked up in every visited directory.
    pub ignore_file: Option<String>,
    /// Extensions to hide, in any case, with or without the leading dot.
    pub exclude_extensions: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// When non-empty, only entries matching one of these are shown.
    pub include_patterns: Vec<String>,
    pub pattern_kind: PatternKind,
    /// Levels below the root to expand. 0 means unlimited.
    pub max_depth: usize,
    /// Record an absolute `/`-separated path for every file.
    pub show_full_path: bool,
    pub metrics: MetricFlags,
}

impl BuildOptions {
    /// True when the depth limit stops expansion at `depth`.
    pub fn at_max_depth(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth >= self.max_depth
    }
}
