//! Display order of file entries within a directory

use std::cmp::{Ordering, Reverse};

use crate::metrics::MetricFlags;

use super::node::FileEntry;

/// Order files for display.
///
/// With no metric flag set, files are ordered by extension then name, both
/// case-insensitive. With metric flags, the active metrics form a
/// descending composite key in the order lines, size, mtime; a missing
/// metric counts as zero and remaining ties fall back to extension then name.
pub fn sort_entries(entries: &[FileEntry], flags: MetricFlags) -> Vec<&FileEntry> {
    let mut sorted: Vec<&FileEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| compare_entries(a, b, flags));
    sorted
}

/// The ordering used by [`sort_entries`], for callers sorting their own lists.
pub fn compare_entries(a: &FileEntry, b: &FileEntry, flags: MetricFlags) -> Ordering {
    compare_metrics(a, b, flags).then_with(|| compare_by_type(a, b))
}

fn compare_metrics(a: &FileEntry, b: &FileEntry, flags: MetricFlags) -> Ordering {
    let key = |e: &FileEntry| {
        (
            Reverse(if flags.lines { e.lines.unwrap_or(0) } else { 0 }),
            Reverse(if flags.size { e.size.unwrap_or(0) } else { 0 }),
            Reverse(if flags.mtime {
                e.modified.map(|m| m.timestamp_millis()).unwrap_or(0)
            } else {
                0
            }),
        )
    };
    key(a).cmp(&key(b))
}

fn compare_by_type(a: &FileEntry, b: &FileEntry) -> Ordering {
    let key = |e: &FileEntry| (e.extension().unwrap_or_default(), e.name.to_lowercase());
    key(a).cmp(&key(b))
}
