//! Output configuration types

use std::path::PathBuf;

use crate::metrics::MetricFlags;

/// Display flags shared by every renderer.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Show recorded full paths instead of bare names.
    pub show_full_path: bool,
    /// Metrics to annotate and sort by.
    pub metrics: MetricFlags,
    /// Directory the full paths are shown relative to, for the banner.
    pub base_path: Option<PathBuf>,
}

impl OutputConfig {
    /// Name to show for a file.
    pub fn file_label<'a>(&self, entry: &'a crate::tree::FileEntry) -> &'a str {
        if self.show_full_path {
            entry.display_name()
        } else {
            &entry.name
        }
    }

    /// Banner text naming the base of full paths, when they are shown.
    pub fn full_path_banner(&self) -> Option<String> {
        if !self.show_full_path {
            return None;
        }
        let base = self
            .base_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Some(format!("Showing full file paths from: {}", base))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            show_full_path: false,
            metrics: MetricFlags::default(),
            base_path: None,
        }
    }
}
