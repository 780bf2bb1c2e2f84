//! Error types for operations that can fail as a whole

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a requested operation.
///
/// Problems local to a single entry or subtree never surface here; those are
/// reported as [`crate::Diagnostic`]s and the traversal carries on.
#[derive(Debug, Error)]
pub enum Error {
    /// The traversal root does not exist or is not a directory.
    #[error("'{}' is not a valid directory", .0.display())]
    InvalidRoot(PathBuf),

    /// An export format name that no exporter understands.
    #[error("unsupported export format '{0}' (supported: txt, json, html, md, jsx)")]
    UnsupportedFormat(String),

    /// I/O failure while writing an export or preparing its directory.
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
