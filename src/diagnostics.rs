//! Recoverable problems found while walking and filtering
//!
//! The traversal never aborts for a problem confined to one entry or one
//! subtree. Instead it hands a [`Diagnostic`] to the [`Reporter`] it was
//! built with. The default reporter forwards to `tracing`; tests use
//! [`CollectingReporter`] to assert on what was reported.

use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// A problem that was recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// A directory could not be listed because access was denied.
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// A directory could not be listed for another reason.
    #[error("error reading directory {}: {message}", path.display())]
    ReadDir { path: PathBuf, message: String },

    /// A glob or regex that failed to compile and now matches literally.
    #[error("invalid {kind} pattern '{pattern}': {message}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        message: String,
    },

    /// An ignore file that exists but could not be read.
    #[error("could not read ignore file {}: {message}", path.display())]
    IgnoreFile { path: PathBuf, message: String },

    /// Line count, size or mtime could not be read for a file.
    #[error("could not read metrics for {}: {message}", path.display())]
    Metrics { path: PathBuf, message: String },

    /// Repository status could not be read.
    #[error("git status unavailable for {}: {message}", path.display())]
    Git { path: PathBuf, message: String },
}

/// Sink for diagnostics, injected into the traversal.
pub trait Reporter: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber of the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::Metrics { .. } => tracing::debug!("{}", diagnostic),
            Diagnostic::ReadDir { .. } => tracing::error!("{}", diagnostic),
            _ => tracing::warn!("{}", diagnostic),
        }
    }
}

/// Keeps every diagnostic in memory, in the order reported.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().map(|d| d.is_empty()).unwrap_or(true)
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let reporter = CollectingReporter::new();
        assert!(reporter.is_empty());

        reporter.report(Diagnostic::PermissionDenied {
            path: PathBuf::from("a"),
        });
        reporter.report(Diagnostic::InvalidPattern {
            kind: "regex",
            pattern: "(".to_string(),
            message: "unclosed group".to_string(),
        });

        let seen = reporter.diagnostics();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], Diagnostic::PermissionDenied { .. }));
        assert!(matches!(seen[1], Diagnostic::InvalidPattern { .. }));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::InvalidPattern {
            kind: "regex",
            pattern: "[".to_string(),
            message: "unclosed class".to_string(),
        };
        assert_eq!(d.to_string(), "invalid regex pattern '[': unclosed class");
    }
}
