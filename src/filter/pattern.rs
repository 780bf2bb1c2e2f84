//! Glob and regex pattern rules

use std::fmt;

use glob::Pattern;
use regex::Regex;

use crate::diagnostics::{Diagnostic, Reporter};

/// How user-supplied patterns are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternKind {
    /// Shell-style wildcards: `*`, `?`, `[...]`.
    #[default]
    Glob,
    /// Unanchored regular expressions.
    Regex,
}

impl PatternKind {
    pub fn label(self) -> &'static str {
        match self {
            PatternKind::Glob => "glob",
            PatternKind::Regex => "regex",
        }
    }
}

/// A compiled pattern.
///
/// Every variant is evaluated against two strings: the path relative to the
/// directory owning the pattern, and the bare file name. Matching either one
/// counts.
#[derive(Debug, Clone)]
pub enum PatternRule {
    Glob(Pattern),
    Regex(Regex),
    /// A pattern that failed to compile. Matches only on exact equality.
    Literal(String),
}

impl PatternRule {
    /// Compile a single pattern, returning the compile error message on failure.
    pub fn compile(raw: &str, kind: PatternKind) -> Result<Self, String> {
        match kind {
            PatternKind::Glob => Pattern::new(raw)
                .map(PatternRule::Glob)
                .map_err(|e| e.to_string()),
            PatternKind::Regex => Regex::new(raw)
                .map(PatternRule::Regex)
                .map_err(|e| e.to_string()),
        }
    }

    pub fn matches(&self, relative_path: &str, base_name: &str) -> bool {
        match self {
            PatternRule::Glob(p) => p.matches(relative_path) || p.matches(base_name),
            PatternRule::Regex(re) => re.is_match(relative_path) || re.is_match(base_name),
            PatternRule::Literal(s) => s == relative_path || s == base_name,
        }
    }

    /// The pattern as the user wrote it.
    pub fn as_str(&self) -> &str {
        match self {
            PatternRule::Glob(p) => p.as_str(),
            PatternRule::Regex(re) => re.as_str(),
            PatternRule::Literal(s) => s,
        }
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compile user patterns. A pattern that fails to compile is reported once
/// and kept as a [`PatternRule::Literal`].
pub fn compile_patterns(
    patterns: &[String],
    kind: PatternKind,
    reporter: &dyn Reporter,
) -> Vec<PatternRule> {
    patterns
        .iter()
        .map(|raw| {
            PatternRule::compile(raw, kind).unwrap_or_else(|message| {
                reporter.report(Diagnostic::InvalidPattern {
                    kind: kind.label(),
                    pattern: raw.clone(),
                    message,
                });
                PatternRule::Literal(raw.clone())
            })
        })
        .collect()
}
