//! Ignore-file parsing and ignore rules

use std::io;
use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostic, Reporter};

use super::pattern::{PatternKind, PatternRule};
use super::relative_slash_path;

/// Parse ignore-file text into pattern lines, in file order.
///
/// Blank lines and `#` comments are dropped and one trailing `/` is
/// stripped. Directory-only rules are not distinguished from file rules.
pub fn parse_ignore_rules(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.strip_suffix('/').unwrap_or(line).to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Read and parse an ignore file. A missing file yields no patterns.
pub fn parse_ignore_file(path: &Path) -> io::Result<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse_ignore_rules(&text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// One ignore-file line, scoped to the directory whose ignore file it came from.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: PatternRule,
    negated: bool,
    base: PathBuf,
}

impl IgnoreRule {
    /// Build a rule from a parsed line. A leading `!` negates it.
    /// Returns the compile error alongside a literal fallback rule.
    pub fn new(line: &str, base: &Path) -> (Self, Option<String>) {
        let (negated, raw) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (pattern, error) = match PatternRule::compile(raw, PatternKind::Glob) {
            Ok(p) => (p, None),
            Err(e) => (PatternRule::Literal(raw.to_string()), Some(e)),
        };
        (
            Self {
                pattern,
                negated,
                base: base.to_path_buf(),
            },
            error,
        )
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The directory owning this rule.
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn matches(&self, path: &Path, base_name: &str) -> bool {
        let relative = relative_slash_path(path, &self.base);
        self.pattern.matches(&relative, base_name)
    }
}

/// Load the rules contributed by `dir`'s own ignore file named `file_name`.
pub fn load_ignore_rules(dir: &Path, file_name: &str, reporter: &dyn Reporter) -> Vec<IgnoreRule> {
    let path = dir.join(file_name);
    let lines = match parse_ignore_file(&path) {
        Ok(lines) => lines,
        Err(e) => {
            reporter.report(Diagnostic::IgnoreFile {
                path,
                message: e.to_string(),
            });
            return Vec::new();
        }
    };

    lines
        .iter()
        .map(|line| {
            let (rule, error) = IgnoreRule::new(line, dir);
            if let Some(message) = error {
                reporter.report(Diagnostic::InvalidPattern {
                    kind: "ignore",
                    pattern: line.clone(),
                    message,
                });
            }
            rule
        })
        .collect()
}
