//! Inclusion and exclusion rules
//!
//! Visibility of an entry is decided in a fixed precedence order:
//!
//! 1. An exact name match against the excluded-directory list always excludes.
//! 2. A matching include pattern always includes.
//! 3. If include patterns exist but none matched, the entry is excluded.
//! 4. A matching exclude pattern excludes.
//! 5. A file whose extension is in the excluded set is excluded.
//! 6. Ignore-file rules are evaluated in order. A matching rule excludes; a
//!    matching negated rule includes and stops evaluation.

mod ignore_file;
mod pattern;

use std::collections::HashSet;
use std::path::Path;

pub use ignore_file::{IgnoreRule, load_ignore_rules, parse_ignore_file, parse_ignore_rules};
pub use pattern::{PatternKind, PatternRule, compile_patterns};

/// Normalize a user-supplied extension to lower case with a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Lower-cased extension of a file name including the dot, if any.
/// Dotfiles such as `.gitignore` have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}

/// `path` relative to `base`, with `/` separators. Falls back to the full path.
pub fn relative_slash_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let text = relative.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// One directory entry being judged.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub path: &'a Path,
    pub name: &'a str,
    /// Path relative to the traversal root, `/`-separated.
    pub relative: String,
    pub is_file: bool,
}

impl<'a> Candidate<'a> {
    pub fn new(path: &'a Path, name: &'a str, root: &Path, is_file: bool) -> Self {
        Self {
            path,
            name,
            relative: relative_slash_path(path, root),
            is_file,
        }
    }
}

/// Compiled filters shared by every level of one traversal.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    exclude_dirs: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude: Vec<PatternRule>,
    include: Vec<PatternRule>,
}

impl FilterSet {
    pub fn new(
        exclude_dirs: impl IntoIterator<Item = String>,
        exclude_extensions: impl IntoIterator<Item = String>,
        exclude: Vec<PatternRule>,
        include: Vec<PatternRule>,
    ) -> Self {
        Self {
            exclude_dirs: exclude_dirs.into_iter().collect(),
            exclude_extensions: exclude_extensions
                .into_iter()
                .filter(|e| !e.trim().is_empty())
                .map(|e| normalize_extension(&e))
                .collect(),
            exclude,
            include,
        }
    }

    pub fn exclude_patterns(&self) -> &[PatternRule] {
        &self.exclude
    }

    pub fn include_patterns(&self) -> &[PatternRule] {
        &self.include
    }

    /// Decide whether `candidate` is hidden, given the ignore rules active
    /// in its parent directory.
    pub fn is_excluded(&self, candidate: &Candidate<'_>, ignore_rules: &[IgnoreRule]) -> bool {
        if self.exclude_dirs.contains(candidate.name) {
            return true;
        }

        if !self.include.is_empty() {
            return !self
                .include
                .iter()
                .any(|p| p.matches(&candidate.relative, candidate.name));
        }

        if self
            .exclude
            .iter()
            .any(|p| p.matches(&candidate.relative, candidate.name))
        {
            return true;
        }

        if candidate.is_file
            && extension_of(candidate.name)
                .is_some_and(|ext| self.exclude_extensions.contains(&ext))
        {
            return true;
        }

        is_ignored(candidate, ignore_rules)
    }
}

/// Evaluate ignore rules in order. The first matching negation wins.
fn is_ignored(candidate: &Candidate<'_>, rules: &[IgnoreRule]) -> bool {
    let mut excluded = false;
    for rule in rules {
        if !rule.matches(candidate.path, candidate.name) {
            continue;
        }
        if rule.is_negated() {
            return false;
        }
        excluded = true;
    }
    excluded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn globs(patterns: &[&str]) -> Vec<PatternRule> {
        patterns
            .iter()
            .map(|p| PatternRule::compile(p, PatternKind::Glob).unwrap())
            .collect()
    }

    fn rules(root: &Path, lines: &[&str]) -> Vec<IgnoreRule> {
        lines.iter().map(|l| IgnoreRule::new(l, root).0).collect()
    }

    fn check(filter: &FilterSet, name: &str, is_file: bool, ignore: &[IgnoreRule]) -> bool {
        let root = PathBuf::from("/project");
        let path = root.join(name);
        let candidate = Candidate::new(&path, name, &root, is_file);
        filter.is_excluded(&candidate, ignore)
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("TXT"), ".txt");
        assert_eq!(normalize_extension(".Py"), ".py");
        assert_eq!(normalize_extension(" log "), ".log");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("main.RS").as_deref(), Some(".rs"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of(".gitignore"), None);
    }

    #[test]
    fn test_no_filters_includes_everything() {
        let filter = FilterSet::default();
        assert!(!check(&filter, "anything.txt", true, &[]));
        assert!(!check(&filter, "dir", false, &[]));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let filter = FilterSet::new([], [], globs(&["*.log"]), globs(&["keep.log"]));
        assert!(!check(&filter, "keep.log", true, &[]));
        assert!(check(&filter, "drop.log", true, &[]));
    }

    #[test]
    fn test_include_list_is_strict_allow_list() {
        let filter = FilterSet::new([], [], vec![], globs(&["*.md"]));
        assert!(!check(&filter, "README.md", true, &[]));
        assert!(check(&filter, "main.rs", true, &[]));
        assert!(check(&filter, "src", false, &[]));
    }

    #[test]
    fn test_include_overrides_extension_and_ignore_rules() {
        let root = PathBuf::from("/project");
        let filter = FilterSet::new([], [".log".to_string()], vec![], globs(&["*.log"]));
        let ignore = rules(&root, &["*.log"]);
        assert!(!check(&filter, "app.log", true, &ignore));
    }

    #[test]
    fn test_exclude_dirs_beats_include() {
        let filter = FilterSet::new(["node_modules".to_string()], [], vec![], globs(&["*"]));
        assert!(check(&filter, "node_modules", false, &[]));
        assert!(!check(&filter, "src", false, &[]));
    }

    #[test]
    fn test_extension_exclusion_is_case_insensitive() {
        let filter = FilterSet::new([], [".TXT".to_string()], vec![], vec![]);
        assert!(check(&filter, "file.txt", true, &[]));
        assert!(check(&filter, "FILE.TXT", true, &[]));
        assert!(!check(&filter, "file.md", true, &[]));
    }

    #[test]
    fn test_extension_exclusion_skips_directories() {
        let filter = FilterSet::new([], ["txt".to_string()], vec![], vec![]);
        assert!(!check(&filter, "notes.txt", false, &[]));
    }

    #[test]
    fn test_ignore_negation() {
        let root = PathBuf::from("/project");
        let ignore = rules(&root, &["*.log", "!keep.log"]);
        let filter = FilterSet::default();
        assert!(check(&filter, "other.log", true, &ignore));
        assert!(!check(&filter, "keep.log", true, &ignore));
        assert!(!check(&filter, "main.rs", true, &ignore));
    }

    #[test]
    fn test_ignore_first_negation_wins() {
        // A negation that matches stops evaluation, even if a later rule would exclude.
        let root = PathBuf::from("/project");
        let ignore = rules(&root, &["!keep.log", "*.log"]);
        assert!(!check(&FilterSet::default(), "keep.log", true, &ignore));
    }

    #[test]
    fn test_exclude_pattern_checked_before_ignore_negation() {
        let root = PathBuf::from("/project");
        let ignore = rules(&root, &["!*.log"]);
        let filter = FilterSet::new([], [], globs(&["debug.*"]), vec![]);
        assert!(check(&filter, "debug.log", true, &ignore));
    }

    #[test]
    fn test_relative_slash_path() {
        let base = Path::new("/a/b");
        assert_eq!(relative_slash_path(&base.join("c").join("d.txt"), base), "c/d.txt");
        assert_eq!(relative_slash_path(Path::new("/x/y"), base), "/x/y");
    }
}
