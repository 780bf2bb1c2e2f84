//! TreeBuilder - walks a directory and builds the filtered tree in memory

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::diagnostics::{Diagnostic, Reporter, TracingReporter};
use crate::error::{Error, Result};
use crate::filter::{Candidate, FilterSet, IgnoreRule, compile_patterns, load_ignore_rules};
use crate::git::{GitStatusMap, status_key};
use crate::metrics::{count_lines, size_and_mtime};

use super::config::BuildOptions;
use super::node::{DirectoryNode, FileEntry, Totals};

/// Result of one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTree {
    pub root: DirectoryNode,
    /// Extensions of every retained file, lower-cased with the leading dot.
    pub extensions: BTreeSet<String>,
}

/// Builds a [`DirectoryNode`] tree from the filesystem.
///
/// Traversal is depth-first and single-threaded. Problems confined to one
/// entry or subtree are handed to the reporter; only an invalid root fails
/// the whole build.
pub struct TreeBuilder {
    options: BuildOptions,
    git_status: Option<GitStatusMap>,
    reporter: Arc<dyn Reporter>,
    /// Compiled on the first build and reused, so a bad pattern is reported once.
    filter: OnceLock<FilterSet>,
}

/// State shared by every level of one build.
struct Walk<'a> {
    root: &'a Path,
    filter: &'a FilterSet,
}

impl TreeBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            git_status: None,
            reporter: Arc::new(TracingReporter),
            filter: OnceLock::new(),
        }
    }

    /// Annotate files found in `status` with their marker.
    pub fn with_git_status(mut self, status: GitStatusMap) -> Self {
        self.git_status = Some(status);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self.filter = OnceLock::new();
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(&self, root: &Path) -> Result<BuiltTree> {
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root.to_path_buf()));
        }

        let walk = Walk {
            root,
            filter: self.filter.get_or_init(|| self.compile_filter()),
        };
        let mut extensions = BTreeSet::new();
        let node = self.walk_dir(&walk, root, 0, &[], &mut extensions);

        Ok(BuiltTree {
            root: node,
            extensions,
        })
    }

    fn compile_filter(&self) -> FilterSet {
        let reporter = &*self.reporter;
        let kind = self.options.pattern_kind;
        FilterSet::new(
            self.options.exclude_dirs.iter().cloned(),
            self.options.exclude_extensions.iter().cloned(),
            compile_patterns(&self.options.exclude_patterns, kind, reporter),
            compile_patterns(&self.options.include_patterns, kind, reporter),
        )
    }

    fn walk_dir(
        &self,
        walk: &Walk<'_>,
        dir: &Path,
        depth: usize,
        inherited: &[IgnoreRule],
        extensions: &mut BTreeSet<String>,
    ) -> DirectoryNode {
        // Nothing at or below the limit is touched on disk.
        if self.options.at_max_depth(depth) {
            return DirectoryNode::sentinel();
        }

        let rules = self.rules_for(dir, inherited);
        let mut node = DirectoryNode::default();

        for entry in self.read_entries(dir).unwrap_or_default() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(is_dir) = entry_is_dir(&entry) else {
                continue;
            };

            let candidate = Candidate::new(&path, &name, walk.root, !is_dir);
            if walk.filter.is_excluded(&candidate, &rules) {
                continue;
            }

            if is_dir {
                let child = self.walk_dir(walk, &path, depth + 1, &rules, extensions);
                node.children.insert(name, child);
            } else {
                let status = self
                    .git_status
                    .as_ref()
                    .and_then(|m| m.get(&status_key(&path)));
                if let Some(status) = status {
                    node.git_markers.insert(name.clone(), *status);
                }
                let file = self.file_entry(&path, name);
                if let Some(ext) = file.extension() {
                    extensions.insert(ext);
                }
                node.files.push(file);
            }
        }

        if self.options.metrics.any() {
            node.totals = Some(aggregate(&node));
        }
        node
    }

    /// Inherited rules plus those from `dir`'s own ignore file.
    fn rules_for<'r>(&self, dir: &Path, inherited: &'r [IgnoreRule]) -> Cow<'r, [IgnoreRule]> {
        let Some(file_name) = self.options.ignore_file.as_deref() else {
            return Cow::Borrowed(inherited);
        };
        let own = load_ignore_rules(dir, file_name, &*self.reporter);
        if own.is_empty() {
            return Cow::Borrowed(inherited);
        }
        let mut rules = inherited.to_vec();
        rules.extend(own);
        Cow::Owned(rules)
    }

    /// List a directory sorted by name. Failures are reported and yield `None`.
    fn read_entries(&self, dir: &Path) -> Option<Vec<fs::DirEntry>> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                self.reporter.report(Diagnostic::PermissionDenied {
                    path: dir.to_path_buf(),
                });
                return None;
            }
            Err(e) => {
                self.reporter.report(Diagnostic::ReadDir {
                    path: dir.to_path_buf(),
                    message: e.to_string(),
                });
                return None;
            }
        };

        let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
        entries.sort_by_key(|a| a.file_name());
        Some(entries)
    }

    fn file_entry(&self, path: &Path, name: String) -> FileEntry {
        let metrics = self.options.metrics;
        let mut file = FileEntry::new(name);

        if self.options.show_full_path {
            file.display_path = Some(absolute_slash_path(path));
        }

        if metrics.lines {
            match count_lines(path) {
                Ok(lines) => file.lines = Some(lines),
                Err(e) => self.report_metrics(path, &e),
            }
        }

        if metrics.size || metrics.mtime {
            match size_and_mtime(path) {
                Ok((size, modified)) => {
                    if metrics.size {
                        file.size = Some(size);
                    }
                    if metrics.mtime {
                        file.modified = Some(modified);
                    }
                }
                Err(e) => self.report_metrics(path, &e),
            }
        }

        file
    }

    fn report_metrics(&self, path: &Path, error: &io::Error) {
        self.reporter.report(Diagnostic::Metrics {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }
}

/// Build a tree with diagnostics sent to `tracing`.
pub fn build_tree(root: &Path, options: &BuildOptions) -> Result<BuiltTree> {
    TreeBuilder::new(options.clone()).build(root)
}

/// `Some(true)` for a directory to descend, `Some(false)` for anything
/// listed as a file, `None` to skip.
///
/// Symlinked directories are skipped to prevent cycles. Symlinks to files
/// and broken links are listed as files.
fn entry_is_dir(entry: &fs::DirEntry) -> Option<bool> {
    let file_type = entry.file_type().ok()?;
    if file_type.is_symlink() {
        if entry.path().is_dir() {
            return None;
        }
        return Some(false);
    }
    Some(file_type.is_dir())
}

fn aggregate(node: &DirectoryNode) -> Totals {
    let mut totals = Totals::default();
    for file in &node.files {
        totals.add_file(file);
    }
    for child in node.children.values() {
        if let Some(child_totals) = &child.totals {
            totals.add(child_totals);
        }
    }
    totals
}

fn absolute_slash_path(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| PathBuf::from(path));
    let text = absolute.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingReporter;
    use crate::filter::PatternKind;
    use crate::git::{GitStatus, collect_git_status};
    use crate::metrics::MetricFlags;
    use crate::test_utils::TestTree;

    fn names(node: &DirectoryNode) -> Vec<&str> {
        node.files.iter().map(|f| f.name.as_str()).collect()
    }

    fn build(tree: &TestTree, options: BuildOptions) -> BuiltTree {
        TreeBuilder::new(options).build(tree.path()).unwrap()
    }

    fn deep_fixture() -> TestTree {
        let tree = TestTree::new();
        tree.add_file("level1/level2/level3/level4/level5/level6/bottom.txt", "x");
        tree.add_file("level1/one.txt", "x");
        tree
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let tree = TestTree::new();
        tree.add_file("a.txt", "a");
        tree.add_file("b.rs", "b");
        tree.add_file("src/lib.rs", "c");
        tree.add_dir("empty");

        let built = build(&tree, BuildOptions::default());
        assert_eq!(names(&built.root), vec!["a.txt", "b.rs"]);
        assert_eq!(built.root.children.len(), 2);
        assert_eq!(names(built.root.child("src").unwrap()), vec!["lib.rs"]);
        assert!(built.root.child("empty").unwrap().is_empty());
        assert_eq!(built.root.file_count(), 3);
        assert!(built.root.totals.is_none());
    }

    #[test]
    fn test_build_is_idempotent() {
        let tree = TestTree::new();
        tree.add_lines("src/main.rs", 3);
        tree.add_file("docs/guide.md", "hi");
        let options = BuildOptions {
            metrics: MetricFlags::all(),
            ..Default::default()
        };
        assert_eq!(build(&tree, options.clone()), build(&tree, options));
    }

    #[test]
    fn test_extensions_collected() {
        let tree = TestTree::new();
        tree.add_file("a.PY", "");
        tree.add_file("sub/b.rs", "");
        tree.add_file("Makefile", "");

        let built = build(&tree, BuildOptions::default());
        let exts: Vec<&str> = built.extensions.iter().map(String::as_str).collect();
        assert_eq!(exts, vec![".py", ".rs"]);
    }

    #[test]
    fn test_invalid_root() {
        let tree = TestTree::new();
        let file = tree.add_file("file.txt", "x");
        let builder = TreeBuilder::new(BuildOptions::default());

        assert!(matches!(builder.build(&file), Err(Error::InvalidRoot(_))));
        assert!(matches!(
            builder.build(&tree.path().join("missing")),
            Err(Error::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_unlimited_depth_shows_all_levels() {
        let tree = deep_fixture();
        let built = build(&tree, BuildOptions::default());

        assert_eq!(built.root.depth(), 6);
        let bottom = built
            .root
            .descend("level1/level2/level3/level4/level5/level6")
            .unwrap();
        assert_eq!(names(bottom), vec!["bottom.txt"]);
    }

    #[test]
    fn test_depth_one_stops_at_sentinel() {
        let tree = deep_fixture();
        let built = build(
            &tree,
            BuildOptions {
                max_depth: 1,
                ..Default::default()
            },
        );

        let level1 = built.root.child("level1").unwrap();
        assert!(level1.is_sentinel());
        assert!(level1.is_empty());
        assert_eq!(built.root.depth(), 0);
    }

    #[test]
    fn test_depth_three() {
        let tree = deep_fixture();
        let built = build(
            &tree,
            BuildOptions {
                max_depth: 3,
                ..Default::default()
            },
        );

        assert_eq!(names(built.root.child("level1").unwrap()), vec!["one.txt"]);
        assert!(built.root.descend("level1/level2/level3").unwrap().is_sentinel());
        assert_eq!(built.root.depth(), 2);
    }

    #[test]
    fn test_include_overrides_exclude() {
        let tree = TestTree::new();
        tree.add_file("keep.log", "");
        tree.add_file("drop.log", "");

        let built = build(
            &tree,
            BuildOptions {
                exclude_patterns: vec!["*.log".to_string()],
                include_patterns: vec!["keep.log".to_string()],
                ..Default::default()
            },
        );
        assert_eq!(names(&built.root), vec!["keep.log"]);
    }

    #[test]
    fn test_extension_exclusion_ignores_case() {
        let tree = TestTree::new();
        tree.add_file("file.txt", "");
        tree.add_file("FILE2.TXT", "");
        tree.add_file("main.rs", "");

        let built = build(
            &tree,
            BuildOptions {
                exclude_extensions: vec![".TXT".to_string()],
                ..Default::default()
            },
        );
        assert_eq!(names(&built.root), vec!["main.rs"]);
    }

    #[test]
    fn test_exclude_dirs_by_exact_name() {
        let tree = TestTree::new();
        tree.add_file("node_modules/pkg/index.js", "");
        tree.add_file("node_modules_backup/keep.js", "");
        tree.add_file("src/node_modules/inner.js", "");

        let built = build(
            &tree,
            BuildOptions {
                exclude_dirs: vec!["node_modules".to_string()],
                ..Default::default()
            },
        );
        assert!(built.root.child("node_modules").is_none());
        assert!(built.root.child("node_modules_backup").is_some());
        assert!(built.root.descend("src/node_modules").is_none());
    }

    #[test]
    fn test_exclude_pattern_against_relative_path() {
        let tree = TestTree::new();
        tree.add_file("src/generated/out.rs", "");
        tree.add_file("src/main.rs", "");

        let built = build(
            &tree,
            BuildOptions {
                exclude_patterns: vec!["src/generated".to_string()],
                ..Default::default()
            },
        );
        let src = built.root.child("src").unwrap();
        assert!(src.child("generated").is_none());
        assert_eq!(names(src), vec!["main.rs"]);
    }

    #[test]
    fn test_regex_patterns() {
        let tree = TestTree::new();
        tree.add_file("test_one.py", "");
        tree.add_file("main.py", "");

        let built = build(
            &tree,
            BuildOptions {
                exclude_patterns: vec!["^test_".to_string()],
                pattern_kind: PatternKind::Regex,
                ..Default::default()
            },
        );
        assert_eq!(names(&built.root), vec!["main.py"]);
    }

    #[test]
    fn test_invalid_regex_is_reported_once_and_traversal_continues() {
        let tree = TestTree::new();
        tree.add_file("a.txt", "");
        tree.add_file("(broken", "");
        let reporter = Arc::new(CollectingReporter::new());

        let built = TreeBuilder::new(BuildOptions {
            exclude_patterns: vec!["(broken".to_string()],
            pattern_kind: PatternKind::Regex,
            ..Default::default()
        })
        .with_reporter(reporter.clone())
        .build(tree.path())
        .unwrap();

        assert_eq!(names(&built.root), vec!["a.txt"]);
        let diagnostics = reporter.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0], Diagnostic::InvalidPattern { .. }));
    }

    #[test]
    fn test_ignore_file_negation() {
        let tree = TestTree::new();
        tree.add_file(".canopyignore", "*.log\n!keep.log\n");
        tree.add_file("other.log", "");
        tree.add_file("keep.log", "");

        let built = build(
            &tree,
            BuildOptions {
                ignore_file: Some(".canopyignore".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(names(&built.root), vec![".canopyignore", "keep.log"]);
    }

    #[test]
    fn test_nested_ignore_file_scoped_to_its_subtree() {
        let tree = TestTree::new();
        tree.add_file("a/.gitignore", "*.tmp\n");
        tree.add_file("a/x.tmp", "");
        tree.add_file("a/deep/y.tmp", "");
        tree.add_file("b/z.tmp", "");
        tree.add_file("w.tmp", "");

        let built = build(
            &tree,
            BuildOptions {
                ignore_file: Some(".gitignore".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(names(built.root.child("a").unwrap()), vec![".gitignore"]);
        assert!(names(built.root.descend("a/deep").unwrap()).is_empty());
        assert_eq!(names(built.root.child("b").unwrap()), vec!["z.tmp"]);
        assert_eq!(names(&built.root), vec!["w.tmp"]);
    }

    #[test]
    fn test_ignore_rule_relative_to_its_directory() {
        let tree = TestTree::new();
        tree.add_file("pkg/.gitignore", "build\n");
        tree.add_file("pkg/build/out.o", "");
        tree.add_file("build/keep.o", "");

        let built = build(
            &tree,
            BuildOptions {
                ignore_file: Some(".gitignore".to_string()),
                ..Default::default()
            },
        );
        assert!(built.root.descend("pkg/build").is_none());
        assert!(built.root.child("build").is_some());
    }

    #[test]
    fn test_end_to_end_scenario() {
        let tree = TestTree::new();
        tree.add_lines("src/main.py", 20);
        tree.add_lines("src/util.py", 5);
        tree.add_file("README.md", "# readme\n");
        // The ignore file is an ordinary file; hide it so it adds no lines.
        tree.add_file(".gitignore", "*.md\n.gitignore\n");

        let built = build(
            &tree,
            BuildOptions {
                ignore_file: Some(".gitignore".to_string()),
                metrics: MetricFlags {
                    lines: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let src = built.root.child("src").unwrap();
        assert_eq!(src.files.len(), 2);
        assert_eq!(src.file("main.py").unwrap().lines, Some(20));
        assert_eq!(src.file("util.py").unwrap().lines, Some(5));
        assert!(built.root.file("README.md").is_none());
        assert_eq!(built.root.totals.unwrap().lines, 25);
        assert_eq!(src.totals.unwrap().lines, 25);
    }

    #[test]
    fn test_size_and_mtime_totals() {
        let tree = TestTree::new();
        tree.add_file("a.bin", "12345");
        tree.add_file("sub/b.bin", "123");

        let built = build(
            &tree,
            BuildOptions {
                metrics: MetricFlags {
                    size: true,
                    mtime: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let a = built.root.file("a.bin").unwrap();
        assert_eq!(a.size, Some(5));
        assert!(a.modified.is_some());
        assert!(a.lines.is_none());

        let totals = built.root.totals.unwrap();
        assert_eq!(totals.size, 8);
        assert_eq!(totals.lines, 0);
        assert!(totals.latest_modified.is_some());
    }

    #[test]
    fn test_full_path_recorded() {
        let tree = TestTree::new();
        tree.add_file("src/main.rs", "");

        let built = build(
            &tree,
            BuildOptions {
                show_full_path: true,
                ..Default::default()
            },
        );
        let entry = built.root.descend("src").unwrap().file("main.rs").unwrap();
        let display = entry.display_path.as_deref().unwrap();
        assert!(display.ends_with("src/main.rs"), "{}", display);
        assert!(Path::new(display).is_absolute());
    }

    #[test]
    fn test_git_markers() {
        let tree = TestTree::with_git();
        tree.add_file("tracked.rs", "fn a() {}");
        tree.stage("tracked.rs");
        tree.commit("initial");
        tree.add_file("tracked.rs", "fn a() { b() }");
        tree.add_file("new.rs", "");

        let status = collect_git_status(tree.path()).unwrap();
        let built = TreeBuilder::new(BuildOptions {
            exclude_dirs: vec![".git".to_string()],
            ..Default::default()
        })
        .with_git_status(status)
        .build(tree.path())
        .unwrap();

        assert_eq!(built.root.git_marker("tracked.rs"), Some(GitStatus::Modified));
        assert_eq!(built.root.git_marker("new.rs"), Some(GitStatus::Untracked));
        assert!(built.root.child(".git").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dir_skipped_and_file_link_listed() {
        let tree = TestTree::new();
        let target = tree.add_file("real/data.txt", "x");
        std::os::unix::fs::symlink(tree.path().join("real"), tree.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(&target, tree.path().join("link.txt")).unwrap();
        std::os::unix::fs::symlink(tree.path().join("gone"), tree.path().join("broken")).unwrap();

        let built = build(&tree, BuildOptions::default());
        assert!(built.root.child("loop").is_none());
        assert_eq!(names(&built.root), vec!["broken", "link.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_permission_denied_subtree_is_empty() {
        use std::os::unix::fs::PermissionsExt;

        let tree = TestTree::new();
        tree.add_file("open/a.txt", "");
        tree.add_file("sibling.txt", "");
        let locked = tree.add_file("locked/secret.txt", "").parent().unwrap().to_path_buf();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let reporter = Arc::new(CollectingReporter::new());
        let result = TreeBuilder::new(BuildOptions::default())
            .with_reporter(reporter.clone())
            .build(tree.path());
        // Root can still list the directory; only check denial when it applies.
        let denied = fs::read_dir(&locked).is_err();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let built = result.unwrap();
        assert_eq!(names(&built.root), vec!["sibling.txt"]);
        assert_eq!(names(built.root.child("open").unwrap()), vec!["a.txt"]);
        if denied {
            assert!(built.root.child("locked").unwrap().is_empty());
            assert!(
                reporter
                    .diagnostics()
                    .iter()
                    .any(|d| matches!(d, Diagnostic::PermissionDenied { .. }))
            );
        }
    }

    #[test]
    fn test_build_tree_helper() {
        let tree = TestTree::new();
        tree.add_file("a.txt", "");
        let built = build_tree(tree.path(), &BuildOptions::default()).unwrap();
        assert_eq!(names(&built.root), vec!["a.txt"]);
    }
}
