//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;

/// A temporary directory tree for testing, optionally a git repository.
///
/// The directory is removed when dropped.
pub struct TestTree {
    dir: TempDir,
    repo: Option<Repository>,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir, repo: None }
    }

    /// Create a new temporary directory with git initialized.
    pub fn with_git() -> Self {
        let mut tree = Self::new();
        tree.init_git();
        tree
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Initialize a git repository in the temporary directory.
    pub fn init_git(&mut self) {
        let repo = Repository::init(self.dir.path()).expect("Failed to init git");
        {
            let mut config = repo.config().expect("Failed to open git config");
            config
                .set_str("user.email", "test@test.com")
                .expect("Failed to set git email");
            config
                .set_str("user.name", "Test")
                .expect("Failed to set git name");
        }
        self.repo = Some(repo);
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Write a file with `lines` numbered lines.
    pub fn add_lines(&self, path: &str, lines: usize) -> PathBuf {
        let content: String = (1..=lines).map(|i| format!("line {}\n", i)).collect();
        self.add_file(path, &content)
    }

    /// Create an empty directory (and its parents).
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Stage one path in the index.
    pub fn stage(&self, path: &str) {
        let repo = self.repo.as_ref().expect("Git not initialized");
        let mut index = repo.index().expect("Failed to open index");
        index.add_path(Path::new(path)).expect("Failed to git add");
        index.write().expect("Failed to write index");
    }

    /// Stage all files in the repository.
    pub fn stage_all(&self) {
        let repo = self.repo.as_ref().expect("Git not initialized");
        let mut index = repo.index().expect("Failed to open index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("Failed to git add");
        index.write().expect("Failed to write index");
    }

    /// Commit the current index with the given message.
    pub fn commit(&self, message: &str) {
        let repo = self.repo.as_ref().expect("Git not initialized");
        let mut index = repo.index().expect("Failed to open index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");
        let signature = Signature::now("Test", "test@test.com").expect("Failed to sign");
        let parent = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .expect("Failed to commit");
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
