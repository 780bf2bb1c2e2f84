//! Git working-tree status markers

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use git2::{Repository, Status, StatusOptions};
use serde::{Serialize, Serializer};

use crate::diagnostics::{Diagnostic, Reporter, TracingReporter};

/// Status of a changed file, as shown next to its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitStatus {
    Untracked,
    Modified,
    Added,
    Deleted,
}

impl GitStatus {
    pub fn marker(self) -> char {
        match self {
            GitStatus::Untracked => 'U',
            GitStatus::Modified => 'M',
            GitStatus::Added => 'A',
            GitStatus::Deleted => 'D',
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'U' => Some(GitStatus::Untracked),
            'M' => Some(GitStatus::Modified),
            'A' => Some(GitStatus::Added),
            'D' => Some(GitStatus::Deleted),
            _ => None,
        }
    }

    /// Classify raw libgit2 status bits. Ignored and clean entries yield `None`.
    fn from_status(status: Status) -> Option<Self> {
        if status.contains(Status::IGNORED) {
            return None;
        }
        if status.intersects(Status::WT_DELETED | Status::INDEX_DELETED) {
            Some(GitStatus::Deleted)
        } else if status.contains(Status::INDEX_NEW) {
            Some(GitStatus::Added)
        } else if status.contains(Status::WT_NEW) {
            Some(GitStatus::Untracked)
        } else if status.intersects(
            Status::WT_MODIFIED
                | Status::INDEX_MODIFIED
                | Status::WT_RENAMED
                | Status::INDEX_RENAMED
                | Status::WT_TYPECHANGE
                | Status::INDEX_TYPECHANGE,
        ) {
            Some(GitStatus::Modified)
        } else {
            None
        }
    }
}

impl fmt::Display for GitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

impl Serialize for GitStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.marker())
    }
}

/// Canonical absolute file path to status.
pub type GitStatusMap = HashMap<PathBuf, GitStatus>;

/// Collect the status of every changed file in the repository containing
/// `path`. Returns `None` when `path` is not inside a work tree.
pub fn collect_git_status(path: &Path) -> Option<GitStatusMap> {
    collect_git_status_with(path, &TracingReporter)
}

/// Like [`collect_git_status`], reporting an unreadable status to `reporter`.
pub fn collect_git_status_with(path: &Path, reporter: &dyn Reporter) -> Option<GitStatusMap> {
    let repo = Repository::discover(path).ok()?;
    let workdir = repo.workdir()?;
    let repo_root = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());

    let mut options = StatusOptions::new();
    options
        .include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);

    let statuses = match repo.statuses(Some(&mut options)) {
        Ok(s) => s,
        Err(e) => {
            reporter.report(Diagnostic::Git {
                path: path.to_path_buf(),
                message: e.message().to_string(),
            });
            return None;
        }
    };

    let mut map = GitStatusMap::new();
    for entry in statuses.iter() {
        let Some(status) = GitStatus::from_status(entry.status()) else {
            continue;
        };
        if let Some(relative) = entry.path() {
            map.insert(repo_root.join(relative), status);
        }
    }

    Some(map)
}

/// Key used to look up a traversed file in a [`GitStatusMap`].
pub fn status_key(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
