//! Tracked input collections and change classification.
//!
//! The task tracks several labeled input collections (sources, libraries,
//! common sources). A build execution comes with an [`InputChanges`] report
//! describing whether the execution may run incrementally and, per
//! collection, which files changed. Before invoking the compiler the task
//! folds that report into a [`ChangedFiles`] classification: a known
//! modified/removed split when deltas can be trusted, or `Unknown` when
//! they cannot.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// A labeled set of tracked input files.
///
/// The label identifies the collection across executions (it keys the
/// persisted inputs state), so it must stay stable for a given task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCollection {
    /// Stable collection label (e.g. `"sources"`, `"libraries"`).
    pub label: String,
    /// The files currently in the collection.
    pub files: Vec<PathBuf>,
}

impl FileCollection {
    /// Creates a collection with the given label and files.
    pub fn new(label: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            label: label.into(),
            files,
        }
    }

    /// Creates an empty collection with the given label.
    pub fn empty(label: impl Into<String>) -> Self {
        Self::new(label, Vec::new())
    }

    /// Returns `true` if the collection holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// How a single tracked file changed since the previous execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The file was not tracked before.
    Added,
    /// The file's content hash differs from the previous execution.
    Modified,
    /// The file was tracked before but is no longer present.
    Removed,
}

/// One changed file within a tracked collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// The changed file.
    pub path: PathBuf,
    /// How it changed.
    pub kind: ChangeKind,
}

/// The change-detection report for one build execution.
///
/// When `incremental` is `false` (first build, or the inputs state could
/// not be trusted) the per-collection deltas are meaningless and the task
/// must assume everything changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputChanges {
    /// Whether this execution may run incrementally.
    pub incremental: bool,
    /// Per-collection file changes, keyed by collection label.
    pub changes: BTreeMap<String, Vec<FileChange>>,
}

impl InputChanges {
    /// A report forcing a full (non-incremental) execution.
    pub fn full_rebuild() -> Self {
        Self {
            incremental: false,
            changes: BTreeMap::new(),
        }
    }

    /// An incremental report with the given per-collection changes.
    pub fn with_changes(changes: BTreeMap<String, Vec<FileChange>>) -> Self {
        Self {
            incremental: true,
            changes,
        }
    }

    /// Returns the changes recorded for a collection label, if any.
    pub fn changes_for(&self, label: &str) -> &[FileChange] {
        self.changes.get(label).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Change classification handed to the compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangedFiles {
    /// Deltas can be trusted: files to recompile and files that vanished.
    Known {
        /// Added or modified files across all tracked collections.
        modified: Vec<PathBuf>,
        /// Removed files across all tracked collections.
        removed: Vec<PathBuf>,
    },
    /// Nothing can be assumed about deltas; the compiler must recompute
    /// conservatively.
    Unknown,
}

impl ChangedFiles {
    /// Folds the change report for the given collection labels into a
    /// classification.
    ///
    /// A non-incremental execution always classifies as [`Unknown`],
    /// regardless of what deltas the report happens to carry.
    ///
    /// [`Unknown`]: ChangedFiles::Unknown
    pub fn classify(input_changes: &InputChanges, labels: &[&str]) -> ChangedFiles {
        if !input_changes.incremental {
            return ChangedFiles::Unknown;
        }

        let mut modified = Vec::new();
        let mut removed = Vec::new();
        for label in labels {
            for change in input_changes.changes_for(label) {
                match change.kind {
                    ChangeKind::Added | ChangeKind::Modified => modified.push(change.path.clone()),
                    ChangeKind::Removed => removed.push(change.path.clone()),
                }
            }
        }
        ChangedFiles::Known { modified, removed }
    }
}
