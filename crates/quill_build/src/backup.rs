//! Pre-build snapshot of task outputs for rollback on failure.
//!
//! If a compiler invocation throws after mutating outputs, the next
//! execution's change detection can no longer trust the output set and
//! would be forced into a full rebuild. To prevent that, the task snapshots
//! all declared outputs (minus an exclusion set) into a side directory
//! before risking an incremental build, and restores them if the invocation
//! fails.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Name of the snapshot index file within the snapshot directory.
const INDEX_FILE: &str = "index.json";

/// One snapshotted file: where it was stored and where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotEntry {
    /// File name within the snapshot directory.
    stored: String,
    /// Original absolute path of the output file.
    original: PathBuf,
}

/// A pre-build copy of declared task outputs enabling rollback on failure.
///
/// Best-effort, single-writer: the model assumes no concurrent mutation of
/// the same output set while the snapshot exists.
pub struct TaskOutputsBackup {
    /// Directory the snapshot is written into.
    snapshot_dir: PathBuf,
    /// Output files and directories to snapshot.
    outputs_to_restore: Vec<PathBuf>,
    /// Paths excluded from the snapshot (exact file or whole subtree).
    excludes: Vec<PathBuf>,
    /// Entries recorded by [`create_snapshot`](Self::create_snapshot).
    entries: Vec<SnapshotEntry>,
}

impl TaskOutputsBackup {
    /// Creates a backup over the given outputs, minus the exclusion set.
    ///
    /// `outputs_to_restore` entries may be files or directories;
    /// directories are expanded to their files when the snapshot is taken.
    pub fn new(
        snapshot_dir: PathBuf,
        outputs_to_restore: Vec<PathBuf>,
        excludes: Vec<PathBuf>,
    ) -> Self {
        Self {
            snapshot_dir,
            outputs_to_restore,
            excludes,
            entries: Vec::new(),
        }
    }

    /// Copies every non-excluded output file into the snapshot directory.
    ///
    /// Any previous snapshot at the same location is discarded first. An
    /// `index.json` mapping stored names to original paths is written
    /// alongside the copies so a snapshot is inspectable on disk.
    pub fn create_snapshot(&mut self) -> Result<(), BuildError> {
        self.delete_snapshot()?;
        std::fs::create_dir_all(&self.snapshot_dir).map_err(|e| BuildError::Io {
            path: self.snapshot_dir.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for output in &self.outputs_to_restore {
            collect_files(output, &mut files)?;
        }

        self.entries.clear();
        for (index, original) in files.into_iter().enumerate() {
            if self.is_excluded(&original) {
                continue;
            }
            let stored = format!("{index:06}.bak");
            let target = self.snapshot_dir.join(&stored);
            std::fs::copy(&original, &target).map_err(|e| BuildError::Io {
                path: original.clone(),
                source: e,
            })?;
            self.entries.push(SnapshotEntry { stored, original });
        }

        let index_path = self.snapshot_dir.join(INDEX_FILE);
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            BuildError::Serialization {
                reason: e.to_string(),
            }
        })?;
        std::fs::write(&index_path, json).map_err(|e| BuildError::Io {
            path: index_path,
            source: e,
        })
    }

    /// Puts every snapshotted file back at its original path.
    ///
    /// Parent directories are recreated as needed. Files created after the
    /// snapshot was taken are left in place; a subsequent full rebuild
    /// cleans them up.
    pub fn restore_outputs(&self) -> Result<(), BuildError> {
        for entry in &self.entries {
            if let Some(parent) = entry.original.parent() {
                std::fs::create_dir_all(parent).map_err(|e| BuildError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
            let stored = self.snapshot_dir.join(&entry.stored);
            std::fs::copy(&stored, &entry.original).map_err(|e| BuildError::Io {
                path: entry.original.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Removes the snapshot directory and everything in it.
    pub fn delete_snapshot(&self) -> Result<(), BuildError> {
        match std::fs::remove_dir_all(&self.snapshot_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::Io {
                path: self.snapshot_dir.clone(),
                source: e,
            }),
        }
    }

    /// Returns the number of files captured by the last snapshot.
    pub fn snapshotted_count(&self) -> usize {
        self.entries.len()
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excludes
            .iter()
            .any(|exclude| path == exclude || path.starts_with(exclude))
    }
}

/// Recursively collects the files under `path` into `out`.
///
/// A missing path is skipped: declared outputs need not exist yet.
fn collect_files(path: &Path, out: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    if path.is_file() {
        out.push(path.to_path_buf());
        return Ok(());
    }
    if !path.is_dir() {
        return Ok(());
    }
    let entries = std::fs::read_dir(path).map_err(|e| BuildError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        collect_files(&entry.path(), out)?;
    }
    Ok(())
}
