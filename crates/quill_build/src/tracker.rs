//! Persisted input state and change detection between executions.
//!
//! The tracker stores a content hash for every tracked input file in an
//! `inputs-state.bin` file under the task's local-state directory. A scan
//! hashes the current files, diffs them against the stored state, and
//! produces an [`InputChanges`] report. Loading is fail-safe: a missing,
//! corrupt, or version-mismatched state file yields a non-incremental
//! report (full rebuild) instead of an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quill_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::changes::{ChangeKind, FileChange, FileCollection, InputChanges};
use crate::error::BuildError;

/// Name of the inputs-state file within the local-state directory.
const STATE_FILE: &str = "inputs-state.bin";

/// Magic bytes identifying a Quill inputs-state file.
const STATE_MAGIC: [u8; 4] = *b"QILS";

/// Current state format version. Increment on breaking changes.
const STATE_FORMAT_VERSION: u32 = 1;

/// Header prepended to the inputs-state payload for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateHeader {
    /// Magic bytes: must be `b"QILS"`.
    magic: [u8; 4],
    /// State format version.
    format_version: u32,
    /// Quill version that produced this state. Invalidate on change.
    quill_version: String,
    /// Content hash of the payload (for integrity checks).
    checksum: ContentHash,
}

/// The persisted per-collection input hashes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct InputsState {
    /// Per-collection file hashes, keyed by collection label.
    collections: BTreeMap<String, BTreeMap<PathBuf, ContentHash>>,
}

/// Detects input changes for a task by diffing against persisted state.
pub struct InputTracker {
    /// Path of the inputs-state file.
    state_file: PathBuf,
    /// Quill version stamped into (and required of) the state file.
    quill_version: String,
}

impl InputTracker {
    /// Creates a tracker persisting under the given local-state directory.
    pub fn new(local_state_dir: &Path, quill_version: &str) -> Self {
        Self {
            state_file: local_state_dir.join(STATE_FILE),
            quill_version: quill_version.to_string(),
        }
    }

    /// Returns the path of the inputs-state file.
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Scans the given collections and reports changes since the last commit.
    ///
    /// If no trustworthy previous state exists the report is
    /// non-incremental. Otherwise every tracked file is hashed and
    /// classified as added, modified, or removed; unchanged files are
    /// omitted from the report.
    pub fn scan(&self, collections: &[&FileCollection]) -> InputChanges {
        let Some(previous) = self.load_state() else {
            return InputChanges::full_rebuild();
        };

        let mut changes = BTreeMap::new();
        for collection in collections {
            let current = hash_files(&collection.files);
            let empty = BTreeMap::new();
            let known = previous.collections.get(&collection.label).unwrap_or(&empty);

            let mut collection_changes = Vec::new();
            for (path, hash) in &current {
                match known.get(path) {
                    Some(previous_hash) if previous_hash == hash => {}
                    Some(_) => collection_changes.push(FileChange {
                        path: path.clone(),
                        kind: ChangeKind::Modified,
                    }),
                    None => collection_changes.push(FileChange {
                        path: path.clone(),
                        kind: ChangeKind::Added,
                    }),
                }
            }
            for path in known.keys() {
                if !current.contains_key(path) {
                    collection_changes.push(FileChange {
                        path: path.clone(),
                        kind: ChangeKind::Removed,
                    });
                }
            }

            changes.insert(collection.label.clone(), collection_changes);
        }

        InputChanges::with_changes(changes)
    }

    /// Records the current state of the given collections.
    ///
    /// Called after a successful build so the next execution can scan
    /// incrementally.
    pub fn commit(&self, collections: &[&FileCollection]) -> Result<(), BuildError> {
        let mut state = InputsState::default();
        for collection in collections {
            state
                .collections
                .insert(collection.label.clone(), hash_files(&collection.files));
        }
        self.save_state(&state)
    }

    /// Removes the persisted state, forcing the next scan to be
    /// non-incremental.
    pub fn invalidate(&self) -> Result<(), BuildError> {
        match std::fs::remove_file(&self.state_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::Io {
                path: self.state_file.clone(),
                source: e,
            }),
        }
    }

    /// Loads the persisted state, returning `None` on any problem.
    ///
    /// Fail-safe: a missing file, bad magic, version mismatch, or checksum
    /// mismatch all degrade to a full rebuild.
    fn load_state(&self) -> Option<InputsState> {
        let bytes = std::fs::read(&self.state_file).ok()?;
        if bytes.len() < 4 {
            return None;
        }

        let header_len = u32::from_le_bytes(bytes[0..4].try_into().ok()?) as usize;
        let header_end = 4usize.checked_add(header_len)?;
        if bytes.len() < header_end {
            return None;
        }

        let (header, _): (StateHeader, _) =
            bincode::serde::decode_from_slice(&bytes[4..header_end], bincode::config::standard())
                .ok()?;
        if header.magic != STATE_MAGIC
            || header.format_version != STATE_FORMAT_VERSION
            || header.quill_version != self.quill_version
        {
            return None;
        }

        let payload = &bytes[header_end..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return None;
        }

        let (state, _) =
            bincode::serde::decode_from_slice(payload, bincode::config::standard()).ok()?;
        Some(state)
    }

    /// Writes the state file with a validated header.
    fn save_state(&self, state: &InputsState) -> Result<(), BuildError> {
        if let Some(parent) = self.state_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BuildError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let payload = bincode::serde::encode_to_vec(state, bincode::config::standard())
            .map_err(|e| BuildError::Serialization {
                reason: e.to_string(),
            })?;

        let header = StateHeader {
            magic: STATE_MAGIC,
            format_version: STATE_FORMAT_VERSION,
            quill_version: self.quill_version.clone(),
            checksum: ContentHash::from_bytes(&payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| BuildError::Serialization {
                reason: e.to_string(),
            })?;

        // Layout: 4-byte header length (little-endian) + header + payload.
        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);

        std::fs::write(&self.state_file, &output).map_err(|e| BuildError::Io {
            path: self.state_file.clone(),
            source: e,
        })
    }
}

/// Hashes the given files, silently skipping any that cannot be read.
///
/// Unreadable files are treated as absent, so they classify as removed on
/// the next scan.
fn hash_files(paths: &[PathBuf]) -> BTreeMap<PathBuf, ContentHash> {
    let mut hashes = BTreeMap::new();
    for path in paths {
        if let Ok(hash) = ContentHash::from_file(path) {
            hashes.insert(path.clone(), hash);
        }
    }
    hashes
}
