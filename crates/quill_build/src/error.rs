//! Error types for build-task operations.

use std::path::PathBuf;

/// Errors that can occur while orchestrating a compile task.
///
/// Change tracking is fail-safe and never produces these errors: a broken
/// inputs-state file degrades to a full rebuild instead. Errors here are
/// real build-step failures surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// An I/O error occurred while touching task state or outputs.
    #[error("build I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The compiler binary could not be launched at all.
    #[error("failed to launch compiler {binary}: {source}")]
    CompilerLaunch {
        /// Path of the compiler binary.
        binary: PathBuf,
        /// The underlying spawn error.
        source: std::io::Error,
    },

    /// The compiler ran but reported failure.
    #[error("compiler exited with status code {code:?}")]
    CompilerFailed {
        /// The process exit code, if one was reported.
        code: Option<i32>,
    },

    /// The compilation worker terminated without reporting an outcome.
    #[error("compilation worker terminated without reporting an outcome")]
    WorkerLost,
}
