//! Incremental compile-task orchestration.
//!
//! This crate drives one compilation unit's build lifecycle: deciding
//! between an incremental and a full build, snapshotting declared outputs
//! so a failed incremental attempt can be rolled back, purging stale
//! outputs and local state when a full rebuild is required, classifying
//! input-file changes for the compiler, and launching the compiler on a
//! worker thread behind an explicit completion handle.
//!
//! The compiler invocation is asynchronous: [`task::CompileTask::execute`]
//! may return while compilation is still running. Anything that requires a
//! finished compilation must be sequenced through
//! [`invoke::CompileHandle::wait`], never through control-flow continuation.

#![warn(missing_docs)]

pub mod backup;
pub mod changes;
pub mod error;
pub mod invoke;
pub mod metrics;
pub mod task;
pub mod tracker;

pub use backup::TaskOutputsBackup;
pub use changes::{ChangeKind, ChangedFiles, FileChange, FileCollection, InputChanges};
pub use error::BuildError;
pub use invoke::{CompileHandle, CompileJob, Compiler, ProcessCompiler};
pub use metrics::{BuildEvent, BuildMetrics, BuildTime};
pub use task::{CompileTask, TaskExecution};
pub use tracker::InputTracker;
