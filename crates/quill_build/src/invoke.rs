//! Asynchronous compiler invocation behind an explicit completion handle.
//!
//! The compiler runs on a worker thread. Rollback of the outputs backup is
//! chained inside the worker, so by the time [`CompileHandle::wait`]
//! returns an error the outputs have already been restored. Callers must
//! never assume compilation has finished just because the launching call
//! returned.

use std::path::PathBuf;
use std::process::Command;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::backup::TaskOutputsBackup;
use crate::changes::ChangedFiles;
use crate::error::BuildError;
use crate::metrics::{BuildEvent, BuildMetrics, BuildTime};

/// Everything one compiler invocation needs.
#[derive(Debug, Clone)]
pub struct CompileJob {
    /// Prepared command-line tokens, in final order.
    pub argument_tokens: Vec<String>,
    /// The source files being compiled.
    pub sources: Vec<PathBuf>,
    /// Change classification for the incremental engine.
    pub changed_files: ChangedFiles,
    /// Path of the build-history file (opaque; owned by the compiler).
    pub build_history_file: PathBuf,
    /// Path of the ABI snapshot file (opaque; owned by the compiler).
    pub abi_snapshot_file: PathBuf,
}

/// The actual compiler behind the invocation seam.
///
/// Implementations run synchronously on the worker thread the handle owns.
pub trait Compiler: Send + 'static {
    /// Compiles the job, returning an error on failure.
    fn compile(&self, job: &CompileJob) -> Result<(), BuildError>;
}

/// Launches the `quillc` binary as a child process.
pub struct ProcessCompiler {
    binary: PathBuf,
}

impl ProcessCompiler {
    /// Creates a process compiler for the given binary path.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Compiler for ProcessCompiler {
    fn compile(&self, job: &CompileJob) -> Result<(), BuildError> {
        let status = Command::new(&self.binary)
            .args(&job.argument_tokens)
            .status()
            .map_err(|e| BuildError::CompilerLaunch {
                binary: self.binary.clone(),
                source: e,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildError::CompilerFailed {
                code: status.code(),
            })
        }
    }
}

/// Completion handle for an in-flight compiler invocation.
///
/// The invocation may still be running when the handle is obtained. Any
/// action requiring a finished compilation must go through [`wait`];
/// dropping the handle without waiting detaches the worker.
///
/// [`wait`]: Self::wait
pub struct CompileHandle {
    receiver: mpsc::Receiver<Result<(), BuildError>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CompileHandle {
    /// Spawns the worker thread that runs `compiler` on `job`.
    ///
    /// On failure the worker restores `outputs_backup` (when present)
    /// before signaling completion; on success it deletes the snapshot.
    /// Compiler execution time is recorded into `metrics` from the worker.
    pub fn spawn<C: Compiler>(
        compiler: C,
        job: CompileJob,
        outputs_backup: Option<TaskOutputsBackup>,
        metrics: Arc<BuildMetrics>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::spawn(move || {
            let result = metrics.measure(BuildTime::CompilerExecution, || compiler.compile(&job));

            let outcome = match result {
                Ok(()) => {
                    if let Some(backup) = outputs_backup {
                        // The snapshot has served its purpose.
                        let _ = backup.delete_snapshot();
                    }
                    Ok(())
                }
                Err(err) => {
                    if let Some(backup) = outputs_backup {
                        let restored =
                            metrics.measure(BuildTime::RestoreOutputs, || backup.restore_outputs());
                        if restored.is_ok() {
                            metrics.report_event(BuildEvent::OutputsRestored);
                            let _ = backup.delete_snapshot();
                        }
                    }
                    Err(err)
                }
            };
            let _ = sender.send(outcome);
        });

        Self {
            receiver,
            worker: Some(worker),
        }
    }

    /// Blocks until the invocation completes and returns its outcome.
    ///
    /// If the worker disappeared without reporting (a panic), this returns
    /// [`BuildError::WorkerLost`].
    pub fn wait(mut self) -> Result<(), BuildError> {
        let outcome = self.receiver.recv().map_err(|_| BuildError::WorkerLost);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        outcome?
    }
}
