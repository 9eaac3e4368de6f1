//! The incremental compile task.
//!
//! One task drives one compilation unit. Independent units may execute
//! concurrently; a single task assumes it is the only writer of its output
//! directories. The task body is synchronous but the compiler invocation it
//! launches is not; see [`crate::invoke`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backup::TaskOutputsBackup;
use crate::changes::{ChangedFiles, FileCollection, InputChanges};
use crate::error::BuildError;
use crate::invoke::{CompileHandle, CompileJob, Compiler};
use crate::metrics::{BuildEvent, BuildMetrics, BuildTime};
use crate::tracker::InputTracker;

/// File name of the build-history artifact within the local-state directory.
const BUILD_HISTORY_FILE: &str = "build-history.bin";

/// File name of the ABI snapshot within the cacheable output directory.
const ABI_SNAPSHOT_FILE: &str = "abi-snapshot.bin";

/// The result of one task execution.
///
/// A launched execution is not a finished one: the handle must be waited on
/// before anything depending on compiler output runs.
pub enum TaskExecution {
    /// No sources and nothing to do; the compiler was never invoked.
    Skipped {
        /// Why outputs were purged first, if they were.
        cleaned: Option<&'static str>,
    },
    /// The compiler invocation was launched.
    Launched {
        /// Completion handle for the in-flight invocation.
        handle: CompileHandle,
        /// Why outputs were purged first, if they were.
        cleaned: Option<&'static str>,
    },
}

/// Drives one compilation unit's build lifecycle.
pub struct CompileTask {
    /// Task name, used in progress output.
    pub task_name: String,
    /// Declared output directories (e.g. the compiler's destination dir).
    pub output_dirs: Vec<PathBuf>,
    /// Cacheable output directory; holds the ABI snapshot.
    pub cacheable_output_dir: PathBuf,
    /// Local-state directory; holds the build history and inputs state.
    pub local_state_dir: PathBuf,
    /// Side location for the pre-build outputs snapshot.
    pub snapshot_dir: PathBuf,
    /// Whether this task should compile incrementally when possible.
    pub incremental: bool,
    /// Outputs excluded from the pre-build snapshot.
    pub backup_excludes: Vec<PathBuf>,
    /// The source files to compile.
    pub sources: FileCollection,
    /// The library classpath entries.
    pub libraries: FileCollection,
    /// Sources shared with other compilation units.
    pub common_sources: FileCollection,
    metrics: Arc<BuildMetrics>,
}

impl CompileTask {
    /// Creates a task with the standard directory layout under `build_dir`.
    ///
    /// Directories are only computed here; they are created lazily right
    /// before the compiler invocation. Creating them in the constructor can
    /// fail spuriously when independent tasks run in parallel.
    pub fn new(task_name: &str, build_dir: &Path) -> Self {
        let task_dir = build_dir.join("quill").join(task_name);
        Self {
            task_name: task_name.to_string(),
            output_dirs: Vec::new(),
            cacheable_output_dir: task_dir.join("cacheable"),
            local_state_dir: task_dir.join("local-state"),
            snapshot_dir: build_dir.join("snapshot").join("quill").join(task_name),
            incremental: false,
            backup_excludes: Vec::new(),
            sources: FileCollection::empty("sources"),
            libraries: FileCollection::empty("libraries"),
            common_sources: FileCollection::empty("common-sources"),
            metrics: Arc::new(BuildMetrics::new()),
        }
    }

    /// Path of the build-history file consumed by the incremental engine.
    pub fn build_history_file(&self) -> PathBuf {
        self.local_state_dir.join(BUILD_HISTORY_FILE)
    }

    /// Path of the ABI snapshot file produced by the compiler.
    pub fn abi_snapshot_file(&self) -> PathBuf {
        self.cacheable_output_dir.join(ABI_SNAPSHOT_FILE)
    }

    /// The metrics accumulator shared with compilation workers.
    pub fn metrics(&self) -> Arc<BuildMetrics> {
        Arc::clone(&self.metrics)
    }

    /// An input tracker persisting under this task's local-state directory.
    pub fn tracker(&self, quill_version: &str) -> InputTracker {
        InputTracker::new(&self.local_state_dir, quill_version)
    }

    /// The input collections whose changes feed the incremental engine.
    pub fn tracked_collections(&self) -> [&FileCollection; 3] {
        [&self.sources, &self.libraries, &self.common_sources]
    }

    /// All declared outputs, as snapshot roots.
    pub fn all_outputs(&self) -> Vec<PathBuf> {
        let mut outputs = self.output_dirs.clone();
        outputs.push(self.cacheable_output_dir.clone());
        outputs
    }

    /// Purges all previous outputs and transient local state.
    ///
    /// Guarantees the next compiler invocation sees a clean slate.
    pub fn clean_outputs_and_local_state(&self) -> Result<(), BuildError> {
        let mut targets = self.all_outputs();
        targets.push(self.local_state_dir.clone());
        for dir in targets {
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(BuildError::Io { path: dir, source: e }),
            }
        }
        Ok(())
    }

    /// Executes the task: decides incremental vs. full build, snapshots
    /// outputs, cleans stale state, and launches the compiler.
    ///
    /// `argument_tokens` is the prepared command line for this invocation.
    /// The returned [`TaskExecution::Launched`] handle is the only way to
    /// observe compilation completion; this method may return while the
    /// compiler is still running.
    pub fn execute<C: Compiler>(
        &self,
        input_changes: &InputChanges,
        argument_tokens: Vec<String>,
        compiler: C,
    ) -> Result<TaskExecution, BuildError> {
        let metrics = Arc::clone(&self.metrics);
        metrics.report_event(BuildEvent::CompilationStarted);

        self.metrics.measure(BuildTime::TaskAction, || {
            // A failed invocation that has already mutated outputs would
            // force the next execution into a full rebuild. Snapshot before
            // risking an incremental build so failure can roll back.
            let outputs_backup = if self.incremental && input_changes.incremental {
                metrics.report_event(BuildEvent::IncrementalCompilation);
                let backup = metrics.measure(BuildTime::BackupOutputs, || {
                    let mut backup = TaskOutputsBackup::new(
                        self.snapshot_dir.clone(),
                        self.all_outputs(),
                        self.backup_excludes.clone(),
                    );
                    backup.create_snapshot().map(|()| backup)
                })?;
                Some(backup)
            } else {
                None
            };

            let mut cleaned = None;
            if !self.incremental {
                self.clean_outputs_and_local_state()?;
                cleaned = Some("incremental compilation is disabled");
            } else if !input_changes.incremental {
                metrics.report_event(BuildEvent::FallbackToFullCompilation);
                self.clean_outputs_and_local_state()?;
                cleaned = Some("task cannot run incrementally");
            }

            // Skip only on a non-incremental run; an incremental run with no
            // sources may still need to remove outputs for deleted files.
            if !input_changes.incremental && self.sources.is_empty() {
                return Ok(TaskExecution::Skipped { cleaned });
            }

            for dir in [&self.cacheable_output_dir, &self.local_state_dir] {
                std::fs::create_dir_all(dir).map_err(|e| BuildError::Io {
                    path: dir.clone(),
                    source: e,
                })?;
            }

            let labels = [
                self.sources.label.as_str(),
                self.libraries.label.as_str(),
                self.common_sources.label.as_str(),
            ];
            let changed_files = ChangedFiles::classify(input_changes, &labels);

            let job = CompileJob {
                argument_tokens,
                sources: self.sources.files.clone(),
                changed_files,
                build_history_file: self.build_history_file(),
                abi_snapshot_file: self.abi_snapshot_file(),
            };
            let handle = CompileHandle::spawn(compiler, job, outputs_backup, self.metrics());
            Ok(TaskExecution::Launched { handle, cleaned })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::{ChangeKind, FileChange};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Records whether it ran and what classification it saw.
    struct RecordingCompiler {
        invoked: Arc<AtomicBool>,
        seen_changes: Arc<Mutex<Option<ChangedFiles>>>,
        fail: bool,
    }

    impl RecordingCompiler {
        fn new() -> (Self, Arc<AtomicBool>, Arc<Mutex<Option<ChangedFiles>>>) {
            let invoked = Arc::new(AtomicBool::new(false));
            let seen = Arc::new(Mutex::new(None));
            (
                Self {
                    invoked: Arc::clone(&invoked),
                    seen_changes: Arc::clone(&seen),
                    fail: false,
                },
                invoked,
                seen,
            )
        }
    }

    impl Compiler for RecordingCompiler {
        fn compile(&self, job: &CompileJob) -> Result<(), BuildError> {
            self.invoked.store(true, Ordering::SeqCst);
            *self.seen_changes.lock().unwrap() = Some(job.changed_files.clone());
            if self.fail {
                Err(BuildError::CompilerFailed { code: Some(1) })
            } else {
                Ok(())
            }
        }
    }

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn task_with_source(build_dir: &Path, source_dir: &Path) -> CompileTask {
        let source = source_dir.join("main.q");
        write(&source, "fn main() {}");
        let mut task = CompileTask::new("main", build_dir);
        task.output_dirs = vec![build_dir.join("out")];
        task.sources = FileCollection::new("sources", vec![source]);
        task
    }

    fn wait(execution: TaskExecution) -> Result<(), BuildError> {
        match execution {
            TaskExecution::Launched { handle, .. } => handle.wait(),
            TaskExecution::Skipped { .. } => panic!("expected a launched execution"),
        }
    }

    #[test]
    fn cleanup_unconditional_when_incremental_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = dir.path().join("build");
        let task = task_with_source(&build_dir, &dir.path().join("src"));

        // Stale state from a previous build.
        write(&build_dir.join("out").join("stale.qm"), "old");
        write(&task.local_state_dir.join("inputs-state.bin"), "old");

        let (compiler, invoked, _) = RecordingCompiler::new();
        let execution = task
            .execute(&InputChanges::full_rebuild(), vec![], compiler)
            .unwrap();

        match &execution {
            TaskExecution::Launched { cleaned, .. } => {
                assert_eq!(*cleaned, Some("incremental compilation is disabled"));
            }
            TaskExecution::Skipped { .. } => panic!("expected launch"),
        }
        assert!(!build_dir.join("out").join("stale.qm").exists());

        wait(execution).unwrap();
        assert!(invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn cleanup_even_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = dir.path().join("build");
        let mut task = CompileTask::new("main", &build_dir);
        task.output_dirs = vec![build_dir.join("out")];
        write(&build_dir.join("out").join("stale.qm"), "old");

        let (compiler, invoked, _) = RecordingCompiler::new();
        let execution = task
            .execute(&InputChanges::full_rebuild(), vec![], compiler)
            .unwrap();

        match execution {
            TaskExecution::Skipped { cleaned } => {
                assert_eq!(cleaned, Some("incremental compilation is disabled"));
            }
            TaskExecution::Launched { .. } => panic!("expected skip"),
        }
        assert!(!build_dir.join("out").join("stale.qm").exists());
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn skip_only_applies_to_non_incremental_runs() {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = dir.path().join("build");
        let mut task = CompileTask::new("main", &build_dir);
        task.incremental = true;

        // Incremental run, sources all deleted since last build.
        let mut changes = BTreeMap::new();
        changes.insert(
            "sources".to_string(),
            vec![FileChange {
                path: PathBuf::from("src/gone.q"),
                kind: ChangeKind::Removed,
            }],
        );
        let report = InputChanges::with_changes(changes);

        let (compiler, invoked, _) = RecordingCompiler::new();
        let execution = task.execute(&report, vec![], compiler).unwrap();
        wait(execution).unwrap();
        assert!(invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn non_incremental_run_classifies_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let task = task_with_source(&dir.path().join("build"), &dir.path().join("src"));

        let (compiler, _, seen) = RecordingCompiler::new();
        let execution = task
            .execute(&InputChanges::full_rebuild(), vec![], compiler)
            .unwrap();
        wait(execution).unwrap();

        assert_eq!(*seen.lock().unwrap(), Some(ChangedFiles::Unknown));
    }

    #[test]
    fn incremental_run_classifies_known_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut task = task_with_source(&dir.path().join("build"), &dir.path().join("src"));
        task.incremental = true;

        let mut changes = BTreeMap::new();
        changes.insert(
            "sources".to_string(),
            vec![FileChange {
                path: PathBuf::from("src/main.q"),
                kind: ChangeKind::Modified,
            }],
        );
        let report = InputChanges::with_changes(changes);

        let (compiler, _, seen) = RecordingCompiler::new();
        let execution = task.execute(&report, vec![], compiler).unwrap();
        wait(execution).unwrap();

        let observed = seen.lock().unwrap().clone().unwrap();
        match observed {
            ChangedFiles::Known { modified, removed } => {
                assert_eq!(modified, vec![PathBuf::from("src/main.q")]);
                assert!(removed.is_empty());
            }
            ChangedFiles::Unknown => panic!("expected Known classification"),
        }
    }

    #[test]
    fn incremental_failure_restores_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = dir.path().join("build");
        let mut task = task_with_source(&build_dir, &dir.path().join("src"));
        task.incremental = true;

        let artifact = build_dir.join("out").join("app.qm");
        write(&artifact, "compiled v1");

        let (mut compiler, _, _) = RecordingCompiler::new();
        compiler.fail = true;
        // Wrap to mangle the output before failing.
        struct Mangling {
            inner: RecordingCompiler,
            artifact: PathBuf,
        }
        impl Compiler for Mangling {
            fn compile(&self, job: &CompileJob) -> Result<(), BuildError> {
                std::fs::write(&self.artifact, "half-written").unwrap();
                self.inner.compile(job)
            }
        }

        let report = InputChanges::with_changes(BTreeMap::new());
        let execution = task
            .execute(&report, vec![], Mangling { inner: compiler, artifact: artifact.clone() })
            .unwrap();

        assert!(wait(execution).is_err());
        assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "compiled v1");
        assert_eq!(
            task.metrics().event_count(BuildEvent::OutputsRestored),
            1
        );
    }

    #[test]
    fn no_backup_taken_for_full_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = dir.path().join("build");
        let task = task_with_source(&build_dir, &dir.path().join("src"));

        let (compiler, _, _) = RecordingCompiler::new();
        let execution = task
            .execute(&InputChanges::full_rebuild(), vec![], compiler)
            .unwrap();
        wait(execution).unwrap();

        assert!(!task.snapshot_dir.exists());
        assert_eq!(
            task.metrics().event_count(BuildEvent::IncrementalCompilation),
            0
        );
    }

    #[test]
    fn state_dirs_created_before_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let task = task_with_source(&dir.path().join("build"), &dir.path().join("src"));
        assert!(!task.cacheable_output_dir.exists());

        let (compiler, _, _) = RecordingCompiler::new();
        let execution = task
            .execute(&InputChanges::full_rebuild(), vec![], compiler)
            .unwrap();
        wait(execution).unwrap();

        assert!(task.cacheable_output_dir.is_dir());
        assert!(task.local_state_dir.is_dir());
    }

    #[test]
    fn artifact_paths_follow_layout() {
        let task = CompileTask::new("main", Path::new("build"));
        assert_eq!(
            task.build_history_file(),
            Path::new("build/quill/main/local-state/build-history.bin")
        );
        assert_eq!(
            task.abi_snapshot_file(),
            Path::new("build/quill/main/cacheable/abi-snapshot.bin")
        );
        assert_eq!(
            task.snapshot_dir,
            Path::new("build/snapshot/quill/main")
        );
    }
}
