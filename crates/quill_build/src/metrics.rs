//! Thread-safe build metrics accumulation.
//!
//! The task body and the compilation worker run on different threads, so
//! timings and event counters accumulate behind locks. Reading happens once
//! at the end of the build when the CLI prints a summary.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A named phase whose wall-clock duration is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildTime {
    /// The synchronous body of the task action.
    TaskAction,
    /// Snapshotting outputs before an incremental build.
    BackupOutputs,
    /// Restoring outputs after a failed incremental build.
    RestoreOutputs,
    /// The compiler invocation itself, measured on the worker.
    CompilerExecution,
}

impl BuildTime {
    /// Human-readable label used in the metrics summary.
    pub fn label(self) -> &'static str {
        match self {
            BuildTime::TaskAction => "task action",
            BuildTime::BackupOutputs => "backup outputs",
            BuildTime::RestoreOutputs => "restore outputs",
            BuildTime::CompilerExecution => "compiler execution",
        }
    }
}

/// A counted boolean build event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildEvent {
    /// A compiler invocation was started.
    CompilationStarted,
    /// The execution ran incrementally.
    IncrementalCompilation,
    /// The execution fell back to a full rebuild.
    FallbackToFullCompilation,
    /// Outputs were rolled back after a failed invocation.
    OutputsRestored,
}

impl BuildEvent {
    /// Human-readable label used in the metrics summary.
    pub fn label(self) -> &'static str {
        match self {
            BuildEvent::CompilationStarted => "compilation started",
            BuildEvent::IncrementalCompilation => "incremental compilation",
            BuildEvent::FallbackToFullCompilation => "fallback to full compilation",
            BuildEvent::OutputsRestored => "outputs restored",
        }
    }
}

/// A thread-safe accumulator for build timings and event counters.
///
/// Multiple threads record concurrently; accessors return snapshots.
#[derive(Default)]
pub struct BuildMetrics {
    timings: Mutex<Vec<(BuildTime, Duration)>>,
    events: Mutex<BTreeMap<BuildEvent, usize>>,
}

impl BuildMetrics {
    /// Creates a new empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f`, recording its wall-clock duration under `time`.
    pub fn measure<T>(&self, time: BuildTime, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.add_time(time, start.elapsed());
        result
    }

    /// Records an explicit duration under `time`.
    pub fn add_time(&self, time: BuildTime, duration: Duration) {
        let mut timings = self.timings.lock().unwrap();
        timings.push((time, duration));
    }

    /// Counts one occurrence of `event`.
    pub fn report_event(&self, event: BuildEvent) {
        let mut events = self.events.lock().unwrap();
        *events.entry(event).or_insert(0) += 1;
    }

    /// Returns a snapshot of all recorded timings in recording order.
    pub fn timings(&self) -> Vec<(BuildTime, Duration)> {
        self.timings.lock().unwrap().clone()
    }

    /// Returns how many times `event` was reported.
    pub fn event_count(&self, event: BuildEvent) -> usize {
        self.events
            .lock()
            .unwrap()
            .get(&event)
            .copied()
            .unwrap_or(0)
    }

    /// Renders a one-line-per-entry summary for CLI output.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for (time, duration) in self.timings() {
            lines.push(format!("{}: {:.3}s", time.label(), duration.as_secs_f64()));
        }
        let events = self.events.lock().unwrap();
        for (event, count) in events.iter() {
            lines.push(format!("{}: {count}", event.label()));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_timing_and_returns_result() {
        let metrics = BuildMetrics::new();
        let value = metrics.measure(BuildTime::TaskAction, || 7);
        assert_eq!(value, 7);

        let timings = metrics.timings();
        assert_eq!(timings.len(), 1);
        assert_eq!(timings[0].0, BuildTime::TaskAction);
    }

    #[test]
    fn events_count_per_kind() {
        let metrics = BuildMetrics::new();
        metrics.report_event(BuildEvent::CompilationStarted);
        metrics.report_event(BuildEvent::CompilationStarted);
        metrics.report_event(BuildEvent::IncrementalCompilation);

        assert_eq!(metrics.event_count(BuildEvent::CompilationStarted), 2);
        assert_eq!(metrics.event_count(BuildEvent::IncrementalCompilation), 1);
        assert_eq!(metrics.event_count(BuildEvent::OutputsRestored), 0);
    }

    #[test]
    fn concurrent_recording() {
        use std::sync::Arc;

        let metrics = Arc::new(BuildMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    metrics.report_event(BuildEvent::CompilationStarted);
                    metrics.add_time(BuildTime::CompilerExecution, Duration::from_millis(1));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.event_count(BuildEvent::CompilationStarted), 4);
        assert_eq!(metrics.timings().len(), 4);
    }

    #[test]
    fn summary_mentions_labels() {
        let metrics = BuildMetrics::new();
        metrics.add_time(BuildTime::CompilerExecution, Duration::from_millis(250));
        metrics.report_event(BuildEvent::FallbackToFullCompilation);

        let summary = metrics.summary();
        assert!(summary.contains("compiler execution"));
        assert!(summary.contains("fallback to full compilation: 1"));
    }
}
