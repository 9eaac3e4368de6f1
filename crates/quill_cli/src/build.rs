//! `quill build` — drive one incremental compilation of the project.
//!
//! Orchestrates the build lifecycle:
//! 1. Find the project root and load `quill.toml`
//! 2. Discover source files
//! 3. Scan tracked inputs against the persisted state
//! 4. Prepare the compiler command line
//! 5. Execute the compile task (backup, cleanup, launch)
//! 6. Wait on the completion handle and commit the new inputs state

use std::path::Path;

use quill_args::CompilerArguments;
use quill_build::{ProcessCompiler, TaskExecution};
use quill_config::ProjectConfig;

use crate::pipeline::{configure_task, destination_dir, discover_source_files, resolve_project_root};
use crate::{BuildArgs, GlobalArgs};

/// Runs the `quill build` command.
///
/// Returns exit code 0 on success, 1 on error.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = quill_config::load_config(&project_dir)?;

    if !global.quiet {
        eprintln!(
            "  Building {} v{}",
            config.project.name, config.project.version
        );
    }

    let source_dir = project_dir.join(&config.build.source_dir);
    let sources = if source_dir.is_dir() {
        discover_source_files(&source_dir)?
    } else {
        Vec::new()
    };
    if global.verbose {
        eprintln!("   Sources {} file(s)", sources.len());
    }

    let incremental = config.build.incremental && !args.no_incremental;
    let task = configure_task(&config, &project_dir, sources, incremental);
    let tracker = task.tracker(env!("CARGO_PKG_VERSION"));

    if args.rebuild {
        tracker.invalidate()?;
    }
    let collections = task.tracked_collections();
    let input_changes = tracker.scan(&collections);
    if global.verbose {
        let mode = if input_changes.incremental {
            "incremental"
        } else {
            "full"
        };
        eprintln!("      Scan {mode} build");
    }

    let arguments = prepare_arguments(&config, &project_dir, &task.sources.files);
    let tokens = arguments.to_argument_strings(config.build.short_flag_names);

    let compiler = ProcessCompiler::new(&config.build.compiler);
    let execution = task.execute(&input_changes, tokens, compiler)?;

    let exit_code = match execution {
        TaskExecution::Skipped { cleaned } => {
            report_cleanup(global, cleaned);
            if !global.quiet {
                eprintln!("   Skipped no source files found");
            }
            0
        }
        TaskExecution::Launched { handle, cleaned } => {
            report_cleanup(global, cleaned);
            // Compilation may still be running here; everything below the
            // wait depends on a finished compiler.
            match handle.wait() {
                Ok(()) => {
                    let collections = task.tracked_collections();
                    tracker.commit(&collections)?;
                    if !global.quiet {
                        eprintln!("  Finished {}", config.project.name);
                    }
                    0
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    1
                }
            }
        }
    };

    if global.verbose {
        eprintln!("{}", task.metrics().summary());
    }
    Ok(exit_code)
}

/// Prepares the full compiler arguments for one invocation.
///
/// Starts from the `[compiler]` overrides, fills in the destination and
/// module name defaults, and appends the source files and configured extra
/// arguments as free arguments.
fn prepare_arguments(
    config: &ProjectConfig,
    project_dir: &Path,
    sources: &[std::path::PathBuf],
) -> CompilerArguments {
    let mut arguments = config.compiler.clone();
    arguments.destination = Some(destination_dir(config, project_dir).display().to_string());
    if arguments.module_name.is_none() {
        arguments.module_name = Some(config.project.name.clone());
    }
    arguments
        .free_args
        .extend(sources.iter().map(|p| p.display().to_string()));
    arguments
        .free_args
        .extend(config.build.extra_args.iter().cloned());
    arguments
}

/// Prints the cleanup reason when verbose.
fn report_cleanup(global: &GlobalArgs, cleaned: Option<&'static str>) {
    if let Some(reason) = cleaned {
        if global.verbose {
            eprintln!("   Cleaned {reason}");
        }
    }
}
