//! Shared helpers for CLI commands.
//!
//! Project-root resolution, source discovery, and the construction of the
//! compile task from a loaded configuration.

use std::path::{Path, PathBuf};

use quill_build::{CompileTask, FileCollection};
use quill_config::ProjectConfig;

use crate::GlobalArgs;

/// File extension of Quill source files.
const SOURCE_EXT: &str = "q";

/// Walks up from `start` looking for the nearest directory containing `quill.toml`.
///
/// Returns the directory containing `quill.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("quill.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find quill.toml in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `quill.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Discovers Quill source files under the given directory (recursive).
///
/// Returns paths sorted for deterministic ordering.
pub fn discover_source_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXT) {
            out.push(path);
        }
    }
    Ok(())
}

/// Builds the compile task for a project from its configuration.
///
/// The task compiles the project's sources into `<build_dir>/out` and
/// tracks the classpath entries as its library inputs.
pub fn configure_task(
    config: &ProjectConfig,
    project_dir: &Path,
    sources: Vec<PathBuf>,
    incremental: bool,
) -> CompileTask {
    let build_dir = project_dir.join(&config.build.build_dir);
    let mut task = CompileTask::new(&config.project.name, &build_dir);
    task.incremental = incremental;
    task.output_dirs = vec![destination_dir(config, project_dir)];
    task.sources = FileCollection::new("sources", sources);
    task.libraries = FileCollection::new(
        "libraries",
        config
            .compiler
            .classpath
            .iter()
            .map(|entry| project_dir.join(entry))
            .collect(),
    );
    task
}

/// The compiler destination directory: the configured one, or the default
/// `<build_dir>/out`.
pub fn destination_dir(config: &ProjectConfig, project_dir: &Path) -> PathBuf {
    match &config.compiler.destination {
        Some(destination) => project_dir.join(destination),
        None => project_dir.join(&config.build.build_dir).join("out"),
    }
}
