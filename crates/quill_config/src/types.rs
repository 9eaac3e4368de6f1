//! Configuration types deserialized from `quill.toml`.

use quill_args::CompilerArguments;
use serde::Deserialize;

/// The top-level project configuration parsed from `quill.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version).
    pub project: ProjectMeta,
    /// Build settings (incrementality, directories, compiler binary).
    #[serde(default)]
    pub build: BuildConfig,
    /// Compiler argument overrides applied on top of the defaults.
    #[serde(default)]
    pub compiler: CompilerArguments,
}

/// Core project metadata required in every `quill.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name; doubles as the compiled module name unless
    /// `compiler.module_name` overrides it.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Build settings from the `[build]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Whether the build task should compile incrementally when possible.
    pub incremental: bool,
    /// Build directory, relative to the project root.
    pub build_dir: String,
    /// Source directory, relative to the project root.
    pub source_dir: String,
    /// Path of the `quillc` binary to invoke.
    pub compiler: String,
    /// Extra positional arguments appended to every invocation.
    pub extra_args: Vec<String>,
    /// Prefer short flag names on the compiler command line.
    pub short_flag_names: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            incremental: true,
            build_dir: "build".to_string(),
            source_dir: "src".to_string(),
            compiler: "quillc".to_string(),
            extra_args: Vec::new(),
            short_flag_names: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults() {
        let config = BuildConfig::default();
        assert!(config.incremental);
        assert_eq!(config.build_dir, "build");
        assert_eq!(config.source_dir, "src");
        assert_eq!(config.compiler, "quillc");
        assert!(config.extra_args.is_empty());
        assert!(!config.short_flag_names);
    }
}
