//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Loads and validates a `quill.toml` configuration from a project directory.
///
/// Reads `<project_dir>/quill.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("quill.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `quill.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and non-empty.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.version.is_empty() {
        return Err(ConfigError::MissingField("project.version".to_string()));
    }
    if config.build.compiler.is_empty() {
        return Err(ConfigError::MissingField("build.compiler".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "app"
version = "0.1.0"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "app");
        assert_eq!(config.project.version, "0.1.0");
        assert!(config.build.incremental);
        assert_eq!(config.build.compiler, "quillc");
        assert_eq!(config.compiler, Default::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "app"
version = "0.1.0"
description = "An application"

[build]
incremental = false
build_dir = "target"
source_dir = "source"
compiler = "/opt/quill/bin/quillc"
extra_args = ["-extra"]
short_flag_names = true

[compiler]
destination = "target/classes"
classpath = ["lib/core.qm"]
verbose = true
x_backend_threads = "4"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(!config.build.incremental);
        assert_eq!(config.build.build_dir, "target");
        assert_eq!(config.build.source_dir, "source");
        assert_eq!(config.build.compiler, "/opt/quill/bin/quillc");
        assert_eq!(config.build.extra_args, vec!["-extra"]);
        assert!(config.build.short_flag_names);
        assert_eq!(config.compiler.destination.as_deref(), Some("target/classes"));
        assert_eq!(config.compiler.classpath, vec!["lib/core.qm"]);
        assert!(config.compiler.verbose);
        assert_eq!(config.compiler.x_backend_threads.as_deref(), Some("4"));
    }

    #[test]
    fn missing_name_errors() {
        let toml = r#"
[project]
name = ""
version = "0.1.0"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn missing_version_errors() {
        let toml = r#"
[project]
name = "app"
version = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn empty_compiler_path_errors() {
        let toml = r#"
[project]
name = "app"
version = "0.1.0"

[build]
compiler = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let toml = "this is not valid toml {{{}}}";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_compiler_option_errors() {
        let toml = r#"
[project]
name = "app"
version = "0.1.0"

[compiler]
not_an_option = true
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
