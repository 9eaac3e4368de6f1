//! Project configuration loading for the Quill toolchain.
//!
//! Parses and validates `quill.toml`, the per-project configuration file
//! declaring project metadata, build settings, and compiler argument
//! overrides.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{BuildConfig, ProjectConfig, ProjectMeta};
