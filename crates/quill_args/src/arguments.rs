//! The typed compiler-arguments object.

use serde::{Deserialize, Serialize};

/// All options accepted by a single `quillc` invocation.
///
/// Each compilation invocation owns one instance. Fields default to the
/// compiler's own defaults, so the serializer can suppress any option the
/// caller never touched by comparing against [`CompilerArguments::default`].
/// Advanced (`-X`) options are internal or experimental surface and are
/// emitted with `name=value` syntax; see [`crate::descriptor::DESCRIPTORS`]
/// for the full emission rules per option.
///
/// The struct deserializes from the `[compiler]` table of `quill.toml`, so
/// every field has a serde default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerArguments {
    /// Output directory for compiled modules (`-d`).
    pub destination: Option<String>,

    /// Module search path entries (`-classpath`, joined with `:`).
    pub classpath: Vec<String>,

    /// Name of the module being compiled (`-module-name`).
    pub module_name: Option<String>,

    /// Source language version to accept (`-language-version`).
    pub language_version: Option<String>,

    /// Library API version to compile against (`-api-version`).
    pub api_version: Option<String>,

    /// Enable verbose compiler output (`-verbose`).
    pub verbose: bool,

    /// Do not implicitly include the standard library (`-no-stdlib`).
    pub no_stdlib: bool,

    /// Treat warnings as errors (`-Werror`).
    pub warnings_as_errors: bool,

    /// Colorize compiler diagnostics (`-color`). Defaults to on; passing
    /// `-color=false` disables it.
    pub color_diagnostics: bool,

    /// Annotation names whose opt-in requirement is satisfied
    /// (`-opt-in`, joined with `,`).
    pub opt_in: Vec<String>,

    /// Report detailed compiler performance metrics (`-Xreport-perf`).
    pub x_report_perf: bool,

    /// Number of backend codegen threads (`-Xbackend-threads`).
    pub x_backend_threads: Option<String>,

    /// Module paths granted friend (internal) visibility
    /// (`-Xfriend-paths`, joined with `,`).
    pub x_friend_paths: Vec<String>,

    /// Compiler plugin archives to load (`-Xplugin`, one token per entry).
    pub x_plugin: Vec<String>,

    /// Positional free arguments (source files and raw inputs), appended
    /// verbatim after all declared options.
    pub free_args: Vec<String>,

    /// Internal arguments already rendered to their literal token form,
    /// appended verbatim after the free arguments.
    pub internal_args: Vec<InternalArgument>,
}

impl Default for CompilerArguments {
    fn default() -> Self {
        Self {
            destination: None,
            classpath: Vec::new(),
            module_name: None,
            language_version: None,
            api_version: None,
            verbose: false,
            no_stdlib: false,
            warnings_as_errors: false,
            color_diagnostics: true,
            opt_in: Vec::new(),
            x_report_perf: false,
            x_backend_threads: None,
            x_friend_paths: Vec::new(),
            x_plugin: Vec::new(),
            free_args: Vec::new(),
            internal_args: Vec::new(),
        }
    }
}

/// An internal compiler argument carried in pre-rendered form.
///
/// Internal arguments are parsed and validated elsewhere; by the time they
/// reach the serializer they are opaque literal tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalArgument {
    /// The exact token to pass to the compiler.
    pub string_representation: String,
}

impl InternalArgument {
    /// Wraps a pre-rendered token as an internal argument.
    pub fn new(string_representation: impl Into<String>) -> Self {
        Self {
            string_representation: string_representation.into(),
        }
    }
}
