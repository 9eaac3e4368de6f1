//! The static option descriptor table.
//!
//! Every declared compiler option appears exactly once in [`DESCRIPTORS`],
//! in declaration order. The serializer iterates this table instead of
//! reflecting over struct fields, so the set of emitted options and their
//! formatting rules are fixed at compile time.

use crate::arguments::CompilerArguments;

/// A snapshot of one option's current value, read through its descriptor.
///
/// Carries enough shape information for the serializer to pick the right
/// emission rule, and supports equality so that default suppression is a
/// plain comparison against a default-constructed [`CompilerArguments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// A boolean flag.
    Bool(bool),
    /// A single optional value.
    Scalar(Option<String>),
    /// Zero or more values.
    List(Vec<String>),
}

/// Static metadata for one compiler option.
pub struct ArgumentDescriptor {
    /// Canonical long flag name, including the leading dash.
    pub name: &'static str,
    /// Optional short flag name, preferred when short names are requested.
    pub short_name: Option<&'static str>,
    /// Whether this is an advanced (`-X`) option, emitted as `name=value`.
    pub is_advanced: bool,
    /// Join delimiter for list options; `None` means one token per element.
    pub delimiter: Option<&'static str>,
    /// Reads the option's current value from an arguments instance.
    pub get: fn(&CompilerArguments) -> ArgumentValue,
}

/// All declared compiler options, in declaration order.
///
/// Order matters: the serializer emits option tokens in table order, and
/// that order is part of the command-line contract with `quillc`.
pub static DESCRIPTORS: &[ArgumentDescriptor] = &[
    ArgumentDescriptor {
        name: "-destination",
        short_name: Some("-d"),
        is_advanced: false,
        delimiter: None,
        get: |a| ArgumentValue::Scalar(a.destination.clone()),
    },
    ArgumentDescriptor {
        name: "-classpath",
        short_name: Some("-cp"),
        is_advanced: false,
        delimiter: Some(":"),
        get: |a| ArgumentValue::List(a.classpath.clone()),
    },
    ArgumentDescriptor {
        name: "-module-name",
        short_name: None,
        is_advanced: false,
        delimiter: None,
        get: |a| ArgumentValue::Scalar(a.module_name.clone()),
    },
    ArgumentDescriptor {
        name: "-language-version",
        short_name: None,
        is_advanced: false,
        delimiter: None,
        get: |a| ArgumentValue::Scalar(a.language_version.clone()),
    },
    ArgumentDescriptor {
        name: "-api-version",
        short_name: None,
        is_advanced: false,
        delimiter: None,
        get: |a| ArgumentValue::Scalar(a.api_version.clone()),
    },
    ArgumentDescriptor {
        name: "-verbose",
        short_name: None,
        is_advanced: false,
        delimiter: None,
        get: |a| ArgumentValue::Bool(a.verbose),
    },
    ArgumentDescriptor {
        name: "-no-stdlib",
        short_name: None,
        is_advanced: false,
        delimiter: None,
        get: |a| ArgumentValue::Bool(a.no_stdlib),
    },
    ArgumentDescriptor {
        name: "-Werror",
        short_name: None,
        is_advanced: false,
        delimiter: None,
        get: |a| ArgumentValue::Bool(a.warnings_as_errors),
    },
    ArgumentDescriptor {
        name: "-color",
        short_name: None,
        is_advanced: false,
        delimiter: None,
        get: |a| ArgumentValue::Bool(a.color_diagnostics),
    },
    ArgumentDescriptor {
        name: "-opt-in",
        short_name: None,
        is_advanced: false,
        delimiter: Some(","),
        get: |a| ArgumentValue::List(a.opt_in.clone()),
    },
    ArgumentDescriptor {
        name: "-Xreport-perf",
        short_name: None,
        is_advanced: true,
        delimiter: None,
        get: |a| ArgumentValue::Bool(a.x_report_perf),
    },
    ArgumentDescriptor {
        name: "-Xbackend-threads",
        short_name: None,
        is_advanced: true,
        delimiter: None,
        get: |a| ArgumentValue::Scalar(a.x_backend_threads.clone()),
    },
    ArgumentDescriptor {
        name: "-Xfriend-paths",
        short_name: None,
        is_advanced: true,
        delimiter: Some(","),
        get: |a| ArgumentValue::List(a.x_friend_paths.clone()),
    },
    ArgumentDescriptor {
        name: "-Xplugin",
        short_name: None,
        is_advanced: true,
        delimiter: None,
        get: |a| ArgumentValue::List(a.x_plugin.clone()),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for d in DESCRIPTORS {
            assert!(seen.insert(d.name), "duplicate descriptor name {}", d.name);
        }
    }

    #[test]
    fn advanced_options_use_x_prefix() {
        for d in DESCRIPTORS {
            if d.is_advanced {
                assert!(
                    d.name.starts_with("-X"),
                    "advanced option {} must use the -X prefix",
                    d.name
                );
            }
        }
    }

    #[test]
    fn short_names_are_shorter() {
        for d in DESCRIPTORS {
            if let Some(short) = d.short_name {
                assert!(short.len() < d.name.len());
                assert!(short.starts_with('-'));
            }
        }
    }

    #[test]
    fn getters_read_default_shapes() {
        let defaults = CompilerArguments::default();
        for d in DESCRIPTORS {
            match (d.get)(&defaults) {
                // `-color` is the one flag that defaults to on.
                ArgumentValue::Bool(v) => assert_eq!(v, d.name == "-color"),
                ArgumentValue::Scalar(v) => assert!(v.is_none(), "{} defaults to None", d.name),
                ArgumentValue::List(v) => assert!(v.is_empty(), "{} defaults to empty", d.name),
            }
        }
    }

    #[test]
    fn delimiters_only_on_lists() {
        let defaults = CompilerArguments::default();
        for d in DESCRIPTORS {
            if d.delimiter.is_some() {
                assert!(
                    matches!((d.get)(&defaults), ArgumentValue::List(_)),
                    "{} has a delimiter but is not a list option",
                    d.name
                );
            }
        }
    }
}
