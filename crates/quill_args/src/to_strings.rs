//! Serialization of [`CompilerArguments`] into command-line tokens.

use crate::arguments::CompilerArguments;
use crate::descriptor::{ArgumentDescriptor, ArgumentValue, DESCRIPTORS};

impl CompilerArguments {
    /// Converts these arguments into the token sequence `quillc` accepts.
    ///
    /// Options whose current value equals the default-constructed value are
    /// omitted entirely. The remaining options are emitted in descriptor
    /// declaration order, followed by the free arguments and the internal
    /// arguments verbatim, each group preserving its own relative order.
    ///
    /// When `use_short_names` is set, options that declare a short name are
    /// emitted under it instead of the canonical long name.
    pub fn to_argument_strings(&self, use_short_names: bool) -> Vec<String> {
        let defaults = CompilerArguments::default();
        let mut result = Vec::new();

        for descriptor in DESCRIPTORS {
            let value = (descriptor.get)(self);
            if value == (descriptor.get)(&defaults) {
                continue;
            }
            emit_option(&mut result, descriptor, value, use_short_names);
        }

        result.extend(self.free_args.iter().cloned());
        result.extend(
            self.internal_args
                .iter()
                .map(|arg| arg.string_representation.clone()),
        );
        result
    }
}

/// Emits the tokens for one option that differs from its default.
fn emit_option(
    result: &mut Vec<String>,
    descriptor: &ArgumentDescriptor,
    value: ArgumentValue,
    use_short_names: bool,
) {
    let name = if use_short_names {
        descriptor.short_name.unwrap_or(descriptor.name)
    } else {
        descriptor.name
    };

    match value {
        // A set flag is enabled by its bare name; an explicitly cleared
        // flag whose default is true must be spelled out.
        ArgumentValue::Bool(true) => result.push(name.to_string()),
        ArgumentValue::Bool(false) => result.push(format!("{name}=false")),

        ArgumentValue::Scalar(Some(v)) => emit_value(result, descriptor, name, v),
        // Reset to unset: nothing to pass.
        ArgumentValue::Scalar(None) => {}

        ArgumentValue::List(values) => {
            if values.is_empty() {
                return;
            }
            match descriptor.delimiter {
                Some(delimiter) => result.push(format!("{name}={}", values.join(delimiter))),
                None => {
                    for v in values {
                        emit_value(result, descriptor, name, v);
                    }
                }
            }
        }
    }
}

/// Emits one name/value pairing under the scalar rule.
///
/// Advanced options use `name=value`; ordinary options emit the name and the
/// value as two separate tokens.
fn emit_value(result: &mut Vec<String>, descriptor: &ArgumentDescriptor, name: &str, value: String) {
    if descriptor.is_advanced {
        result.push(format!("{name}={value}"));
    } else {
        result.push(name.to_string());
        result.push(value);
    }
}
