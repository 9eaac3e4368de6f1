//! Compiler argument schema and command-line serialization.
//!
//! This crate declares every option accepted by the `quillc` compiler as a
//! plain struct ([`CompilerArguments`]) plus a statically declared descriptor
//! table ([`descriptor::DESCRIPTORS`]) mapping each option to its flag name,
//! optional short name, advanced marker, and list-join delimiter. The
//! serializer in [`to_strings`] turns a populated `CompilerArguments` into
//! the exact token sequence a process launcher hands to `quillc`, omitting
//! every option still at its default value.

#![warn(missing_docs)]

pub mod arguments;
pub mod descriptor;
pub mod to_strings;

pub use arguments::{CompilerArguments, InternalArgument};
pub use descriptor::{ArgumentDescriptor, ArgumentValue, DESCRIPTORS};
