//! Shared foundational types used across the Quill toolchain.
//!
//! This crate provides content hashing for change detection and source
//! spans for tree nodes.

#![warn(missing_docs)]

pub mod hash;
pub mod span;

pub use hash::ContentHash;
pub use span::Span;
