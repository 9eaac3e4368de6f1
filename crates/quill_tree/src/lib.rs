//! Contract-description tree nodes for the Quill front end.
//!
//! A contract description records the effect clauses a function declares
//! about its own behavior (`returns`, `calls-in-place`, conditional
//! effects). The front end produces one of three node kinds: a raw effect
//! list straight from the parser, a legacy form carried in an annotation
//! call, or a resolved form whose effects are bound to declarations.
//!
//! Nodes form a tagged variant ([`ContractDescription`]) traversed with
//! pattern matching: [`visit::ContractVisitor`] for read-only traversal and
//! [`visit::ContractTransformer`] for rebuild-or-replace traversal.

#![warn(missing_docs)]

pub mod contract;
pub mod visit;

pub use contract::{
    ContractDescription, EffectDeclaration, EffectKind, InvocationKind,
    LegacyRawContractDescription, RawContractDescription, ResolvedContractDescription,
};
pub use visit::{ContractTransformer, ContractVisitor};
