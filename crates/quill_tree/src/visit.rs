//! Traversal over contract-description nodes.
//!
//! Read-only traversal dispatches through [`ContractVisitor`]; rebuilding
//! traversal goes through [`ContractTransformer`], whose methods consume the
//! node and may return a different node kind (e.g. the resolution phase
//! replacing a raw description with a resolved one). Dispatch is a plain
//! `match` on the variant.

use crate::contract::{
    ContractDescription, LegacyRawContractDescription, RawContractDescription,
    ResolvedContractDescription,
};

/// Read-only traversal over a [`ContractDescription`].
///
/// One method per node kind; [`ContractDescription::accept`] dispatches to
/// the method matching the variant and returns its result.
pub trait ContractVisitor {
    /// Result type produced for each visited node.
    type Output;

    /// Visits an unresolved contract description.
    fn visit_raw(&mut self, node: &RawContractDescription) -> Self::Output;

    /// Visits a legacy annotation-based contract description.
    fn visit_legacy_raw(&mut self, node: &LegacyRawContractDescription) -> Self::Output;

    /// Visits a resolved contract description.
    fn visit_resolved(&mut self, node: &ResolvedContractDescription) -> Self::Output;
}

/// Rebuilding traversal over a [`ContractDescription`].
///
/// Each method consumes one node and returns its replacement. The default
/// implementations rebuild the node unchanged, so a transformer only
/// overrides the kinds it cares about.
pub trait ContractTransformer {
    /// Transforms an unresolved contract description.
    fn transform_raw(&mut self, node: RawContractDescription) -> ContractDescription {
        ContractDescription::Raw(node)
    }

    /// Transforms a legacy annotation-based contract description.
    fn transform_legacy_raw(&mut self, node: LegacyRawContractDescription) -> ContractDescription {
        ContractDescription::LegacyRaw(node)
    }

    /// Transforms a resolved contract description.
    fn transform_resolved(&mut self, node: ResolvedContractDescription) -> ContractDescription {
        ContractDescription::Resolved(node)
    }
}

impl ContractDescription {
    /// Dispatches to the visitor method matching this node's kind.
    pub fn accept<V: ContractVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            ContractDescription::Raw(node) => visitor.visit_raw(node),
            ContractDescription::LegacyRaw(node) => visitor.visit_legacy_raw(node),
            ContractDescription::Resolved(node) => visitor.visit_resolved(node),
        }
    }

    /// Consumes this node and returns its transformed replacement.
    pub fn transform<T: ContractTransformer>(self, transformer: &mut T) -> ContractDescription {
        match self {
            ContractDescription::Raw(node) => transformer.transform_raw(node),
            ContractDescription::LegacyRaw(node) => transformer.transform_legacy_raw(node),
            ContractDescription::Resolved(node) => transformer.transform_resolved(node),
        }
    }
}
