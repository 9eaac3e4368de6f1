//! Contract-description node types.
//!
//! Every node carries a [`Span`] for source location tracking. Nodes are
//! structurally immutable after creation; replacement happens only through
//! [`ContractDescription::transform`](crate::visit).

use quill_common::Span;
use serde::{Deserialize, Serialize};

/// A contract description attached to a function declaration.
///
/// One variant per node kind the front end produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractDescription {
    /// An unresolved effect list straight from the parser.
    Raw(RawContractDescription),
    /// A contract carried in a legacy annotation call.
    LegacyRaw(LegacyRawContractDescription),
    /// Effects bound to resolved declarations.
    Resolved(ResolvedContractDescription),
}

impl ContractDescription {
    /// Returns the source span of this description.
    pub fn span(&self) -> Span {
        match self {
            ContractDescription::Raw(node) => node.span,
            ContractDescription::LegacyRaw(node) => node.span,
            ContractDescription::Resolved(node) => node.span,
        }
    }
}

/// An unresolved contract description: effect clauses as parsed, before any
/// name or type resolution has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContractDescription {
    /// The effect clauses in declaration order.
    pub raw_effects: Vec<EffectDeclaration>,
    /// Source span of the whole `contract { ... }` block.
    pub span: Span,
}

/// A contract expressed through the legacy annotation syntax.
///
/// The annotation call is kept as its source text so diagnostics can quote
/// it; its effect clauses are extracted into the same raw form as
/// [`RawContractDescription`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRawContractDescription {
    /// Source text of the annotation call (e.g. `@Contract("...")`).
    pub contract_call: String,
    /// The effect clauses extracted from the annotation.
    pub raw_effects: Vec<EffectDeclaration>,
    /// Source span of the annotation call.
    pub span: Span,
}

/// A resolved contract description produced by the contract-resolution phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedContractDescription {
    /// Effects that resolved successfully.
    pub effects: Vec<EffectDeclaration>,
    /// Effects that failed resolution, kept for diagnostics.
    pub unresolved_effects: Vec<EffectDeclaration>,
    /// Source span of the originating contract block.
    pub span: Span,
}

/// One effect clause inside a contract description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDeclaration {
    /// What the clause asserts.
    pub kind: EffectKind,
    /// Source span of the clause.
    pub span: Span,
}

/// The assertion made by a single effect clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// The function returns normally when the contract condition holds.
    Returns {
        /// The literal the return value is asserted to equal, if any
        /// (e.g. `returns(true)`); `None` means plain `returns()`.
        value: Option<String>,
    },
    /// A function-typed parameter is invoked in place.
    CallsInPlace {
        /// Name of the parameter being invoked.
        parameter: String,
        /// How many times the parameter is invoked.
        invocation_kind: InvocationKind,
    },
    /// A condition implied by the function returning normally.
    Conditional {
        /// Source text of the implied condition.
        condition: String,
    },
}

/// How many times a `calls-in-place` parameter is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationKind {
    /// Invoked zero or one times.
    AtMostOnce,
    /// Invoked one or more times.
    AtLeastOnce,
    /// Invoked exactly once.
    ExactlyOnce,
    /// Invocation count unknown.
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_effect() -> EffectDeclaration {
        EffectDeclaration {
            kind: EffectKind::CallsInPlace {
                parameter: "block".to_string(),
                invocation_kind: InvocationKind::ExactlyOnce,
            },
            span: Span::new(10, 42),
        }
    }

    #[test]
    fn span_accessor_matches_variant() {
        let raw = ContractDescription::Raw(RawContractDescription {
            raw_effects: vec![sample_effect()],
            span: Span::new(0, 50),
        });
        assert_eq!(raw.span(), Span::new(0, 50));

        let resolved = ContractDescription::Resolved(ResolvedContractDescription {
            effects: vec![],
            unresolved_effects: vec![],
            span: Span::new(5, 9),
        });
        assert_eq!(resolved.span(), Span::new(5, 9));
    }

    #[test]
    fn serde_roundtrip() {
        let node = ContractDescription::LegacyRaw(LegacyRawContractDescription {
            contract_call: "@Contract(\"returns(true)\")".to_string(),
            raw_effects: vec![EffectDeclaration {
                kind: EffectKind::Returns {
                    value: Some("true".to_string()),
                },
                span: Span::new(1, 2),
            }],
            span: Span::new(0, 30),
        });
        let json = serde_json::to_string(&node).unwrap();
        let back: ContractDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
