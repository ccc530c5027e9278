//! Validated contract of one declaration

use serde::{Deserialize, Serialize};

use super::effect::{EffectClause, InvocationKind};
use crate::shared::models::{DeclId, Span, SymbolId, TypeRef};

/// Parameter as seen by the contract (resolved symbol + declared type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractParameter {
    pub symbol: SymbolId,
    pub name: String,
    pub ty: TypeRef,
}

/// Contract attached to a function or property accessor.
///
/// Built only by `ContractValidator`; every symbol in `clauses` is owned by
/// `owner`. Immutable once built and shared read-only between workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeclaration {
    pub owner: DeclId,
    pub owner_name: String,
    pub receiver: Option<SymbolId>,
    pub parameters: Vec<ContractParameter>,
    pub clauses: Vec<EffectClause>,
    pub span: Span,
}

impl ContractDeclaration {
    /// No accepted clauses; behaves like "no contract" at call sites
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// `callsInPlace` clauses
    pub fn calls_in_place(&self) -> impl Iterator<Item = (SymbolId, InvocationKind)> + '_ {
        self.clauses.iter().filter_map(|clause| match clause {
            EffectClause::CallsInPlace { parameter, kind } => Some((*parameter, *kind)),
            _ => None,
        })
    }

    /// `implies` clauses
    pub fn conditionals(&self) -> impl Iterator<Item = &EffectClause> + '_ {
        self.clauses
            .iter()
            .filter(|clause| matches!(clause, EffectClause::Conditional { .. }))
    }

    pub fn parameter(&self, symbol: SymbolId) -> Option<&ContractParameter> {
        self.parameters.iter().find(|p| p.symbol == symbol)
    }

    /// Every referenced symbol belongs to the owner
    pub fn is_self_contained(&self) -> bool {
        self.clauses
            .iter()
            .flat_map(EffectClause::references)
            .all(|symbol| symbol.is_owned_by(self.owner))
    }
}
