//! Contract condition → caller-side flow fact
//!
//! A condition speaks about the callee's receiver/parameters. At a call site
//! each symbol is substituted by the caller variable bound to it; symbols
//! bound to unstable expressions contribute nothing.

use crate::features::contracts::Condition;
use crate::features::effect_evaluation::domain::{Argument, ArgumentBindings};
use crate::features::flow_facts::{FlowFact, Nullability, Refinement, TypeLattice};
use crate::shared::models::{DeclId, SymbolId, VarId};

/// Callee symbol → caller variable
pub struct Substitution<'b> {
    owner: DeclId,
    bindings: &'b ArgumentBindings,
}

impl<'b> Substitution<'b> {
    pub fn new(owner: DeclId, bindings: &'b ArgumentBindings) -> Self {
        Self { owner, bindings }
    }

    pub fn var_for(&self, symbol: SymbolId) -> Option<VarId> {
        debug_assert!(
            symbol.is_owned_by(self.owner),
            "contract of {} references foreign symbol {}",
            self.owner,
            symbol
        );
        match self.bindings.bound(symbol.slot)? {
            Argument::Stable(var) => Some(*var),
            Argument::Unstable | Argument::Lambda(_) => None,
        }
    }
}

/// Fact implied at the caller when `condition` evaluates to `holds`.
///
/// Disjunctions join the facts of their alternatives, so only knowledge
/// common to every alternative survives.
pub fn implied_fact(
    condition: &Condition,
    holds: bool,
    subst: &Substitution<'_>,
    lattice: &dyn TypeLattice,
) -> FlowFact {
    match condition {
        Condition::NullCheck { target, is_null } => {
            let nullability = if *is_null == holds {
                Nullability::Null
            } else {
                Nullability::NotNull
            };
            single(subst.var_for(*target), Refinement::of(nullability))
        }
        Condition::TypeCheck {
            target,
            ty,
            negated,
        } => {
            let is_instance = *negated != holds;
            let refinement = if is_instance {
                match ty.narrowing_name() {
                    Some(name) => Refinement::instance_of(name),
                    None if !ty.is_nullable() => Refinement::not_null(),
                    None => Refinement::unknown(),
                }
            } else if ty.is_nullable() {
                // `x !is T?` excludes null as well
                Refinement::not_null()
            } else {
                Refinement::unknown()
            };
            single(subst.var_for(*target), refinement)
        }
        // Boolean values are not tracked by flow facts
        Condition::BooleanValue { .. } => FlowFact::empty(),
        Condition::Not(inner) => implied_fact(inner, !holds, subst, lattice),
        Condition::And(lhs, rhs) | Condition::Or(lhs, rhs) => {
            let conjunctive = matches!(condition, Condition::And(..)) == holds;
            let left = implied_fact(lhs, holds, subst, lattice);
            let right = implied_fact(rhs, holds, subst, lattice);
            if conjunctive {
                left.refine(&right, lattice)
            } else {
                left.merge(&right, lattice)
            }
        }
    }
}

fn single(var: Option<VarId>, refinement: Refinement) -> FlowFact {
    match var {
        Some(var) => FlowFact::empty().with(var, refinement),
        None => FlowFact::empty(),
    }
}
