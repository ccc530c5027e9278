//! Cross-clause checks
//!
//! Runs after every clause has been classified on its own. Clauses are
//! compared against the clauses already kept, in declaration order, so the
//! later clause of a clashing pair is the one dropped.

use crate::features::contracts::domain::{Condition, EffectClause, ReturnsValue};
use crate::shared::models::{SymbolId, TypeRef};

/// Why a clause cannot be kept next to an earlier one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// Same clause as the kept clause at this position
    Duplicate { earlier: usize },
    /// Cannot hold together with the kept clause at this position
    Contradiction { earlier: usize },
}

/// Definite fact asserted by a conjunctive condition
#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    Null(SymbolId),
    NotNull(SymbolId),
    Instance(SymbolId, TypeRef),
    NotInstance(SymbolId, TypeRef),
    Bool(SymbolId, bool),
}

impl Atom {
    fn clashes(&self, other: &Atom) -> bool {
        use Atom::*;
        match (self, other) {
            (Null(a), NotNull(b)) | (NotNull(a), Null(b)) => a == b,
            (Instance(a, ty), Null(b)) | (Null(b), Instance(a, ty)) => {
                a == b && !ty.is_nullable()
            }
            (Instance(a, t), NotInstance(b, u)) | (NotInstance(b, u), Instance(a, t)) => {
                a == b && t == u
            }
            (Bool(a, x), Bool(b, y)) => a == b && x != y,
            _ => false,
        }
    }
}

/// Atoms that hold whenever `condition` holds (disjunctions contribute none)
fn definite_atoms(condition: &Condition, holds: bool, out: &mut Vec<Atom>) {
    match (condition, holds) {
        (Condition::NullCheck { target, is_null }, _) => {
            if *is_null == holds {
                out.push(Atom::Null(*target));
            } else {
                out.push(Atom::NotNull(*target));
            }
        }
        (
            Condition::TypeCheck {
                target,
                ty,
                negated,
            },
            _,
        ) => {
            if *negated != holds {
                out.push(Atom::Instance(*target, ty.clone()));
            } else {
                out.push(Atom::NotInstance(*target, ty.clone()));
            }
        }
        (Condition::BooleanValue { target }, _) => out.push(Atom::Bool(*target, holds)),
        (Condition::Not(inner), _) => definite_atoms(inner, !holds, out),
        (Condition::And(lhs, rhs), true) | (Condition::Or(lhs, rhs), false) => {
            definite_atoms(lhs, holds, out);
            definite_atoms(rhs, holds, out);
        }
        (Condition::And(..), false) | (Condition::Or(..), true) => {}
    }
}

fn contradicts(a: &EffectClause, b: &EffectClause) -> bool {
    match (a, b) {
        (
            EffectClause::CallsInPlace {
                parameter: p,
                kind: k,
            },
            EffectClause::CallsInPlace {
                parameter: q,
                kind: l,
            },
        ) => p == q && k != l,
        (
            EffectClause::Conditional {
                effect: e1,
                condition: c1,
            },
            EffectClause::Conditional {
                effect: e2,
                condition: c2,
            },
        ) => {
            if !e1.overlaps(e2) {
                return false;
            }
            let mut left = Vec::new();
            let mut right = Vec::new();
            definite_atoms(c1, true, &mut left);
            definite_atoms(c2, true, &mut right);
            left.iter().any(|x| right.iter().any(|y| x.clashes(y)))
        }
        (EffectClause::ReturnsNotNull, EffectClause::Returns(ReturnsValue::Null))
        | (EffectClause::Returns(ReturnsValue::Null), EffectClause::ReturnsNotNull) => true,
        _ => false,
    }
}

/// Conflict of `candidate` with the clauses kept so far
pub fn find_conflict(
    kept: &[EffectClause],
    candidate: &EffectClause,
    detect_contradictions: bool,
) -> Option<Conflict> {
    if let Some(earlier) = kept.iter().position(|k| k == candidate) {
        return Some(Conflict::Duplicate { earlier });
    }
    if !detect_contradictions {
        return None;
    }
    kept.iter()
        .position(|k| contradicts(k, candidate))
        .map(|earlier| Conflict::Contradiction { earlier })
}
