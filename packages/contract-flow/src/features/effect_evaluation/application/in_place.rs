//! In-place lambda analysis
//!
//! Runs a `callsInPlace` lambda body against the caller's flow fact.
//!
//! ```text
//! EXACTLY_ONCE   normal = run(pre)
//! AT_LEAST_ONCE  normal = fix(s -> s ⊔ run(s)) from run(pre)
//! AT_MOST_ONCE   normal = pre ⊔ run(pre)
//! UNKNOWN        normal = fix(s -> s ⊔ run(s)) from pre
//! ```
//!
//! Definite assignment falls out of the state join (set intersection): any
//! kind that may skip the lambda joins with `pre`, whose assigned set is empty.

use std::collections::BTreeSet;

use tracing::trace;

use crate::features::cancellation::{CancellableResult, Checkpoint};
use crate::features::contracts::InvocationKind;
use crate::features::effect_evaluation::domain::{LambdaBody, LambdaStmt};
use crate::features::flow_facts::{FlowFact, TypeLattice};
use crate::shared::models::VarId;

/// Flow fact + variables definitely assigned on every path reaching it
#[derive(Debug, Clone, PartialEq, Eq)]
struct LambdaState {
    fact: FlowFact,
    assigned: BTreeSet<VarId>,
}

impl LambdaState {
    fn entry(fact: FlowFact) -> Self {
        Self {
            fact,
            assigned: BTreeSet::new(),
        }
    }

    fn unreachable() -> Self {
        Self::entry(FlowFact::unreachable())
    }

    fn is_reachable(&self) -> bool {
        self.fact.is_reachable()
    }

    fn join(&self, other: &LambdaState, lattice: &dyn TypeLattice) -> LambdaState {
        if !self.is_reachable() {
            return other.clone();
        }
        if !other.is_reachable() {
            return self.clone();
        }
        LambdaState {
            fact: self.fact.merge(&other.fact, lattice),
            assigned: self.assigned.intersection(&other.assigned).copied().collect(),
        }
    }
}

/// How a block can be left
struct BlockExit {
    fallthrough: LambdaState,
    returned: LambdaState,
}

/// Result of analysing one lambda at one call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaEffect {
    /// Fact once the call returns normally
    pub normal: FlowFact,
    /// Every lambda state an exception could escape from
    pub interrupted: FlowFact,
    pub definitely_assigned: BTreeSet<VarId>,
}

pub struct InPlaceAnalyzer<'a> {
    checkpoint: &'a Checkpoint,
    lattice: &'a dyn TypeLattice,
    max_iterations: u32,
    /// Join of every state seen so far (the abnormal-exit candidates)
    interrupted: FlowFact,
    widen_vars: BTreeSet<VarId>,
}

impl<'a> InPlaceAnalyzer<'a> {
    pub fn new(checkpoint: &'a Checkpoint, lattice: &'a dyn TypeLattice, max_iterations: u32) -> Self {
        Self {
            checkpoint,
            lattice,
            max_iterations: max_iterations.max(1),
            interrupted: FlowFact::unreachable(),
            widen_vars: BTreeSet::new(),
        }
    }

    /// Analyse `body` invoked with `kind` semantics, entered with `pre`
    pub fn invoke(
        mut self,
        body: &LambdaBody,
        kind: InvocationKind,
        pre: &FlowFact,
    ) -> CancellableResult<LambdaEffect> {
        self.widen_vars = body.assigned_variables();
        let entry = LambdaState::entry(pre.clone());

        let exit = match kind {
            InvocationKind::ExactlyOnce => self.run_once(&body.stmts, entry)?,
            InvocationKind::AtLeastOnce => {
                let first = self.run_once(&body.stmts, entry)?;
                self.fixpoint(&body.stmts, first)?
            }
            InvocationKind::AtMostOnce => {
                let once = self.run_once(&body.stmts, entry.clone())?;
                entry.join(&once, self.lattice)
            }
            InvocationKind::Unknown => self.fixpoint(&body.stmts, entry)?,
        };

        trace!(
            kind = %kind,
            reachable = exit.is_reachable(),
            assigned = exit.assigned.len(),
            "in-place lambda analysed"
        );

        let definitely_assigned = if exit.is_reachable() {
            exit.assigned
        } else {
            BTreeSet::new()
        };
        Ok(LambdaEffect {
            normal: exit.fact,
            interrupted: self.interrupted,
            definitely_assigned,
        })
    }

    /// One execution of the body: fallthrough ⊔ explicit returns
    fn run_once(&mut self, stmts: &[LambdaStmt], entry: LambdaState) -> CancellableResult<LambdaState> {
        self.checkpoint.poll()?;
        let exit = self.run_block(stmts, entry)?;
        Ok(exit.fallthrough.join(&exit.returned, self.lattice))
    }

    /// Least `s ⊒ start` with `s = s ⊔ run(s)`
    fn fixpoint(&mut self, stmts: &[LambdaStmt], start: LambdaState) -> CancellableResult<LambdaState> {
        let mut head = start;
        for _ in 0..self.max_iterations {
            let next = self.run_once(stmts, head.clone())?;
            let joined = head.join(&next, self.lattice);
            if joined == head {
                return Ok(head);
            }
            head = joined;
        }
        trace!(limit = self.max_iterations, "lambda fixpoint widened");
        Ok(self.widen(head))
    }

    fn widen(&self, mut state: LambdaState) -> LambdaState {
        for var in &self.widen_vars {
            state.fact.forget(*var);
        }
        state
    }

    fn observe(&mut self, state: &LambdaState) {
        self.interrupted = self.interrupted.merge(&state.fact, self.lattice);
    }

    fn run_block(&mut self, stmts: &[LambdaStmt], entry: LambdaState) -> CancellableResult<BlockExit> {
        let mut state = entry;
        let mut returned = LambdaState::unreachable();
        self.observe(&state);

        for stmt in stmts {
            if !state.is_reachable() {
                break;
            }
            match stmt {
                LambdaStmt::Assign { target, value } => {
                    let refinement = value.refinement_in(&state.fact);
                    state.fact.assign(*target, refinement);
                    state.assigned.insert(*target);
                }
                LambdaStmt::Branch {
                    then_branch,
                    else_branch,
                } => {
                    let then_exit = self.run_block(then_branch, state.clone())?;
                    let else_exit = self.run_block(else_branch, state)?;
                    returned = returned
                        .join(&then_exit.returned, self.lattice)
                        .join(&else_exit.returned, self.lattice);
                    state = then_exit.fallthrough.join(&else_exit.fallthrough, self.lattice);
                }
                LambdaStmt::Loop { body } => {
                    let mut head = state.clone();
                    let mut converged = false;
                    for _ in 0..self.max_iterations {
                        self.checkpoint.poll()?;
                        let iteration = self.run_block(body, head.clone())?;
                        returned = returned.join(&iteration.returned, self.lattice);
                        let joined = head.join(&iteration.fallthrough, self.lattice);
                        if joined == head {
                            converged = true;
                            break;
                        }
                        head = joined;
                    }
                    state = if converged { head } else { self.widen(head) };
                }
                LambdaStmt::Return => {
                    returned = returned.join(&state, self.lattice);
                    state = LambdaState::unreachable();
                }
                LambdaStmt::Throw => {
                    state = LambdaState::unreachable();
                }
            }
            self.observe(&state);
        }

        Ok(BlockExit {
            fallthrough: state,
            returned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::effect_evaluation::domain::AssignedValue;
    use crate::features::flow_facts::{FlatTypeLattice, Nullability, Refinement};

    const X: VarId = VarId(1);
    const Y: VarId = VarId(2);

    fn analyse(body: &LambdaBody, kind: InvocationKind, pre: &FlowFact) -> LambdaEffect {
        let checkpoint = Checkpoint::never();
        InPlaceAnalyzer::new(&checkpoint, &FlatTypeLattice, 16)
            .invoke(body, kind, pre)
            .unwrap()
    }

    fn assign_x_not_null() -> LambdaBody {
        LambdaBody::new(vec![LambdaStmt::assign(X, AssignedValue::NotNull)])
    }

    #[test]
    fn test_exactly_once_assigns_definitely() {
        let effect = analyse(&assign_x_not_null(), InvocationKind::ExactlyOnce, &FlowFact::empty());
        assert!(effect.definitely_assigned.contains(&X));
        assert_eq!(effect.normal.nullability(X), Nullability::NotNull);
    }

    #[test]
    fn test_at_least_once_assigns_definitely() {
        let effect = analyse(&assign_x_not_null(), InvocationKind::AtLeastOnce, &FlowFact::empty());
        assert!(effect.definitely_assigned.contains(&X));
        assert_eq!(effect.normal.nullability(X), Nullability::NotNull);
    }

    #[test]
    fn test_at_most_once_and_unknown_do_not_assign() {
        let pre = FlowFact::empty().with(X, Refinement::null());
        for kind in [InvocationKind::AtMostOnce, InvocationKind::Unknown] {
            let effect = analyse(&assign_x_not_null(), kind, &pre);
            assert!(effect.definitely_assigned.is_empty(), "{:?}", kind);
            assert_eq!(effect.normal.nullability(X), Nullability::Unknown, "{:?}", kind);
        }
    }

    #[test]
    fn test_branch_assigns_only_common_variables() {
        let body = LambdaBody::new(vec![LambdaStmt::branch(
            vec![
                LambdaStmt::assign(X, AssignedValue::NotNull),
                LambdaStmt::assign(Y, AssignedValue::NotNull),
            ],
            vec![LambdaStmt::assign(X, AssignedValue::Null)],
        )]);
        let effect = analyse(&body, InvocationKind::ExactlyOnce, &FlowFact::empty());
        assert_eq!(effect.definitely_assigned.into_iter().collect::<Vec<_>>(), vec![X]);
        assert_eq!(effect.normal.nullability(X), Nullability::Unknown);
    }

    #[test]
    fn test_throwing_lambda_makes_normal_unreachable() {
        let body = LambdaBody::new(vec![
            LambdaStmt::assign(X, AssignedValue::NotNull),
            LambdaStmt::Throw,
        ]);
        let effect = analyse(&body, InvocationKind::ExactlyOnce, &FlowFact::empty());
        assert!(!effect.normal.is_reachable());
        assert!(effect.definitely_assigned.is_empty());
        assert!(effect.interrupted.is_reachable());

        let maybe = analyse(&body, InvocationKind::AtMostOnce, &FlowFact::empty());
        assert!(maybe.normal.is_reachable());
    }

    #[test]
    fn test_early_return_joins_with_fallthrough() {
        let body = LambdaBody::new(vec![
            LambdaStmt::assign(X, AssignedValue::Null),
            LambdaStmt::branch(vec![LambdaStmt::Return], vec![]),
            LambdaStmt::assign(X, AssignedValue::NotNull),
        ]);
        let effect = analyse(&body, InvocationKind::ExactlyOnce, &FlowFact::empty());
        assert_eq!(effect.normal.nullability(X), Nullability::Unknown);
        assert!(effect.definitely_assigned.contains(&X));
    }

    #[test]
    fn test_copy_through_loop_reaches_fixpoint() {
        let body = LambdaBody::new(vec![LambdaStmt::repeat(vec![
            LambdaStmt::assign(Y, AssignedValue::CopyOf(X)),
            LambdaStmt::assign(X, AssignedValue::Null),
        ])]);
        let pre = FlowFact::empty().with(X, Refinement::not_null());
        let effect = analyse(&body, InvocationKind::ExactlyOnce, &pre);
        assert_eq!(effect.normal.nullability(X), Nullability::Unknown);
        // loop may not run: Y is not definitely assigned
        assert!(!effect.definitely_assigned.contains(&Y));
    }

    #[test]
    fn test_interrupted_includes_pre_state() {
        let pre = FlowFact::empty().with(X, Refinement::null());
        let effect = analyse(&assign_x_not_null(), InvocationKind::ExactlyOnce, &pre);
        assert_eq!(effect.interrupted.nullability(X), Nullability::Unknown);
    }
}
