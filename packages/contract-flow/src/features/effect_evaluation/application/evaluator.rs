//! Effect evaluator
//!
//! Applies a validated contract at one call site and produces the flow
//! fact of every outgoing edge. Pure function of its inputs: no state is
//! kept between calls, so the same inputs always give the same outcome.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::condition::{implied_fact, Substitution};
use super::in_place::InPlaceAnalyzer;
use crate::config::EvaluationConfig;
use crate::features::cancellation::{CancellableResult, Checkpoint};
use crate::features::contracts::{BaseEffect, ContractDeclaration, EffectClause, ReturnsValue};
use crate::features::effect_evaluation::domain::{
    Argument, ArgumentBindings, CallSite, CallSiteOutcome, OutcomeEdge, UseContext,
};
use crate::features::flow_facts::{FlowFact, Nullability, TypeLattice};

/// What the caller learns about the result on one branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observed {
    True,
    False,
    Null,
    NotNull,
}

impl Observed {
    /// Does a conditional with this base effect fire when the result is observed as `self`?
    fn triggers(self, effect: &BaseEffect) -> bool {
        match effect {
            BaseEffect::Returns(ReturnsValue::Wildcard) => true,
            BaseEffect::Returns(ReturnsValue::True) => self == Observed::True,
            BaseEffect::Returns(ReturnsValue::False) => self == Observed::False,
            BaseEffect::Returns(ReturnsValue::Null) => self == Observed::Null,
            // a Boolean observed true/false is in particular non-null
            BaseEffect::ReturnsNotNull => self != Observed::Null,
        }
    }

    fn contradicts(self, result: Nullability) -> bool {
        match self {
            Observed::Null => result == Nullability::NotNull,
            Observed::True | Observed::False | Observed::NotNull => result == Nullability::Null,
        }
    }
}

/// (true branch, false branch) observations for a branching use context
fn observations(context: UseContext) -> Option<(Observed, Observed)> {
    match context {
        UseContext::Condition { negated: false } => Some((Observed::True, Observed::False)),
        UseContext::Condition { negated: true } => Some((Observed::False, Observed::True)),
        UseContext::NullComparison { equals_null: true } => Some((Observed::Null, Observed::NotNull)),
        UseContext::NullComparison { equals_null: false } => {
            Some((Observed::NotNull, Observed::Null))
        }
        UseContext::Stored | UseContext::Discarded => None,
    }
}

/// Later result clauses only narrow. A clash can only reach here when
/// contradiction checks were disabled at validation; the earlier clause stands.
fn narrow_result(current: Nullability, clause: Nullability) -> Nullability {
    match current.meet(clause) {
        Some(narrowed) => narrowed,
        None => {
            debug!(?current, ?clause, "conflicting result clause ignored");
            current
        }
    }
}

pub struct EffectEvaluator<'a> {
    checkpoint: &'a Checkpoint,
    lattice: &'a dyn TypeLattice,
    config: &'a EvaluationConfig,
}

impl<'a> EffectEvaluator<'a> {
    pub fn new(
        checkpoint: &'a Checkpoint,
        lattice: &'a dyn TypeLattice,
        config: &'a EvaluationConfig,
    ) -> Self {
        Self {
            checkpoint,
            lattice,
            config,
        }
    }

    /// Outcome of `call` given the callee's contract (if any).
    ///
    /// Absent or empty contracts pass `pre` through unchanged.
    pub fn apply(
        &self,
        call: &CallSite,
        contract: Option<&ContractDeclaration>,
        bindings: &ArgumentBindings,
        pre: &FlowFact,
    ) -> CancellableResult<CallSiteOutcome> {
        self.checkpoint.poll()?;

        let contract = match contract {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(CallSiteOutcome::passthrough(pre, call.use_context)),
        };
        debug_assert_eq!(contract.owner, call.callee);

        let subst = Substitution::new(contract.owner, bindings);
        let mut normal = pre.clone();
        let mut abnormal = pre.clone();
        let mut definitely_assigned = BTreeSet::new();
        let mut result_nullability = Nullability::Unknown;

        // Clauses apply in declared order; lambdas run against the fact
        // left by the clauses before them.
        for clause in &contract.clauses {
            match clause {
                EffectClause::CallsInPlace { parameter, kind } => {
                    let Some(Argument::Lambda(body)) = bindings.bound(parameter.slot) else {
                        continue;
                    };
                    if self.config.analyze_in_place_lambdas {
                        let effect = InPlaceAnalyzer::new(
                            self.checkpoint,
                            self.lattice,
                            self.config.max_fixpoint_iterations,
                        )
                        .invoke(body, *kind, &normal)?;
                        abnormal = abnormal.merge(&effect.interrupted, self.lattice);
                        normal = effect.normal;
                        definitely_assigned.extend(effect.definitely_assigned);
                    } else {
                        for var in body.assigned_variables() {
                            normal.forget(var);
                            abnormal.forget(var);
                        }
                    }
                }
                EffectClause::ReturnsNotNull => {
                    result_nullability = narrow_result(result_nullability, Nullability::NotNull);
                }
                EffectClause::Returns(ReturnsValue::Null) => {
                    result_nullability = narrow_result(result_nullability, Nullability::Null);
                }
                EffectClause::Conditional {
                    effect: BaseEffect::Returns(ReturnsValue::Wildcard),
                    condition,
                } => {
                    let implied = implied_fact(condition, true, &subst, self.lattice);
                    normal = normal.refine(&implied, self.lattice);
                }
                EffectClause::Returns(_) | EffectClause::Conditional { .. } => {}
            }
        }

        let mut edges = BTreeMap::new();
        if let Some((on_true, on_false)) = observations(call.use_context) {
            edges.insert(
                OutcomeEdge::TrueBranch,
                self.branch_fact(contract, &subst, &normal, on_true, result_nullability),
            );
            edges.insert(
                OutcomeEdge::FalseBranch,
                self.branch_fact(contract, &subst, &normal, on_false, result_nullability),
            );
        }
        edges.insert(OutcomeEdge::NormalReturn, normal);
        edges.insert(OutcomeEdge::AbnormalReturn, abnormal);

        let outcome = CallSiteOutcome {
            edges,
            definitely_assigned,
            result_nullability,
        };
        debug!(
            callee = %call.callee,
            clauses = contract.len(),
            edges = outcome.edges.len(),
            assigned = outcome.definitely_assigned.len(),
            "contract applied at call site"
        );
        Ok(outcome)
    }

    fn branch_fact(
        &self,
        contract: &ContractDeclaration,
        subst: &Substitution<'_>,
        normal: &FlowFact,
        observed: Observed,
        result: Nullability,
    ) -> FlowFact {
        if observed.contradicts(result) {
            return FlowFact::unreachable();
        }
        let mut fact = normal.clone();
        for clause in &contract.clauses {
            if let EffectClause::Conditional { effect, condition } = clause {
                if matches!(effect, BaseEffect::Returns(ReturnsValue::Wildcard)) {
                    continue;
                }
                if observed.triggers(effect) {
                    let implied = implied_fact(condition, true, subst, self.lattice);
                    fact = fact.refine(&implied, self.lattice);
                }
            }
        }
        fact
    }
}
