/*
 * Effect Evaluation
 *
 * Applies a callee's validated contract at a call site and returns one
 * FlowFact per outgoing edge (TRUE/FALSE branch, normal/abnormal return).
 *
 * Architecture:
 * - Domain: CallSite, UseContext, ArgumentBindings, CallSiteOutcome, lambda bodies
 * - Application: condition substitution, in-place lambda analysis, EffectEvaluator
 *
 * Refinements are expressed over the caller's variables: every callee
 * symbol is replaced by the stable argument bound to it.
 */

pub mod application;
pub mod domain;

pub use application::{EffectEvaluator, InPlaceAnalyzer, LambdaEffect};
pub use domain::{
    Argument, ArgumentBindings, AssignedValue, CallSite, CallSiteOutcome, LambdaBody, LambdaStmt,
    OutcomeEdge, UseContext,
};
