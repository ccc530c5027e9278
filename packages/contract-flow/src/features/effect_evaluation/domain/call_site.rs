//! Call site model and outcome edges

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::lambda::LambdaBody;
use crate::features::flow_facts::{FlowFact, Nullability};
use crate::shared::models::{DeclId, Span, SymbolSlot, VarId};

/// How the caller consumes the call's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseContext {
    /// `if (f(x))` / `if (!f(x))`
    Condition { negated: bool },
    /// `if (f(x) == null)` (equals_null) / `if (f(x) != null)`
    NullComparison { equals_null: bool },
    /// `val r = f(x)`
    Stored,
    /// `f(x)` as a statement
    Discarded,
}

impl UseContext {
    /// The caller branches on the result
    pub fn branches(&self) -> bool {
        matches!(
            self,
            UseContext::Condition { .. } | UseContext::NullComparison { .. }
        )
    }
}

/// Call expression whose callee may carry a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    pub callee: DeclId,
    pub span: Span,
    pub use_context: UseContext,
}

impl CallSite {
    pub fn new(callee: DeclId, use_context: UseContext) -> Self {
        Self {
            callee,
            span: Span::zero(),
            use_context,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Caller-side value bound to a receiver/parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    /// Stable value (local, parameter, stable receiver)
    Stable(VarId),
    /// Any other expression; refinements about it are dropped
    Unstable,
    /// Lambda literal passed directly
    Lambda(LambdaBody),
}

/// Receiver + positional arguments of one call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentBindings {
    pub receiver: Option<Argument>,
    pub arguments: Vec<Argument>,
}

impl ArgumentBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_receiver(mut self, receiver: Argument) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Argument bound to `slot`
    pub fn bound(&self, slot: SymbolSlot) -> Option<&Argument> {
        match slot {
            SymbolSlot::Receiver => self.receiver.as_ref(),
            SymbolSlot::Parameter(i) => self.arguments.get(usize::from(i)),
        }
    }
}

/// Outgoing edge of a call expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutcomeEdge {
    TrueBranch,
    FalseBranch,
    NormalReturn,
    AbnormalReturn,
}

impl OutcomeEdge {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeEdge::TrueBranch => "TRUE_BRANCH",
            OutcomeEdge::FalseBranch => "FALSE_BRANCH",
            OutcomeEdge::NormalReturn => "NORMAL_RETURN",
            OutcomeEdge::AbnormalReturn => "ABNORMAL_RETURN",
        }
    }
}

impl std::fmt::Display for OutcomeEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flow facts per outgoing edge of a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSiteOutcome {
    pub edges: BTreeMap<OutcomeEdge, FlowFact>,
    /// Variables definitely assigned once the call returns normally
    pub definitely_assigned: BTreeSet<VarId>,
    /// Nullability of the call's own value
    pub result_nullability: Nullability,
}

impl CallSiteOutcome {
    /// `pre` on every edge the use context has
    pub fn passthrough(pre: &FlowFact, use_context: UseContext) -> Self {
        let mut edges = BTreeMap::new();
        if use_context.branches() {
            edges.insert(OutcomeEdge::TrueBranch, pre.clone());
            edges.insert(OutcomeEdge::FalseBranch, pre.clone());
        }
        edges.insert(OutcomeEdge::NormalReturn, pre.clone());
        edges.insert(OutcomeEdge::AbnormalReturn, pre.clone());
        Self {
            edges,
            definitely_assigned: BTreeSet::new(),
            result_nullability: Nullability::Unknown,
        }
    }

    pub fn fact(&self, edge: OutcomeEdge) -> Option<&FlowFact> {
        self.edges.get(&edge)
    }

    pub fn normal(&self) -> Option<&FlowFact> {
        self.fact(OutcomeEdge::NormalReturn)
    }

    pub fn abnormal(&self) -> Option<&FlowFact> {
        self.fact(OutcomeEdge::AbnormalReturn)
    }

    pub fn true_branch(&self) -> Option<&FlowFact> {
        self.fact(OutcomeEdge::TrueBranch)
    }

    pub fn false_branch(&self) -> Option<&FlowFact> {
        self.fact(OutcomeEdge::FalseBranch)
    }

    pub fn is_definitely_assigned(&self, var: VarId) -> bool {
        self.definitely_assigned.contains(&var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_facts::Refinement;

    #[test]
    fn test_passthrough_edges_follow_use_context() {
        let pre = FlowFact::empty().with(VarId(1), Refinement::not_null());

        let branching = CallSiteOutcome::passthrough(&pre, UseContext::Condition { negated: false });
        assert_eq!(branching.edges.len(), 4);
        assert_eq!(branching.true_branch(), Some(&pre));

        let stored = CallSiteOutcome::passthrough(&pre, UseContext::Stored);
        assert_eq!(stored.edges.len(), 2);
        assert!(stored.true_branch().is_none());
        assert_eq!(stored.normal(), Some(&pre));
    }

    #[test]
    fn test_bindings_by_slot() {
        let bindings = ArgumentBindings::new()
            .with_receiver(Argument::Stable(VarId(9)))
            .with_argument(Argument::Unstable);
        assert_eq!(bindings.bound(SymbolSlot::Receiver), Some(&Argument::Stable(VarId(9))));
        assert_eq!(bindings.bound(SymbolSlot::Parameter(0)), Some(&Argument::Unstable));
        assert_eq!(bindings.bound(SymbolSlot::Parameter(1)), None);
    }
}
