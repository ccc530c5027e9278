//! Lambda bodies passed to `callsInPlace` parameters
//!
//! Only the statements that change caller-visible flow facts are modelled:
//! assignments to captured variables, branching, loops and exits.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::features::flow_facts::{FlowFact, Refinement};
use crate::shared::models::VarId;

/// Right-hand side of an assignment to a captured variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedValue {
    Null,
    NotNull,
    Instance(String),
    Unknown,
    /// Value of another variable at that point
    CopyOf(VarId),
}

impl AssignedValue {
    pub fn refinement_in(&self, fact: &FlowFact) -> Refinement {
        match self {
            AssignedValue::Null => Refinement::null(),
            AssignedValue::NotNull => Refinement::not_null(),
            AssignedValue::Instance(ty) => Refinement::instance_of(ty.clone()),
            AssignedValue::Unknown => Refinement::unknown(),
            AssignedValue::CopyOf(source) => fact.get(*source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LambdaStmt {
    Assign { target: VarId, value: AssignedValue },
    Branch {
        then_branch: Vec<LambdaStmt>,
        else_branch: Vec<LambdaStmt>,
    },
    /// Body runs zero or more times
    Loop { body: Vec<LambdaStmt> },
    /// `return@label`: the lambda completes normally
    Return,
    /// Throw / non-local jump: the lambda never completes normally
    Throw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LambdaBody {
    pub stmts: Vec<LambdaStmt>,
}

impl LambdaBody {
    pub fn new(stmts: Vec<LambdaStmt>) -> Self {
        Self { stmts }
    }

    /// Variables assigned anywhere in the body, on any path
    pub fn assigned_variables(&self) -> BTreeSet<VarId> {
        let mut out = BTreeSet::new();
        collect_assigned(&self.stmts, &mut out);
        out
    }
}

fn collect_assigned(stmts: &[LambdaStmt], out: &mut BTreeSet<VarId>) {
    for stmt in stmts {
        match stmt {
            LambdaStmt::Assign { target, .. } => {
                out.insert(*target);
            }
            LambdaStmt::Branch {
                then_branch,
                else_branch,
            } => {
                collect_assigned(then_branch, out);
                collect_assigned(else_branch, out);
            }
            LambdaStmt::Loop { body } => collect_assigned(body, out),
            LambdaStmt::Return | LambdaStmt::Throw => {}
        }
    }
}

impl LambdaStmt {
    pub fn assign(target: VarId, value: AssignedValue) -> Self {
        LambdaStmt::Assign { target, value }
    }

    pub fn branch(then_branch: Vec<LambdaStmt>, else_branch: Vec<LambdaStmt>) -> Self {
        LambdaStmt::Branch {
            then_branch,
            else_branch,
        }
    }

    pub fn repeat(body: Vec<LambdaStmt>) -> Self {
        LambdaStmt::Loop { body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigned_variables_covers_nested_blocks() {
        let body = LambdaBody::new(vec![
            LambdaStmt::assign(VarId(1), AssignedValue::NotNull),
            LambdaStmt::branch(
                vec![LambdaStmt::assign(VarId(2), AssignedValue::Null)],
                vec![LambdaStmt::repeat(vec![LambdaStmt::assign(
                    VarId(3),
                    AssignedValue::Unknown,
                )])],
            ),
            LambdaStmt::Return,
        ]);
        let vars: Vec<_> = body.assigned_variables().into_iter().collect();
        assert_eq!(vars, vec![VarId(1), VarId(2), VarId(3)]);
    }

    #[test]
    fn test_copy_reads_current_fact() {
        let fact = FlowFact::empty().with(VarId(1), Refinement::null());
        assert_eq!(
            AssignedValue::CopyOf(VarId(1)).refinement_in(&fact),
            Refinement::null()
        );
        assert!(AssignedValue::CopyOf(VarId(2)).refinement_in(&fact).is_unknown());
    }
}
