//! Custom assertions for test verification

use contract_flow::features::diagnostics::{Diagnostic, ErrorKind};
use contract_flow::features::flow_facts::{FlowFact, Nullability};
use contract_flow::shared::models::VarId;

/// Assert the diagnostic kinds, in report order
pub fn assert_kinds(diagnostics: &[Diagnostic], expected: &[ErrorKind]) {
    let actual: Vec<ErrorKind> = diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        actual, expected,
        "Unexpected diagnostics: {:#?}",
        diagnostics
    );
}

/// Assert the nullability of `var` in a (present) fact
pub fn assert_nullability(fact: Option<&FlowFact>, var: VarId, expected: Nullability) {
    let fact = fact.expect("edge must be present");
    assert!(fact.is_reachable(), "Expected a reachable fact, got {:?}", fact);
    assert_eq!(
        fact.nullability(var),
        expected,
        "Nullability of {:?} in {:?}",
        var,
        fact
    );
}
