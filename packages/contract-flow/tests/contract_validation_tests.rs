//! Contract validation integration tests
//!
//! Fail-soft classification, scope binding of receivers/parameters and
//! cross-clause checks, driven through the public validator and session.

mod common;

use common::*;
use contract_flow::features::contracts::{
    BaseEffect, Condition, Declaration, EffectClause, InvocationKind, RawExpr, ReturnsValue,
    SourceFile,
};
use contract_flow::features::diagnostics::{ErrorKind, Severity};
use contract_flow::features::effect_evaluation::{ArgumentBindings, CallSite, UseContext};
use contract_flow::features::flow_facts::{FlowFact, Nullability};
use contract_flow::shared::models::{DeclId, Span, SymbolId, TypeRef};
use pretty_assertions::assert_eq;

#[test]
fn test_fail_soft_one_illegal_one_legal() {
    let result = validate_top_level(&fixture_fail_soft(1));

    assert_kinds(&result.diagnostics, &[ErrorKind::UnrecognizedContractEffect]);
    assert_eq!(result.diagnostics[0].clause, Some(0));

    let contract = result.value.expect("contract survives illegal clauses");
    assert_eq!(
        contract.clauses,
        vec![EffectClause::Conditional {
            effect: BaseEffect::Returns(ReturnsValue::True),
            condition: Condition::null_check(SymbolId::parameter(DeclId(1), 0), false),
        }]
    );
}

#[test]
fn test_case_1_shadowed_receiver_rejected() {
    let outer = fixture_case_1();
    let inner = &outer.nested[0];
    let result = validate_nested(&[&outer], inner);

    assert_kinds(
        &result.diagnostics,
        &[ErrorKind::ContractReferencesShadowedReceiver],
    );
    assert_eq!(result.diagnostics[0].span, Span::new(3, 38, 3, 49));
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
    assert!(result.diagnostics[0].message.contains("this@case_1"));

    let contract = result.value.expect("block present");
    assert!(contract.is_empty());
}

#[test]
fn test_case_1_own_receiver_accepted() {
    let outer = fixture_case_1_own_receiver();
    let inner = &outer.nested[0];
    let result = validate_nested(&[&outer], inner);

    assert!(result.diagnostics.is_empty());
    let contract = result.value.expect("block present");
    assert_eq!(
        contract.clauses,
        vec![EffectClause::Conditional {
            effect: BaseEffect::Returns(ReturnsValue::True),
            condition: Condition::null_check(SymbolId::receiver(DeclId(2)), false),
        }]
    );
    assert!(contract.is_self_contained());
}

#[test]
fn test_outer_parameter_rejected() {
    let outer = fixture_outer_parameter();
    let result = validate_nested(&[&outer], &outer.nested[0]);
    assert_kinds(
        &result.diagnostics,
        &[ErrorKind::ContractReferencesOuterParameter],
    );
}

#[test]
fn test_session_walks_nested_scopes() {
    let harness = SessionBuilder::new().build();
    let file = SourceFile::new("case_1.kt", vec![fixture_case_1()]);

    let summary = harness.session.analyze_file(&file).unwrap();

    assert_eq!(summary.declarations, 2);
    assert_eq!(summary.contracts, 1);
    assert_eq!(summary.clauses, 0);
    assert_kinds(
        &harness.reporter.diagnostics(),
        &[ErrorKind::ContractReferencesShadowedReceiver],
    );
}

#[test]
fn test_calls_in_place_target_rules() {
    let decl = Declaration::function(DeclId(5), "f")
        .with_receiver(TypeRef::function(vec![], TypeRef::named("Unit")))
        .with_parameter("block", TypeRef::thunk())
        .with_parameter("n", TypeRef::named("Int"))
        .with_contract(vec![
            RawExpr::calls_in_place("block", "AT_MOST_ONCE"),
            RawExpr::calls_in_place("n", "EXACTLY_ONCE"),
            RawExpr::call(
                "callsInPlace",
                vec![RawExpr::this()],
            ),
        ]);

    let result = validate_top_level(&decl);
    assert_kinds(
        &result.diagnostics,
        &[
            ErrorKind::InvalidCallsInPlaceTarget,
            ErrorKind::InvalidCallsInPlaceTarget,
        ],
    );
    let contract = result.value.unwrap();
    assert_eq!(
        contract.clauses,
        vec![EffectClause::CallsInPlace {
            parameter: SymbolId::parameter(DeclId(5), 0),
            kind: InvocationKind::AtMostOnce,
        }]
    );
}

#[test]
fn test_contradiction_keeps_first_clause() {
    let decl = Declaration::function(DeclId(3), "g")
        .with_parameter("p", TypeRef::nullable("Any"))
        .with_contract(vec![
            RawExpr::returns_true().implies(RawExpr::name("p").not_null()),
            RawExpr::returns_true().implies(RawExpr::name("p").is_null()),
        ]);

    let result = validate_top_level(&decl);
    assert_kinds(&result.diagnostics, &[ErrorKind::ContradictoryContractClauses]);
    assert_eq!(result.diagnostics[0].clause, Some(1));
    assert_eq!(result.value.unwrap().len(), 1);
}

#[test]
fn test_returns_not_null_and_returns_null_contradict() {
    let decl = Declaration::function(DeclId(5), "f")
        .with_parameter("p", TypeRef::nullable("Any"))
        .with_contract(vec![RawExpr::returns_not_null(), RawExpr::returns_null()]);

    let result = validate_top_level(&decl);
    assert_kinds(&result.diagnostics, &[ErrorKind::ContradictoryContractClauses]);
    assert_eq!(result.diagnostics[0].clause, Some(1));
    assert_eq!(
        result.value.unwrap().clauses,
        vec![EffectClause::ReturnsNotNull]
    );

    let harness = SessionBuilder::new().build();
    let summary = harness
        .session
        .analyze_file(&SourceFile::new("f.kt", vec![decl]))
        .unwrap();
    assert_eq!(summary.clauses, 1);
    assert_eq!(summary.diagnostics, 1);

    let call = CallSite::new(DeclId(5), UseContext::NullComparison { equals_null: true });
    let outcome = harness
        .session
        .evaluate_call(&call, &ArgumentBindings::new(), &FlowFact::empty())
        .unwrap();
    assert_eq!(outcome.result_nullability, Nullability::NotNull);
}

#[test]
fn test_ten_clause_contract_keeps_legal_clauses() {
    let result = validate_top_level(&fixture_ten_clauses(4));

    assert_kinds(
        &result.diagnostics,
        &[
            ErrorKind::UnrecognizedContractEffect,
            ErrorKind::InvalidCallsInPlaceTarget,
            ErrorKind::UnresolvedContractReference,
        ],
    );
    assert_eq!(result.value.unwrap().len(), 7);
}

#[test]
fn test_duplicate_clause_is_warning() {
    let decl = Declaration::function(DeclId(8), "h")
        .with_parameter("p", TypeRef::nullable("Any"))
        .with_contract(vec![
            RawExpr::returns_true().implies(RawExpr::name("p").not_null()),
            RawExpr::returns_true().implies(RawExpr::name("p").not_null()),
        ]);

    let result = validate_top_level(&decl);
    assert_kinds(&result.diagnostics, &[ErrorKind::DuplicateContractClause]);
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    assert_eq!(result.value.unwrap().len(), 1);
}
