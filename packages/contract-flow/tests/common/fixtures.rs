//! Declaration fixtures
//!
//! Each fixture mirrors a small source snippet, shown in its doc
//! comment.

use contract_flow::features::contracts::{Declaration, RawExpr, SourceFile};
use contract_flow::shared::models::{DeclId, Span, TypeRef};

/// ```text
/// fun requireNotNull(p: Any?): Boolean {
///     contract { returns(true) implies (p != null) }
/// }
/// ```
pub fn fixture_require_not_null(id: u32) -> Declaration {
    Declaration::function(DeclId(id), "requireNotNull")
        .with_parameter("p", TypeRef::nullable("Any"))
        .with_contract(vec![RawExpr::returns_true().implies(RawExpr::name("p").not_null())])
}

/// ```text
/// fun isString(p: Any?): Boolean {
///     contract { returns(true) implies (p is String) }
/// }
/// ```
pub fn fixture_is_string(id: u32) -> Declaration {
    Declaration::function(DeclId(id), "isString")
        .with_parameter("p", TypeRef::nullable("Any"))
        .with_contract(vec![RawExpr::returns_true()
            .implies(RawExpr::name("p").is_type(TypeRef::named("String")))])
}

/// ```text
/// fun run(block: () -> Unit) {
///     contract { callsInPlace(block, InvocationKind.<kind>) }
/// }
/// ```
pub fn fixture_run_in_place(id: u32, kind: &str) -> Declaration {
    Declaration::function(DeclId(id), "run")
        .with_parameter("block", TypeRef::thunk())
        .with_contract(vec![RawExpr::calls_in_place("block", kind)])
}

/// ```text
/// fun <T> T?.case_1() {
///     fun <K> K?.case_1_1(): Boolean {
///         contract { returns(true) implies (this@case_1 != null) }
///         return this@case_1 != null
///     }
/// }
/// ```
pub fn fixture_case_1() -> Declaration {
    let inner = Declaration::function(DeclId(2), "case_1_1")
        .with_receiver(TypeRef::type_parameter("K", true))
        .with_contract(vec![RawExpr::returns_true()
            .implies(RawExpr::this_at("case_1").at(Span::new(3, 38, 3, 49)).not_null())])
        .at(Span::new(2, 5, 5, 6));
    Declaration::function(DeclId(1), "case_1")
        .with_receiver(TypeRef::type_parameter("T", true))
        .with_nested(inner)
        .at(Span::new(1, 1, 6, 2))
}

/// Same shape as [`fixture_case_1`] but the contract names its own receiver
pub fn fixture_case_1_own_receiver() -> Declaration {
    let inner = Declaration::function(DeclId(2), "case_1_1")
        .with_receiver(TypeRef::type_parameter("K", true))
        .with_contract(vec![RawExpr::returns_true()
            .implies(RawExpr::this_at("case_1_1").not_null())]);
    Declaration::function(DeclId(1), "case_1")
        .with_receiver(TypeRef::type_parameter("T", true))
        .with_nested(inner)
}

/// ```text
/// fun outer(x: Any?) {
///     fun inner(y: Any?): Boolean {
///         contract { returns(true) implies (x != null) }
///     }
/// }
/// ```
pub fn fixture_outer_parameter() -> Declaration {
    let inner = Declaration::function(DeclId(2), "inner")
        .with_parameter("y", TypeRef::nullable("Any"))
        .with_contract(vec![RawExpr::returns_true().implies(RawExpr::name("x").not_null())]);
    Declaration::function(DeclId(1), "outer")
        .with_parameter("x", TypeRef::nullable("Any"))
        .with_nested(inner)
}

/// One illegal clause followed by one legal clause
pub fn fixture_fail_soft(id: u32) -> Declaration {
    Declaration::function(DeclId(id), "check")
        .with_parameter("p", TypeRef::nullable("Any"))
        .with_contract(vec![
            RawExpr::call("returnsSomething", vec![]),
            RawExpr::returns_true().implies(RawExpr::name("p").not_null()),
        ])
}

/// Ten clauses: three illegal ones first, then seven compatible legal ones
pub fn fixture_ten_clauses(id: u32) -> Declaration {
    Declaration::function(DeclId(id), "tenClauses")
        .with_parameter("p", TypeRef::nullable("Any"))
        .with_parameter("q", TypeRef::nullable("Any"))
        .with_parameter("s", TypeRef::nullable("String"))
        .with_parameter("b", TypeRef::boolean())
        .with_contract(vec![
            // illegal
            RawExpr::call("bogus", vec![]),
            RawExpr::calls_in_place("p", "EXACTLY_ONCE"),
            RawExpr::returns_true().implies(RawExpr::this().not_null()),
            // legal
            RawExpr::returns_true().implies(RawExpr::name("p").not_null()),
            RawExpr::returns_false().implies(RawExpr::name("q").not_null()),
            RawExpr::returns().implies(RawExpr::name("s").not_null()),
            RawExpr::returns_not_null().implies(RawExpr::name("b")),
            RawExpr::returns_null().implies(RawExpr::name("p").is_null()),
            RawExpr::returns_true().implies(RawExpr::name("q").is_type(TypeRef::named("String"))),
            RawExpr::returns_false().implies(RawExpr::name("p").is_type(TypeRef::named("String"))),
        ])
}

/// `count` files, each with one contract-carrying function and one plain one
pub fn fixture_files(count: u32) -> Vec<SourceFile> {
    (0..count)
        .map(|i| {
            SourceFile::new(
                format!("src/File{}.kt", i),
                vec![
                    fixture_require_not_null(i * 2 + 1),
                    Declaration::function(DeclId(i * 2 + 2), format!("plain{}", i)),
                ],
            )
        })
        .collect()
}
