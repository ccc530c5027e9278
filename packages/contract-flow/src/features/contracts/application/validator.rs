//! Contract validator
//!
//! Turns a raw `contract { ... }` block into a `ContractDeclaration`.
//! Each clause is classified and resolved on its own; a failing clause
//! becomes a diagnostic and is left out, the rest of the contract survives.
//! The checkpoint is polled once per declaration and once per clause.

use tracing::debug;

use super::consistency::{find_conflict, Conflict};
use super::scope::{Resolution, ScopeChain};
use crate::config::ValidationConfig;
use crate::features::cancellation::{CancellableResult, Checkpoint};
use crate::features::contracts::domain::{
    BaseEffect, BinaryOp, Condition, ContractDeclaration, ContractParameter, Declaration,
    EffectClause, InvocationKind, RawContractBlock, RawExpr, RawLiteral, ReturnsValue,
};
use crate::features::diagnostics::{Diagnostic, ErrorKind, Validated};
use crate::shared::models::{DeclId, Span, SymbolId, SymbolSlot, TypeRef};

const RETURNS: &str = "returns";
const RETURNS_NOT_NULL: &str = "returnsNotNull";
const CALLS_IN_PLACE: &str = "callsInPlace";
const INVOCATION_KIND: &str = "InvocationKind";

/// Clause-level failure: kind + location + message
#[derive(Debug)]
struct Rejection {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Rejection {
    fn new(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    fn unrecognized(expr: &RawExpr, what: &str) -> Self {
        Self::new(
            ErrorKind::UnrecognizedContractEffect,
            expr.span(),
            format!("unrecognized contract effect: {}", what),
        )
    }
}

type ClauseResult<T> = Result<T, Rejection>;

/// Validates contract blocks against their owner's scope frame
pub struct ContractValidator<'a> {
    checkpoint: &'a Checkpoint,
    config: &'a ValidationConfig,
}

impl<'a> ContractValidator<'a> {
    pub fn new(checkpoint: &'a Checkpoint, config: &'a ValidationConfig) -> Self {
        Self { checkpoint, config }
    }

    /// Validate the contract of `decl`, declared inside the `outer` scopes.
    ///
    /// `Ok(Validated { value: None, .. })` when the declaration has no
    /// contract block.
    pub fn validate(
        &self,
        outer: &ScopeChain,
        decl: &Declaration,
    ) -> CancellableResult<Validated<Option<ContractDeclaration>>> {
        self.checkpoint.poll()?;
        match &decl.contract {
            None => Ok(Validated::clean(None)),
            Some(block) => {
                let scope = outer.entered(decl);
                Ok(self.validate_block(&scope, decl, block)?.map(Some))
            }
        }
    }

    /// Validate `block`; `scope` must have `decl` as its innermost frame
    pub fn validate_block(
        &self,
        scope: &ScopeChain,
        decl: &Declaration,
        block: &RawContractBlock,
    ) -> CancellableResult<Validated<ContractDeclaration>> {
        debug_assert_eq!(scope.own_frame().map(|f| f.decl), Some(decl.id));

        let classifier = ClauseClassifier { scope };
        let mut clauses: Vec<EffectClause> = Vec::with_capacity(block.clauses.len());
        let mut diagnostics = Vec::new();

        for (index, raw) in block.clauses.iter().enumerate() {
            self.checkpoint.poll()?;

            let clause = match classifier.classify(raw) {
                Ok(clause) => clause,
                Err(rejection) => {
                    debug!(
                        decl = %decl.id,
                        clause = index,
                        kind = %rejection.kind,
                        "contract clause rejected"
                    );
                    diagnostics.push(self.diagnostic(decl.id, index, rejection));
                    continue;
                }
            };

            match find_conflict(&clauses, &clause, self.config.detect_contradictions) {
                None => clauses.push(clause),
                Some(Conflict::Duplicate { .. }) => {
                    let rejection = Rejection::new(
                        ErrorKind::DuplicateContractClause,
                        raw.span(),
                        format!("duplicate contract clause '{}'", clause),
                    );
                    if self.config.report_warnings {
                        diagnostics.push(self.diagnostic(decl.id, index, rejection));
                    }
                }
                Some(Conflict::Contradiction { earlier }) => {
                    let rejection = Rejection::new(
                        ErrorKind::ContradictoryContractClauses,
                        raw.span(),
                        format!("'{}' contradicts '{}'", clause, clauses[earlier]),
                    );
                    diagnostics.push(self.diagnostic(decl.id, index, rejection));
                }
            }
        }

        debug!(
            decl = %decl.id,
            name = %decl.name,
            accepted = clauses.len(),
            rejected = block.clauses.len() - clauses.len(),
            "contract validated"
        );

        let contract = ContractDeclaration {
            owner: decl.id,
            owner_name: decl.name.clone(),
            receiver: decl.receiver_symbol(),
            parameters: decl
                .parameters
                .iter()
                .enumerate()
                .filter_map(|(i, p)| {
                    decl.parameter_symbol(i).map(|symbol| ContractParameter {
                        symbol,
                        name: p.name.clone(),
                        ty: p.ty.clone(),
                    })
                })
                .collect(),
            clauses,
            span: block.span,
        };
        debug_assert!(contract.is_self_contained());

        Ok(Validated::new(contract, diagnostics))
    }

    fn diagnostic(&self, decl: DeclId, index: usize, rejection: Rejection) -> Diagnostic {
        Diagnostic::new(rejection.kind, decl, rejection.span, rejection.message).for_clause(index)
    }
}

/// Shape classification + reference resolution for one clause
struct ClauseClassifier<'s> {
    scope: &'s ScopeChain,
}

impl ClauseClassifier<'_> {
    fn classify(&self, expr: &RawExpr) -> ClauseResult<EffectClause> {
        match expr {
            RawExpr::Binary {
                op: BinaryOp::Implies,
                lhs,
                rhs,
                ..
            } => {
                let effect = self.base_effect(lhs)?;
                let condition = self.condition(rhs)?;
                Ok(EffectClause::conditional(effect, condition))
            }
            RawExpr::Call { callee, args, .. } => match callee.as_str() {
                RETURNS => Ok(EffectClause::Returns(self.returns_value(expr, args)?)),
                RETURNS_NOT_NULL if args.is_empty() => Ok(EffectClause::ReturnsNotNull),
                CALLS_IN_PLACE => self.calls_in_place(expr, args),
                _ => Err(Rejection::unrecognized(expr, &format!("call to '{}'", callee))),
            },
            _ => Err(Rejection::unrecognized(expr, "expected an effect declaration")),
        }
    }

    fn base_effect(&self, expr: &RawExpr) -> ClauseResult<BaseEffect> {
        match self.classify(expr)? {
            EffectClause::Returns(value) => Ok(BaseEffect::Returns(value)),
            EffectClause::ReturnsNotNull => Ok(BaseEffect::ReturnsNotNull),
            other => Err(Rejection::new(
                ErrorKind::IllegalConditionalEffect,
                expr.span(),
                format!("'{}' cannot be conditional", other),
            )),
        }
    }

    fn returns_value(&self, expr: &RawExpr, args: &[RawExpr]) -> ClauseResult<ReturnsValue> {
        match args {
            [] => Ok(ReturnsValue::Wildcard),
            [RawExpr::Literal { value, .. }] => match value {
                RawLiteral::True => Ok(ReturnsValue::True),
                RawLiteral::False => Ok(ReturnsValue::False),
                RawLiteral::Null => Ok(ReturnsValue::Null),
                _ => Err(Rejection::unrecognized(
                    expr,
                    "returns(..) accepts only true, false or null",
                )),
            },
            _ => Err(Rejection::unrecognized(
                expr,
                "returns(..) accepts only true, false or null",
            )),
        }
    }

    fn calls_in_place(&self, expr: &RawExpr, args: &[RawExpr]) -> ClauseResult<EffectClause> {
        let (target, kind) = match args {
            [target] => (target, InvocationKind::Unknown),
            [target, kind_expr] => (target, Self::invocation_kind(kind_expr)?),
            _ => {
                return Err(Rejection::unrecognized(
                    expr,
                    "callsInPlace expects a parameter and an optional InvocationKind",
                ))
            }
        };
        let (parameter, ty) = self.reference(target)?;
        if !parameter_is_lambda(parameter, &ty) {
            return Err(Rejection::new(
                ErrorKind::InvalidCallsInPlaceTarget,
                target.span(),
                format!("callsInPlace target must be a function-typed parameter, found '{}'", ty),
            ));
        }
        Ok(EffectClause::CallsInPlace { parameter, kind })
    }

    fn invocation_kind(expr: &RawExpr) -> ClauseResult<InvocationKind> {
        match expr {
            RawExpr::Qualified {
                qualifier, name, ..
            } if qualifier == INVOCATION_KIND => InvocationKind::from_name(name)
                .ok_or_else(|| Rejection::unrecognized(expr, &format!("invocation kind '{}'", name))),
            _ => Err(Rejection::unrecognized(expr, "expected InvocationKind.<KIND>")),
        }
    }

    fn condition(&self, expr: &RawExpr) -> ClauseResult<Condition> {
        match expr {
            RawExpr::Binary { op, lhs, rhs, .. } => match op {
                BinaryOp::And => Ok(Condition::and(self.condition(lhs)?, self.condition(rhs)?)),
                BinaryOp::Or => Ok(Condition::or(self.condition(lhs)?, self.condition(rhs)?)),
                BinaryOp::Eq | BinaryOp::NotEq => {
                    let operand = match (is_null_literal(lhs), is_null_literal(rhs)) {
                        (false, true) => lhs,
                        (true, false) => rhs,
                        _ => {
                            return Err(Rejection::unrecognized(
                                expr,
                                "equality conditions must compare a reference with null",
                            ))
                        }
                    };
                    let (target, _) = self.reference(operand)?;
                    Ok(Condition::null_check(target, *op == BinaryOp::Eq))
                }
                BinaryOp::Implies => Err(Rejection::unrecognized(
                    expr,
                    "nested implies inside a condition",
                )),
            },
            RawExpr::Not { operand, .. } => Ok(Condition::negate(self.condition(operand)?)),
            RawExpr::Is {
                operand,
                ty,
                negated,
                ..
            } => {
                let (target, _) = self.reference(operand)?;
                Ok(Condition::type_check(target, ty.clone(), *negated))
            }
            RawExpr::This { .. } | RawExpr::Name { .. } => {
                let (target, ty) = self.reference(expr)?;
                if ty.is_boolean() {
                    Ok(Condition::BooleanValue { target })
                } else {
                    Err(Rejection::new(
                        ErrorKind::NonBooleanCondition,
                        expr.span(),
                        format!("condition has type '{}', expected 'Boolean'", ty),
                    ))
                }
            }
            _ => Err(Rejection::unrecognized(expr, "unsupported condition")),
        }
    }

    /// Resolve a receiver/parameter reference against the owner frame only
    fn reference(&self, expr: &RawExpr) -> ClauseResult<(SymbolId, TypeRef)> {
        let (resolution, shown) = match expr {
            RawExpr::This { label, .. } => (
                self.scope.resolve_this(label.as_deref()),
                label
                    .as_ref()
                    .map(|l| format!("this@{}", l))
                    .unwrap_or_else(|| "this".to_string()),
            ),
            RawExpr::Name { name, .. } => (self.scope.resolve_name(name), name.clone()),
            _ => {
                return Err(Rejection::unrecognized(
                    expr,
                    "expected a receiver or parameter reference",
                ))
            }
        };
        match resolution {
            Resolution::Own(symbol, ty) => Ok((symbol, ty)),
            Resolution::OuterReceiver { owner_name, .. } => Err(Rejection::new(
                ErrorKind::ContractReferencesShadowedReceiver,
                expr.span(),
                format!(
                    "'{}' refers to the receiver of enclosing declaration '{}'",
                    shown, owner_name
                ),
            )),
            Resolution::OuterParameter { owner_name, .. } => Err(Rejection::new(
                ErrorKind::ContractReferencesOuterParameter,
                expr.span(),
                format!(
                    "'{}' is a parameter of enclosing declaration '{}'",
                    shown, owner_name
                ),
            )),
            Resolution::Unresolved => Err(Rejection::new(
                ErrorKind::UnresolvedContractReference,
                expr.span(),
                format!("unresolved reference '{}'", shown),
            )),
        }
    }
}

fn is_null_literal(expr: &RawExpr) -> bool {
    matches!(
        expr,
        RawExpr::Literal {
            value: RawLiteral::Null,
            ..
        }
    )
}

/// Only value parameters of function type can be invoked in place
fn parameter_is_lambda(symbol: SymbolId, ty: &TypeRef) -> bool {
    symbol.slot != SymbolSlot::Receiver && ty.is_function()
}
