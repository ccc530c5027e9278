/*
 * Input Declaration Tree
 *
 * Produced by the external parser/resolver; consumed read-only.
 *
 * # Example
 * ```ignore
 * // fun <T> T?.case_1() {
 * //     fun <K> K?.case_1_1(): Boolean {
 * //         contract { returns(true) implies (this@case_1 != null) }
 * //     }
 * // }
 * let inner = Declaration::function(DeclId(2), "case_1_1")
 *     .with_receiver(TypeRef::type_parameter("K", true))
 *     .with_contract(vec![RawExpr::returns_true().implies(RawExpr::this_at("case_1").not_null())]);
 * let outer = Declaration::function(DeclId(1), "case_1")
 *     .with_receiver(TypeRef::type_parameter("T", true))
 *     .with_nested(inner);
 * ```
 */

use serde::{Deserialize, Serialize};

use crate::shared::models::{DeclId, Span, SymbolId, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    Function,
    /// Property accessor (contracts attach to the getter/setter body)
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverSymbol {
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    pub ty: TypeRef,
    pub span: Span,
}

/// Raw `contract { ... }` block: one expression per clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContractBlock {
    pub clauses: Vec<RawExpr>,
    pub span: Span,
}

/// Function or property declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub id: DeclId,
    pub name: String,
    pub kind: DeclarationKind,
    pub receiver: Option<ReceiverSymbol>,
    pub parameters: Vec<ParameterSymbol>,
    pub contract: Option<RawContractBlock>,
    /// Local declarations inside the body
    pub nested: Vec<Declaration>,
    pub span: Span,
    /// Bumped by the host whenever the declaration's source changes
    pub revision: u64,
}

impl Declaration {
    pub fn function(id: DeclId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: DeclarationKind::Function,
            receiver: None,
            parameters: Vec::new(),
            contract: None,
            nested: Vec::new(),
            span: Span::zero(),
            revision: 0,
        }
    }

    pub fn property(id: DeclId, name: impl Into<String>) -> Self {
        Self {
            kind: DeclarationKind::Property,
            ..Self::function(id, name)
        }
    }

    pub fn with_receiver(mut self, ty: TypeRef) -> Self {
        self.receiver = Some(ReceiverSymbol { ty });
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push(ParameterSymbol {
            name: name.into(),
            ty,
            span: Span::zero(),
        });
        self
    }

    pub fn with_contract(mut self, clauses: Vec<RawExpr>) -> Self {
        self.contract = Some(RawContractBlock {
            clauses,
            span: self.span,
        });
        self
    }

    pub fn with_nested(mut self, nested: Declaration) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn receiver_symbol(&self) -> Option<SymbolId> {
        self.receiver.as_ref().map(|_| SymbolId::receiver(self.id))
    }

    pub fn parameter_symbol(&self, index: usize) -> Option<SymbolId> {
        if index < self.parameters.len() {
            u16::try_from(index)
                .ok()
                .map(|i| SymbolId::parameter(self.id, i))
        } else {
            None
        }
    }

    /// Number of declarations in this subtree (self included)
    pub fn subtree_len(&self) -> usize {
        1 + self.nested.iter().map(Declaration::subtree_len).sum::<usize>()
    }
}

/// One parsed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub declarations: Vec<Declaration>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, declarations: Vec<Declaration>) -> Self {
        Self {
            path: path.into(),
            declarations,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Raw contract expressions
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Implies,
    And,
    Or,
    Eq,
    NotEq,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawLiteral {
    True,
    False,
    Null,
    Int(i64),
    Str(String),
}

/// Contract clause expression, exactly as written
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawExpr {
    /// `returns(true)`, `callsInPlace(block, InvocationKind.EXACTLY_ONCE)`
    Call {
        callee: String,
        args: Vec<RawExpr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<RawExpr>,
        rhs: Box<RawExpr>,
        span: Span,
    },
    Not {
        operand: Box<RawExpr>,
        span: Span,
    },
    /// `x is T` / `x !is T`
    Is {
        operand: Box<RawExpr>,
        ty: TypeRef,
        negated: bool,
        span: Span,
    },
    /// `this` / `this@label`
    This { label: Option<String>, span: Span },
    Name { name: String, span: Span },
    /// `InvocationKind.EXACTLY_ONCE`
    Qualified {
        qualifier: String,
        name: String,
        span: Span,
    },
    Literal { value: RawLiteral, span: Span },
}

impl RawExpr {
    pub fn span(&self) -> Span {
        match self {
            RawExpr::Call { span, .. }
            | RawExpr::Binary { span, .. }
            | RawExpr::Not { span, .. }
            | RawExpr::Is { span, .. }
            | RawExpr::This { span, .. }
            | RawExpr::Name { span, .. }
            | RawExpr::Qualified { span, .. }
            | RawExpr::Literal { span, .. } => *span,
        }
    }

    /// Replace the span of the outermost node
    pub fn at(mut self, new_span: Span) -> Self {
        match &mut self {
            RawExpr::Call { span, .. }
            | RawExpr::Binary { span, .. }
            | RawExpr::Not { span, .. }
            | RawExpr::Is { span, .. }
            | RawExpr::This { span, .. }
            | RawExpr::Name { span, .. }
            | RawExpr::Qualified { span, .. }
            | RawExpr::Literal { span, .. } => *span = new_span,
        }
        self
    }

    pub fn call(callee: impl Into<String>, args: Vec<RawExpr>) -> Self {
        RawExpr::Call {
            callee: callee.into(),
            args,
            span: Span::zero(),
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        RawExpr::Name {
            name: name.into(),
            span: Span::zero(),
        }
    }

    pub fn this() -> Self {
        RawExpr::This {
            label: None,
            span: Span::zero(),
        }
    }

    pub fn this_at(label: impl Into<String>) -> Self {
        RawExpr::This {
            label: Some(label.into()),
            span: Span::zero(),
        }
    }

    pub fn literal(value: RawLiteral) -> Self {
        RawExpr::Literal {
            value,
            span: Span::zero(),
        }
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        RawExpr::Qualified {
            qualifier: qualifier.into(),
            name: name.into(),
            span: Span::zero(),
        }
    }

    /// `returns()`
    pub fn returns() -> Self {
        Self::call("returns", Vec::new())
    }

    /// `returns(true)`
    pub fn returns_true() -> Self {
        Self::call("returns", vec![Self::literal(RawLiteral::True)])
    }

    /// `returns(false)`
    pub fn returns_false() -> Self {
        Self::call("returns", vec![Self::literal(RawLiteral::False)])
    }

    /// `returns(null)`
    pub fn returns_null() -> Self {
        Self::call("returns", vec![Self::literal(RawLiteral::Null)])
    }

    /// `returnsNotNull()`
    pub fn returns_not_null() -> Self {
        Self::call("returnsNotNull", Vec::new())
    }

    /// `callsInPlace(param, InvocationKind.KIND)`
    pub fn calls_in_place(param: impl Into<String>, kind: &str) -> Self {
        Self::call(
            "callsInPlace",
            vec![Self::name(param), Self::qualified("InvocationKind", kind)],
        )
    }

    fn binary(self, op: BinaryOp, rhs: RawExpr) -> Self {
        RawExpr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
            span: Span::zero(),
        }
    }

    pub fn implies(self, condition: RawExpr) -> Self {
        self.binary(BinaryOp::Implies, condition)
    }

    pub fn and(self, rhs: RawExpr) -> Self {
        self.binary(BinaryOp::And, rhs)
    }

    pub fn or(self, rhs: RawExpr) -> Self {
        self.binary(BinaryOp::Or, rhs)
    }

    /// `self != null`
    pub fn not_null(self) -> Self {
        self.binary(BinaryOp::NotEq, Self::literal(RawLiteral::Null))
    }

    /// `self == null`
    pub fn is_null(self) -> Self {
        self.binary(BinaryOp::Eq, Self::literal(RawLiteral::Null))
    }

    /// `self is ty`
    pub fn is_type(self, ty: TypeRef) -> Self {
        RawExpr::Is {
            operand: Box::new(self),
            ty,
            negated: false,
            span: Span::zero(),
        }
    }

    /// `self !is ty`
    pub fn is_not_type(self, ty: TypeRef) -> Self {
        RawExpr::Is {
            operand: Box::new(self),
            ty,
            negated: true,
            span: Span::zero(),
        }
    }

    /// `!self`
    pub fn negate(self) -> Self {
        RawExpr::Not {
            operand: Box::new(self),
            span: Span::zero(),
        }
    }
}
