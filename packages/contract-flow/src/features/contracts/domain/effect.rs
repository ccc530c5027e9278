//! Typed contract effects
//!
//! Every symbol inside an effect is a `SymbolId` owned by the contract's
//! declaration. Clauses that would need a foreign symbol are never built.

use serde::{Deserialize, Serialize};

use crate::shared::models::{SymbolId, TypeRef};

/// Value promised by `returns(..)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReturnsValue {
    True,
    False,
    Null,
    /// `returns()`: the call completed normally
    Wildcard,
}

impl std::fmt::Display for ReturnsValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReturnsValue::True => write!(f, "returns(true)"),
            ReturnsValue::False => write!(f, "returns(false)"),
            ReturnsValue::Null => write!(f, "returns(null)"),
            ReturnsValue::Wildcard => write!(f, "returns()"),
        }
    }
}

/// How often a `callsInPlace` lambda runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InvocationKind {
    ExactlyOnce,
    AtLeastOnce,
    AtMostOnce,
    Unknown,
}

impl InvocationKind {
    /// Parse `EXACTLY_ONCE` etc.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "EXACTLY_ONCE" => Some(InvocationKind::ExactlyOnce),
            "AT_LEAST_ONCE" => Some(InvocationKind::AtLeastOnce),
            "AT_MOST_ONCE" => Some(InvocationKind::AtMostOnce),
            "UNKNOWN" => Some(InvocationKind::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationKind::ExactlyOnce => "EXACTLY_ONCE",
            InvocationKind::AtLeastOnce => "AT_LEAST_ONCE",
            InvocationKind::AtMostOnce => "AT_MOST_ONCE",
            InvocationKind::Unknown => "UNKNOWN",
        }
    }

    /// The lambda runs at least once before the call returns
    pub fn guarantees_invocation(&self) -> bool {
        matches!(self, InvocationKind::ExactlyOnce | InvocationKind::AtLeastOnce)
    }

    /// The lambda may run more than once
    pub fn may_repeat(&self) -> bool {
        matches!(self, InvocationKind::AtLeastOnce | InvocationKind::Unknown)
    }
}

impl std::fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Condition on the contract owner's receiver/parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// `x == null` (is_null) / `x != null`
    NullCheck { target: SymbolId, is_null: bool },
    /// `x is T` / `x !is T`
    TypeCheck {
        target: SymbolId,
        ty: TypeRef,
        negated: bool,
    },
    /// Bare Boolean reference
    BooleanValue { target: SymbolId },
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn null_check(target: SymbolId, is_null: bool) -> Self {
        Condition::NullCheck { target, is_null }
    }

    pub fn type_check(target: SymbolId, ty: TypeRef, negated: bool) -> Self {
        Condition::TypeCheck {
            target,
            ty,
            negated,
        }
    }

    pub fn and(lhs: Condition, rhs: Condition) -> Self {
        Condition::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Condition, rhs: Condition) -> Self {
        Condition::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn negate(inner: Condition) -> Self {
        Condition::Not(Box::new(inner))
    }

    /// Every symbol the condition mentions
    pub fn references(&self) -> Vec<SymbolId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<SymbolId>) {
        match self {
            Condition::NullCheck { target, .. }
            | Condition::TypeCheck { target, .. }
            | Condition::BooleanValue { target } => out.push(*target),
            Condition::Not(inner) => inner.collect_references(out),
            Condition::And(lhs, rhs) | Condition::Or(lhs, rhs) => {
                lhs.collect_references(out);
                rhs.collect_references(out);
            }
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::NullCheck { target, is_null } => {
                write!(f, "{} {} null", target, if *is_null { "==" } else { "!=" })
            }
            Condition::TypeCheck {
                target,
                ty,
                negated,
            } => write!(f, "{} {} {}", target, if *negated { "!is" } else { "is" }, ty),
            Condition::BooleanValue { target } => write!(f, "{}", target),
            Condition::Not(inner) => write!(f, "!({})", inner),
            Condition::And(lhs, rhs) => write!(f, "({} && {})", lhs, rhs),
            Condition::Or(lhs, rhs) => write!(f, "({} || {})", lhs, rhs),
        }
    }
}

/// Left-hand side of `implies`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseEffect {
    Returns(ReturnsValue),
    ReturnsNotNull,
}

impl BaseEffect {
    /// Both effects can describe the same call outcome
    pub fn overlaps(&self, other: &BaseEffect) -> bool {
        use BaseEffect::*;
        use ReturnsValue::*;
        match (self, other) {
            (Returns(Wildcard), _) | (_, Returns(Wildcard)) => true,
            (Returns(a), Returns(b)) => a == b,
            (ReturnsNotNull, ReturnsNotNull) => true,
            (ReturnsNotNull, Returns(v)) | (Returns(v), ReturnsNotNull) => *v != Null,
        }
    }
}

impl std::fmt::Display for BaseEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseEffect::Returns(value) => write!(f, "{}", value),
            BaseEffect::ReturnsNotNull => write!(f, "returnsNotNull()"),
        }
    }
}

/// One accepted contract clause
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectClause {
    Returns(ReturnsValue),
    ReturnsNotNull,
    CallsInPlace {
        parameter: SymbolId,
        kind: InvocationKind,
    },
    Conditional {
        effect: BaseEffect,
        condition: Condition,
    },
}

impl EffectClause {
    pub fn conditional(effect: BaseEffect, condition: Condition) -> Self {
        EffectClause::Conditional { effect, condition }
    }

    /// Every symbol the clause mentions
    pub fn references(&self) -> Vec<SymbolId> {
        match self {
            EffectClause::Returns(_) | EffectClause::ReturnsNotNull => Vec::new(),
            EffectClause::CallsInPlace { parameter, .. } => vec![*parameter],
            EffectClause::Conditional { condition, .. } => condition.references(),
        }
    }
}

impl std::fmt::Display for EffectClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectClause::Returns(value) => write!(f, "{}", value),
            EffectClause::ReturnsNotNull => write!(f, "returnsNotNull()"),
            EffectClause::CallsInPlace { parameter, kind } => {
                write!(f, "callsInPlace({}, {})", parameter, kind)
            }
            EffectClause::Conditional { effect, condition } => {
                write!(f, "{} implies {}", effect, condition)
            }
        }
    }
}
