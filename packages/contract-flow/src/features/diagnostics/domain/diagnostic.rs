/*
 * Contract Diagnostics
 *
 * One record per rejected (or suspicious) contract clause.
 */

use serde::{Deserialize, Serialize};

use crate::shared::models::{DeclId, Span};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Diagnostic kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Clause does not have the shape of any known effect
    UnrecognizedContractEffect,

    /// Clause references the receiver of an enclosing declaration
    ContractReferencesShadowedReceiver,

    /// Clause references a parameter of an enclosing declaration
    ContractReferencesOuterParameter,

    /// Name or `this` label resolves nowhere
    UnresolvedContractReference,

    /// `callsInPlace` target is not a function-typed parameter
    InvalidCallsInPlaceTarget,

    /// `implies` on something other than `returns(..)` / `returnsNotNull()`
    IllegalConditionalEffect,

    /// Bare reference used as a condition is not a Boolean
    NonBooleanCondition,

    /// Two clauses of the same contract cannot both hold
    ContradictoryContractClauses,

    /// Clause repeats an earlier clause
    DuplicateContractClause,
}

impl ErrorKind {
    /// Severity this kind is reported with
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::DuplicateContractClause => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable identifier used in reports
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::UnrecognizedContractEffect => "UNRECOGNIZED_CONTRACT_EFFECT",
            ErrorKind::ContractReferencesShadowedReceiver => {
                "CONTRACT_REFERENCES_SHADOWED_RECEIVER"
            }
            ErrorKind::ContractReferencesOuterParameter => "CONTRACT_REFERENCES_OUTER_PARAMETER",
            ErrorKind::UnresolvedContractReference => "UNRESOLVED_CONTRACT_REFERENCE",
            ErrorKind::InvalidCallsInPlaceTarget => "INVALID_CALLS_IN_PLACE_TARGET",
            ErrorKind::IllegalConditionalEffect => "ILLEGAL_CONDITIONAL_EFFECT",
            ErrorKind::NonBooleanCondition => "NON_BOOLEAN_CONDITION",
            ErrorKind::ContradictoryContractClauses => "CONTRADICTORY_CONTRACT_CLAUSES",
            ErrorKind::DuplicateContractClause => "DUPLICATE_CONTRACT_CLAUSE",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Diagnostic record
///
/// Immutable after creation. `declaration` + `clause` identify the clause
/// that produced it, which is what per-run deduplication keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    /// Declaration owning the contract
    pub declaration: DeclId,
    /// Index of the raw clause inside the contract block
    pub clause: Option<usize>,
}

impl Diagnostic {
    /// Create a diagnostic with the kind's default severity
    pub fn new(kind: ErrorKind, declaration: DeclId, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            span,
            message: message.into(),
            declaration,
            clause: None,
        }
    }

    /// Attach the clause index
    pub fn for_clause(mut self, clause: usize) -> Self {
        self.clause = Some(clause);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format for display
    pub fn format_message(&self) -> String {
        format!(
            "{} {}: [{}] {}",
            self.span, self.severity, self.kind, self.message
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_message())
    }
}
