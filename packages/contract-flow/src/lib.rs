/*
 * Contract Flow - Contract-aware Semantic Analysis Core
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, ids, TypeRef)
 * - features/    : Vertical slices (cancellation → diagnostics → contracts → flow_facts → effect_evaluation)
 * - pipeline/    : Orchestration (AnalysisContext, AnalysisSession)
 * - config/      : Preset-based configuration with YAML overrides
 *
 * Two error channels are kept apart everywhere:
 * - Diagnostics : recoverable findings, accumulated fail-soft
 * - Cancelled   : abort signal for one analysis invocation, never a diagnostic
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::upper_case_acronyms)] // YAML naming

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use errors::{AnalysisError, Result};

pub use features::cancellation::{
    install_cancellation_policy, CancellationPolicy, Cancelled, Checkpoint,
};
pub use features::contracts::{ContractDeclaration, ContractValidator, EffectClause};
pub use features::diagnostics::{Diagnostic, DiagnosticReporter, ErrorKind, Severity, Validated};
pub use features::effect_evaluation::{CallSite, CallSiteOutcome, EffectEvaluator, OutcomeEdge};
pub use features::flow_facts::{FlowFact, Nullability, Refinement, TypeLattice};

pub use config::{AnalysisConfig, Preset, ValidatedConfig};
pub use pipeline::{AnalysisContext, AnalysisSession, FileSummary};
