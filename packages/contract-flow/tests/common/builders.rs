//! Test data builders
//!
//! Sessions, contexts and contracts wired the way the integration tests
//! need them.

use std::sync::Arc;

use contract_flow::config::{AnalysisConfig, Preset, ValidatedConfig};
use contract_flow::features::cancellation::{CancellationPolicy, Checkpoint};
use contract_flow::features::contracts::{
    ContractDeclaration, ContractValidator, Declaration, ScopeChain,
};
use contract_flow::features::diagnostics::{CollectingReporter, Validated};
use contract_flow::pipeline::{AnalysisContext, AnalysisSession};

/// Session + the reporter it flushes to
pub struct SessionHarness {
    pub session: AnalysisSession,
    pub reporter: Arc<CollectingReporter>,
}

/// Builder for an `AnalysisSession` under test
pub struct SessionBuilder {
    config: AnalysisConfig,
    checkpoint: Checkpoint,
}

impl SessionBuilder {
    /// Balanced preset, never cancelled
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::preset(Preset::Balanced),
            checkpoint: Checkpoint::never(),
        }
    }

    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = AnalysisConfig::preset(preset);
        self
    }

    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn policy(mut self, policy: Arc<dyn CancellationPolicy>) -> Self {
        self.checkpoint = Checkpoint::new(policy);
        self
    }

    pub fn build(self) -> SessionHarness {
        let config = self.config.build().expect("test config must be valid");
        let reporter = Arc::new(CollectingReporter::new());
        let context = AnalysisContext::new(config).with_checkpoint(self.checkpoint);
        SessionHarness {
            session: AnalysisSession::new(context, reporter.clone()),
            reporter,
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a top-level declaration with the balanced preset
pub fn validate_top_level(decl: &Declaration) -> Validated<Option<ContractDeclaration>> {
    let checkpoint = Checkpoint::never();
    let config = ValidatedConfig::default();
    ContractValidator::new(&checkpoint, config.validation())
        .validate(&ScopeChain::new(), decl)
        .expect("never-cancelled checkpoint")
}

/// Validate `decl` nested inside `enclosing` (outermost first)
pub fn validate_nested(
    enclosing: &[&Declaration],
    decl: &Declaration,
) -> Validated<Option<ContractDeclaration>> {
    let checkpoint = Checkpoint::never();
    let config = ValidatedConfig::default();
    let mut scope = ScopeChain::new();
    for outer in enclosing {
        scope = scope.entered(outer);
    }
    ContractValidator::new(&checkpoint, config.validation())
        .validate(&scope, decl)
        .expect("never-cancelled checkpoint")
}

/// Validated contract of a top-level declaration that must have one
pub fn contract_of(decl: &Declaration) -> ContractDeclaration {
    validate_top_level(decl)
        .value
        .expect("declaration has a contract block")
}
