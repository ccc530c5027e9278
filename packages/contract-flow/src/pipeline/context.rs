//! Analysis context
//!
//! Everything one analysis invocation needs, passed explicitly down the call
//! chain. Cheap to clone: every field is shared.

use std::sync::Arc;

use crate::config::ValidatedConfig;
use crate::features::cancellation::Checkpoint;
use crate::features::contracts::ContractValidator;
use crate::features::effect_evaluation::EffectEvaluator;
use crate::features::flow_facts::{FlatTypeLattice, TypeLattice};

#[derive(Clone)]
pub struct AnalysisContext {
    config: Arc<ValidatedConfig>,
    checkpoint: Checkpoint,
    lattice: Arc<dyn TypeLattice>,
}

impl AnalysisContext {
    /// Context seeded with the process-wide cancellation policy and a flat
    /// type lattice
    pub fn new(config: ValidatedConfig) -> Self {
        Self {
            config: Arc::new(config),
            checkpoint: Checkpoint::installed(),
            lattice: Arc::new(FlatTypeLattice),
        }
    }

    pub fn with_checkpoint(mut self, checkpoint: Checkpoint) -> Self {
        self.checkpoint = checkpoint;
        self
    }

    pub fn with_lattice(mut self, lattice: Arc<dyn TypeLattice>) -> Self {
        self.lattice = lattice;
        self
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }

    pub fn lattice(&self) -> &dyn TypeLattice {
        self.lattice.as_ref()
    }

    pub fn validator(&self) -> ContractValidator<'_> {
        ContractValidator::new(&self.checkpoint, self.config.validation())
    }

    pub fn evaluator(&self) -> EffectEvaluator<'_> {
        EffectEvaluator::new(&self.checkpoint, self.lattice.as_ref(), self.config.evaluation())
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new(ValidatedConfig::default())
    }
}

impl std::fmt::Debug for AnalysisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisContext")
            .field("config", &self.config)
            .field("checkpoint", &self.checkpoint.policy_name())
            .finish_non_exhaustive()
    }
}
