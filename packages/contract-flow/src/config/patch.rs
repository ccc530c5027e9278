//! Patch types
//!
//! All-optional mirrors of the stage configs. Used by the YAML `overrides`
//! section and as a closure-free alternative to the builder.

use serde::{Deserialize, Serialize};

use super::analysis_config::AnalysisConfig;
use super::stage_configs::{EvaluationConfig, ParallelConfig, ValidationConfig};

/// Patch type for ValidationConfig
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_warnings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_contradictions: Option<bool>,
}

impl ValidationConfigPatch {
    pub fn apply_to(&self, mut base: ValidationConfig) -> ValidationConfig {
        if let Some(v) = self.report_warnings {
            base.report_warnings = v;
        }
        if let Some(v) = self.detect_contradictions {
            base.detect_contradictions = v;
        }
        base
    }
}

/// Patch type for EvaluationConfig
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze_in_place_lambdas: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fixpoint_iterations: Option<u32>,
}

impl EvaluationConfigPatch {
    pub fn apply_to(&self, mut base: EvaluationConfig) -> EvaluationConfig {
        if let Some(v) = self.analyze_in_place_lambdas {
            base.analyze_in_place_lambdas = v;
        }
        if let Some(v) = self.max_fixpoint_iterations {
            base.max_fixpoint_iterations = v;
        }
        base
    }
}

/// Patch type for ParallelConfig
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<usize>,
}

impl ParallelConfigPatch {
    pub fn apply_to(&self, mut base: ParallelConfig) -> ParallelConfig {
        if let Some(v) = self.enabled {
            base.enabled = v;
        }
        if let Some(v) = self.num_workers {
            base.num_workers = v;
        }
        base
    }
}

impl AnalysisConfig {
    /// Apply validation patch (alternative to the closure builder)
    pub fn validation_patch(self, patch: &ValidationConfigPatch) -> Self {
        self.validation(|base| patch.apply_to(base))
    }

    /// Apply evaluation patch
    pub fn evaluation_patch(self, patch: &EvaluationConfigPatch) -> Self {
        self.evaluation(|base| patch.apply_to(base))
    }

    /// Apply parallel patch
    pub fn parallel_patch(self, patch: &ParallelConfigPatch) -> Self {
        self.parallel(|base| patch.apply_to(base))
    }
}
