//! Per-stage configuration
//!
//! One struct per analysis stage. Each has preset defaults, chainable
//! setters for the closure builder, and range validation.

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;

// ============================================================================
// Contract validation
// ============================================================================

/// Contract validation stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Report WARNING diagnostics (duplicate clauses)
    pub report_warnings: bool,

    /// Reject clauses that contradict an earlier clause
    pub detect_contradictions: bool,
}

impl ValidationConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                report_warnings: false,
                detect_contradictions: true,
            },
            Preset::Balanced | Preset::Thorough => Self {
                report_warnings: true,
                detect_contradictions: true,
            },
        }
    }

    pub fn report_warnings(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn detect_contradictions(mut self, enabled: bool) -> Self {
        self.detect_contradictions = enabled;
        self
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for ValidationConfig {
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "validation"
    }
}

// ============================================================================
// Effect evaluation
// ============================================================================

/// Call-site effect evaluation stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Analyse `callsInPlace` lambda bodies (off: forget what they assign)
    pub analyze_in_place_lambdas: bool,

    /// Lambda/loop fixpoint limit before widening (1..=1000)
    pub max_fixpoint_iterations: u32,
}

impl EvaluationConfig {
    pub const MAX_FIXPOINT_ITERATIONS: u32 = 1000;

    pub fn from_preset(preset: Preset) -> Self {
        let max_fixpoint_iterations = match preset {
            Preset::Fast => 4,
            Preset::Balanced => 16,
            Preset::Thorough => 64,
        };
        Self {
            analyze_in_place_lambdas: true,
            max_fixpoint_iterations,
        }
    }

    pub fn analyze_in_place_lambdas(mut self, enabled: bool) -> Self {
        self.analyze_in_place_lambdas = enabled;
        self
    }

    pub fn max_fixpoint_iterations(mut self, limit: u32) -> Self {
        self.max_fixpoint_iterations = limit;
        self
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for EvaluationConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_fixpoint_iterations < 1
            || self.max_fixpoint_iterations > Self::MAX_FIXPOINT_ITERATIONS
        {
            return Err(ConfigError::range_with_hint(
                "max_fixpoint_iterations",
                self.max_fixpoint_iterations,
                1,
                Self::MAX_FIXPOINT_ITERATIONS,
                "Lambda fixpoint needs at least one iteration",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "evaluation"
    }
}

// ============================================================================
// Parallelism
// ============================================================================

/// File-level parallelism
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Analyse files on a rayon pool
    pub enabled: bool,

    /// Number of workers (0=auto, 1..=1024)
    pub num_workers: usize,
}

impl ParallelConfig {
    pub const MAX_WORKERS: usize = 1024;

    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            enabled: true,
            num_workers: 0, // Auto
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn num_workers(mut self, workers: usize) -> Self {
        self.num_workers = workers;
        self
    }

    /// Worker count with 0 resolved to the number of CPUs
    pub fn effective_workers(&self) -> usize {
        if self.num_workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.num_workers
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.num_workers > Self::MAX_WORKERS {
            return Err(ConfigError::range_with_hint(
                "num_workers",
                self.num_workers,
                0,
                Self::MAX_WORKERS,
                "Number of workers must be reasonable (0=auto)",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "parallel"
    }
}
