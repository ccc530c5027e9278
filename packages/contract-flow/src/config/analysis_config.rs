//! Analysis configuration builder
//!
//! ```rust,ignore
//! // Level 1: preset
//! let config = AnalysisConfig::preset(Preset::Fast).build()?;
//!
//! // Level 2: override one stage
//! let config = AnalysisConfig::preset(Preset::Balanced)
//!     .evaluation(|c| c.max_fixpoint_iterations(32))
//!     .build()?;
//!
//! // Level 3: YAML
//! let config = AnalysisConfig::from_yaml("contract-flow.yaml")?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigFileV1, ConfigOverrides, SUPPORTED_VERSIONS};
use super::patch::{EvaluationConfigPatch, ParallelConfigPatch, ValidationConfigPatch};
use super::preset::Preset;
use super::stage_configs::{EvaluationConfig, ParallelConfig, ValidationConfig};
use super::validation::ValidatableCollection;

/// Configuration builder: a preset plus optional per-stage overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    preset: Preset,
    validation: Option<ValidationConfig>,
    evaluation: Option<EvaluationConfig>,
    parallel: Option<ParallelConfig>,
}

impl AnalysisConfig {
    /// Level 1: start from a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            validation: None,
            evaluation: None,
            parallel: None,
        }
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    /// Level 2: override contract validation
    pub fn validation<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ValidationConfig) -> ValidationConfig,
    {
        let base = self
            .validation
            .take()
            .unwrap_or_else(|| ValidationConfig::from_preset(self.preset));
        self.validation = Some(f(base));
        self
    }

    /// Level 2: override effect evaluation
    pub fn evaluation<F>(mut self, f: F) -> Self
    where
        F: FnOnce(EvaluationConfig) -> EvaluationConfig,
    {
        let base = self
            .evaluation
            .take()
            .unwrap_or_else(|| EvaluationConfig::from_preset(self.preset));
        self.evaluation = Some(f(base));
        self
    }

    /// Level 2: override parallelism
    pub fn parallel<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ParallelConfig) -> ParallelConfig,
    {
        let base = self
            .parallel
            .take()
            .unwrap_or_else(|| ParallelConfig::from_preset(self.preset));
        self.parallel = Some(f(base));
        self
    }

    /// Validate overrides and resolve every stage
    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        self.validation.validate_all()?;
        self.evaluation.validate_all()?;
        self.parallel.validate_all()?;

        let preset = self.preset;
        let config = ValidatedConfig {
            preset,
            validation: self
                .validation
                .unwrap_or_else(|| ValidationConfig::from_preset(preset)),
            evaluation: self
                .evaluation
                .unwrap_or_else(|| EvaluationConfig::from_preset(preset)),
            parallel: self
                .parallel
                .unwrap_or_else(|| ParallelConfig::from_preset(preset)),
        };
        tracing::debug!(preset = %preset, "analysis configuration built");
        Ok(config)
    }

    /// Level 3: load a YAML v1 file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<ValidatedConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Level 3: parse YAML v1 text
    pub fn from_yaml_str(content: &str) -> ConfigResult<ValidatedConfig> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match file.preset.as_deref() {
            Some(name) => Preset::from_str(name)?,
            None => Preset::default(),
        };

        let mut config = Self::preset(preset);
        if let Some(overrides) = file.overrides {
            if let Some(patch) = overrides.validation {
                config = config.validation_patch(&patch);
            }
            if let Some(patch) = overrides.evaluation {
                config = config.evaluation_patch(&patch);
            }
            if let Some(patch) = overrides.parallel {
                config = config.parallel_patch(&patch);
            }
        }
        config.build()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

/// Fully resolved, range-checked configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedConfig {
    preset: Preset,
    validation: ValidationConfig,
    evaluation: EvaluationConfig,
    parallel: ParallelConfig,
}

impl ValidatedConfig {
    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    pub fn evaluation(&self) -> &EvaluationConfig {
        &self.evaluation
    }

    pub fn parallel(&self) -> &ParallelConfig {
        &self.parallel
    }

    /// Export as YAML v1 (every field written out)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: Some(self.preset.to_string()),
            overrides: Some(ConfigOverrides {
                validation: Some(ValidationConfigPatch {
                    report_warnings: Some(self.validation.report_warnings),
                    detect_contradictions: Some(self.validation.detect_contradictions),
                }),
                evaluation: Some(EvaluationConfigPatch {
                    analyze_in_place_lambdas: Some(self.evaluation.analyze_in_place_lambdas),
                    max_fixpoint_iterations: Some(self.evaluation.max_fixpoint_iterations),
                }),
                parallel: Some(ParallelConfigPatch {
                    enabled: Some(self.parallel.enabled),
                    num_workers: Some(self.parallel.num_workers),
                }),
            }),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Human-readable one-line summary
    pub fn describe(&self) -> String {
        format!(
            "preset={} warnings={} contradictions={} lambdas={} fixpoint<={} parallel={}({} workers)",
            self.preset,
            self.validation.report_warnings,
            self.validation.detect_contradictions,
            self.evaluation.analyze_in_place_lambdas,
            self.evaluation.max_fixpoint_iterations,
            self.parallel.enabled,
            self.parallel.effective_workers(),
        )
    }
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        let preset = Preset::default();
        Self {
            preset,
            validation: ValidationConfig::from_preset(preset),
            evaluation: EvaluationConfig::from_preset(preset),
            parallel: ParallelConfig::from_preset(preset),
        }
    }
}
