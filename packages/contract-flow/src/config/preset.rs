//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Batch/CI: errors only, short lambda fixpoints
    ///
    /// - Validation: warnings off, contradictions on
    /// - Evaluation: max_fixpoint_iterations=4
    Fast,

    /// IDE: default
    ///
    /// - Validation: warnings on, contradictions on
    /// - Evaluation: max_fixpoint_iterations=16
    Balanced,

    /// Audit: everything on, long fixpoints
    ///
    /// - Validation: warnings on, contradictions on
    /// - Evaluation: max_fixpoint_iterations=64
    Thorough,
}

impl Preset {
    /// Parse preset from string (case-insensitive)
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
