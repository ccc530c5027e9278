//! Configuration System
//!
//! 3-tier configuration:
//! - Level 1: Preset - one-liner
//! - Level 2: Stage Override - closure or Patch per stage
//! - Level 3: YAML v1 file
//!
//! # Examples
//!
//! ```rust,ignore
//! use contract_flow::config::{AnalysisConfig, Preset};
//!
//! let config = AnalysisConfig::preset(Preset::Fast).build()?;
//!
//! let config = AnalysisConfig::preset(Preset::Balanced)
//!     .validation(|c| c.report_warnings(false))
//!     .build()?;
//!
//! let config = AnalysisConfig::from_yaml("contract-flow.yaml")?;
//! ```

pub mod analysis_config;
pub mod error;
pub mod io;
pub mod patch;
pub mod preset;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use analysis_config::{AnalysisConfig, ValidatedConfig};
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, ConfigOverrides};
pub use patch::{EvaluationConfigPatch, ParallelConfigPatch, ValidationConfigPatch};
pub use preset::Preset;
pub use stage_configs::{EvaluationConfig, ParallelConfig, ValidationConfig};
pub use validation::Validatable;
