//! Configuration I/O (YAML loading)
//!
//! Defines YAML schema types. Loading/export methods live on
//! `AnalysisConfig`.

use serde::{Deserialize, Serialize};

use super::patch::{EvaluationConfigPatch, ParallelConfigPatch, ValidationConfigPatch};

/// Versions this build can read
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// preset: balanced
/// overrides:
///   evaluation:
///     max_fixpoint_iterations: 32
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset (default: balanced)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationConfigPatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationConfigPatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelConfigPatch>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::ConfigError;
    use crate::config::{AnalysisConfig, Preset};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = AnalysisConfig::preset(Preset::Balanced)
            .evaluation(|c| c.max_fixpoint_iterations(50))
            .build()
            .unwrap();

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: balanced"));
        assert!(yaml.contains("max_fixpoint_iterations: 50"));

        let reloaded = AnalysisConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_yaml_loading() {
        let file = write_yaml(
            r#"
version: 1
preset: fast
overrides:
  evaluation:
    max_fixpoint_iterations: 12
  parallel:
    num_workers: 2
"#,
        );

        let config = AnalysisConfig::from_yaml(file.path()).unwrap();
        assert_eq!(config.preset(), Preset::Fast);
        assert_eq!(config.evaluation().max_fixpoint_iterations, 12);
        assert_eq!(config.parallel().num_workers, 2);
        assert!(!config.validation().report_warnings);
    }

    #[test]
    fn test_yaml_missing_version() {
        let file = write_yaml("preset: fast\n");
        let result = AnalysisConfig::from_yaml(file.path());
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let file = write_yaml("version: 2\npreset: fast\n");
        let result = AnalysisConfig::from_yaml(file.path());
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let result = AnalysisConfig::from_yaml_str(
            "version: 1\noverrides:\n  evaluation:\n    max_iterations: 3\n",
        );
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_yaml_out_of_range_override() {
        let result = AnalysisConfig::from_yaml_str(
            "version: 1\noverrides:\n  evaluation:\n    max_fixpoint_iterations: 0\n",
        );
        assert!(matches!(result, Err(ConfigError::Range { .. })));
    }
}
