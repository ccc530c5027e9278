//! Property-based tests for the configuration tier
//!
//! - Validity: every in-range stage config validates
//! - Rejection: every out-of-range value is a `ConfigError::Range`
//! - Roundtrip: from_yaml_str(to_yaml(x)) == x
//! - Builder order: the last override of a field wins

use std::io::Write;

use contract_flow::config::*;
use proptest::prelude::*;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use tempfile::NamedTempFile;

fn preset_from(idx: u8) -> Preset {
    match idx % 3 {
        0 => Preset::Fast,
        1 => Preset::Balanced,
        _ => Preset::Thorough,
    }
}

// ============================================================================
// QuickCheck Tests
// ============================================================================

#[quickcheck]
fn qc_fixpoint_limit_range(limit: u32) -> bool {
    let config = EvaluationConfig::default().max_fixpoint_iterations(limit);
    let in_range = (1..=EvaluationConfig::MAX_FIXPOINT_ITERATIONS).contains(&limit);
    config.validate().is_ok() == in_range
}

#[quickcheck]
fn qc_worker_count_range(workers: usize) -> bool {
    let config = ParallelConfig::default().num_workers(workers);
    let in_range = workers <= ParallelConfig::MAX_WORKERS;
    config.validate().is_ok() == in_range
}

#[quickcheck]
fn qc_preset_yaml_roundtrip(preset_idx: u8) -> TestResult {
    let config = match AnalysisConfig::preset(preset_from(preset_idx)).build() {
        Ok(config) => config,
        Err(_) => return TestResult::failed(),
    };
    let yaml = match config.to_yaml() {
        Ok(yaml) => yaml,
        Err(_) => return TestResult::failed(),
    };
    TestResult::from_bool(AnalysisConfig::from_yaml_str(&yaml).ok() == Some(config))
}

#[quickcheck]
fn qc_builder_last_write_wins(first: bool, second: bool) -> bool {
    let config = AnalysisConfig::preset(Preset::Balanced)
        .validation(|c| c.report_warnings(first))
        .validation(|c| c.report_warnings(second))
        .build();
    matches!(config, Ok(c) if c.validation().report_warnings == second)
}

// ============================================================================
// Proptest Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_valid_overrides_roundtrip_through_file(
        preset_idx in 0u8..3,
        limit in 1u32..=EvaluationConfig::MAX_FIXPOINT_ITERATIONS,
        workers in 0usize..=64,
        lambdas in any::<bool>(),
        warnings in any::<bool>(),
    ) {
        let config = AnalysisConfig::preset(preset_from(preset_idx))
            .validation(|c| c.report_warnings(warnings))
            .evaluation(|c| c.max_fixpoint_iterations(limit).analyze_in_place_lambdas(lambdas))
            .parallel(|c| c.num_workers(workers))
            .build()
            .unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

        let reloaded = AnalysisConfig::from_yaml(file.path()).unwrap();
        prop_assert_eq!(reloaded, config);
    }

    #[test]
    fn prop_out_of_range_limit_rejected(limit in (EvaluationConfig::MAX_FIXPOINT_ITERATIONS + 1)..u32::MAX) {
        let result = AnalysisConfig::preset(Preset::Fast)
            .evaluation(|c| c.max_fixpoint_iterations(limit))
            .build();
        let is_range_error = matches!(result, Err(ConfigError::Range { .. }));
        prop_assert!(is_range_error);
    }

    #[test]
    fn prop_presets_are_ordered_by_effort(idx in 0u8..3) {
        let preset = preset_from(idx);
        let fast = EvaluationConfig::from_preset(Preset::Fast).max_fixpoint_iterations;
        let thorough = EvaluationConfig::from_preset(Preset::Thorough).max_fixpoint_iterations;
        let limit = EvaluationConfig::from_preset(preset).max_fixpoint_iterations;
        prop_assert!(fast <= limit && limit <= thorough);
    }
}
