//! Tests for solver configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "full_assert"
        random_seed = 42

        [problem]
        agent_count = 12
        capacity = 3
        window = 7
        idle_budget = 20
        expected_period_count = 22
        max_resource_id = 1620

        [ranking]
        window_only = true
        continuity_weight = 0.5

        [construction]
        scan_limit = 2

        [local_search]
        round_limit = 80
        transfer_moves = false
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.problem.agent_count, 12);
    assert_eq!(config.problem.expected_period_count, Some(22));
    assert_eq!(config.problem.max_resource_id, Some(1620));
    assert!(config.ranking.window_only);
    assert_eq!(config.ranking.continuity_weight, 0.5);
    assert_eq!(config.ranking.near_band_bonus, 50.0);
    assert_eq!(config.construction.scan_limit, Some(2));
    assert_eq!(config.local_search.round_limit, 80);
    assert!(!config.local_search.transfer_moves);
    assert_eq!(config.local_search.overshoot_tolerance, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: reproducible
        random_seed: 42
        problem:
          agent_count: 3
          capacity: 1
          window: 1
          idle_budget: 0
        local_search:
          shuffle_candidates: true
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.problem.capacity, 1);
    assert!(config.local_search.shuffle_candidates);
    assert_eq!(config.local_search.round_limit, 50);
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = SolverConfig::from_toml_str("").unwrap();
    assert_eq!(config.problem, ProblemConfig::default());
    assert_eq!(config.problem.agent_count, 336);
    assert_eq!(config.problem.window, 14);
    assert_eq!(config.problem.idle_budget, 410);
    assert_eq!(config.random_seed, None);
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_round_limit(10)
        .with_environment_mode(EnvironmentMode::NonReproducible)
        .with_problem(ProblemConfig {
            agent_count: 2,
            ..ProblemConfig::default()
        });

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.local_search.round_limit, 10);
    assert_eq!(config.problem.agent_count, 2);
    assert_eq!(config.problem.capacity, 5);
}

#[test]
fn test_validate_rejects_zero_capacity() {
    let config = SolverConfig::new().with_problem(ProblemConfig {
        capacity: 0,
        ..ProblemConfig::default()
    });
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_negative_weight() {
    let mut config = SolverConfig::new();
    config.ranking.full_window_bonus = -1.0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = SolverConfig::new().with_round_limit(0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_unknown_mode_is_parse_error() {
    let result = SolverConfig::from_toml_str(r#"environment_mode = "turbo""#);
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let result = SolverConfig::load("does/not/exist.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
