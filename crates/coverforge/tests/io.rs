//! Loader and writer against real files.

use std::fs;
use std::io::Write;

use coverforge::io::{load_index_from_path, load_periods_from_path, write_assignment_to_path};
use coverforge::prelude::*;
use coverforge::CoverForgeError;
use coverforge_test::{periods_to_text, InstanceGenerator};
use tempfile::{tempdir, NamedTempFile};

#[test]
fn test_generated_instance_survives_file_round_trip() {
    let periods = InstanceGenerator::new(8, 30).generate(3);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(periods_to_text(&periods).as_bytes()).unwrap();

    let loaded = load_periods_from_path(file.path(), None).unwrap();
    let expected: Vec<Vec<i64>> = periods.into_iter().filter(|p| !p.is_empty()).collect();
    assert_eq!(loaded, expected);
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempdir().unwrap();
    let err = load_periods_from_path(dir.path().join("absent.txt"), None).unwrap_err();
    assert!(matches!(err, CoverForgeError::Io(_)));
}

#[test]
fn test_solve_from_file_to_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("periods.txt");
    let output = dir.path().join("assignment.txt");
    fs::write(&input, "12 40 7000\nday two\n12 40\n40\n").unwrap();

    let problem = ProblemConfig {
        agent_count: 2,
        capacity: 3,
        window: 1,
        idle_budget: 3,
        expected_period_count: Some(22),
        max_resource_id: Some(1620),
    };
    let index = load_index_from_path(&input, &problem).unwrap();
    assert_eq!(index.period_count(), 3);
    assert_eq!(index.dropped_count(), 1);

    let result = coverforge::solve(&index, SolverConfig::new().with_problem(problem)).unwrap();
    write_assignment_to_path(&output, &result.rows(&index)).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let slots: Vec<i64> = line
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(slots.len(), 3);
    }
    assert!(written.contains("40"));
}
