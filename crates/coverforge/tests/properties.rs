//! Invariants that must hold on any instance.

use std::collections::HashSet;

use coverforge::prelude::*;
use coverforge::{EnvironmentMode, LocalSearchConfig, PeriodSet, RankingConfig, ResourceId};
use coverforge_solver::{
    AllocationDirector, EfficiencyRanker, GreedyAssigner, LocalSearchRefiner, Phase,
    QuotaPlanner, SolutionEvaluator, SolverScope, TargetBand,
};
use coverforge_test::InstanceGenerator;

const PERIODS: usize = 22;
const AGENTS: usize = 40;
const CAPACITY: usize = 5;
const WINDOW: usize = 14;
const BUDGET: u64 = 200;

fn problem() -> ProblemConfig {
    ProblemConfig {
        agent_count: AGENTS,
        capacity: CAPACITY,
        window: WINDOW,
        idle_budget: BUDGET,
        ..ProblemConfig::default()
    }
}

fn instance(seed: u64) -> CoverageIndex {
    let periods = InstanceGenerator::new(PERIODS, 260)
        .with_runs(1, 9)
        .generate(seed);
    CoverageIndex::build(periods, None)
}

fn strict_config(seed: u64) -> SolverConfig {
    let mut config = SolverConfig::new()
        .with_problem(problem())
        .with_environment_mode(EnvironmentMode::FullAssert)
        .with_random_seed(seed);
    config.ranking.shuffle_ties = true;
    config.local_search.shuffle_candidates = true;
    config
}

#[test]
fn test_rows_are_exclusive_and_within_capacity() {
    for seed in 0..4 {
        let index = instance(seed);
        let result = coverforge::solve(&index, strict_config(seed)).unwrap();
        let rows = result.rows(&index);

        assert_eq!(rows.len(), AGENTS);
        let mut seen = HashSet::new();
        for row in &rows {
            assert_eq!(row.len(), CAPACITY);
            for &id in row.iter().filter(|&&id| id >= 0) {
                assert!(seen.insert(id), "resource {id} held twice (seed {seed})");
            }
        }
        assert_eq!(seen.len(), result.assignment.assigned_count());
    }
}

#[test]
fn test_idle_total_matches_independent_recount() {
    let index = instance(5);
    let result = coverforge::solve(&index, strict_config(5)).unwrap();

    let mut idle_total = 0u64;
    for row in result.rows(&index) {
        let mut active = PeriodSet::with_capacity(index.period_count());
        for id in row.into_iter().filter(|&id| id >= 0) {
            let idx = index.index_of(ResourceId(id as u32)).unwrap();
            active.union_with(index.coverage(idx));
        }
        idle_total += (index.period_count() - active.len()) as u64;
    }
    assert_eq!(idle_total, result.evaluation.idle_total);

    let full = SolutionEvaluator::new(WINDOW, BUDGET).evaluate(
        &index,
        &result.assignment,
        &result.targets,
    );
    assert_eq!(full, result.evaluation);
}

#[test]
fn test_refinement_keeps_window_and_never_adds_idle() {
    for seed in 10..14 {
        let index = instance(seed);
        let split = QuotaPlanner::new(AGENTS, index.period_count(), CAPACITY, BUDGET)
            .plan()
            .relaxed(AGENTS);

        let director = AllocationDirector::new(&index, AGENTS, CAPACITY, WINDOW);
        let ranking = EfficiencyRanker::new(
            RankingConfig::default(),
            director.window_len(),
            TargetBand::from(&split),
        )
        .rank(&index);
        let mut scope = SolverScope::new(director, ranking, split.targets(), BUDGET)
            .with_environment_mode(EnvironmentMode::FullAssert);
        scope.start_solving();

        GreedyAssigner::new(None).solve(&mut scope).unwrap();
        let windowed: Vec<usize> = (0..AGENTS)
            .filter(|&agent| scope.director().window_satisfied(agent))
            .collect();
        let idle_after_construction = scope.director().idle_total();

        LocalSearchRefiner::new(LocalSearchConfig::default())
            .solve(&mut scope)
            .unwrap();

        for agent in windowed {
            assert!(
                scope.director().window_satisfied(agent),
                "agent {agent} lost its window (seed {seed})"
            );
        }
        assert!(scope.director().idle_total() <= idle_after_construction);
        scope.director().verify().unwrap();
    }
}

#[test]
fn test_same_seed_same_assignment() {
    let index = instance(21);
    let first = coverforge::solve(&index, strict_config(99)).unwrap();
    let second = coverforge::solve(&index, strict_config(99)).unwrap();

    assert_eq!(first.rows(&index), second.rows(&index));
    assert_eq!(first.evaluation, second.evaluation);
}

#[test]
fn test_unseeded_runs_are_deterministic() {
    let index = instance(33);
    let config = SolverConfig::new().with_problem(problem());
    let first = coverforge::solve(&index, config.clone()).unwrap();
    let second = coverforge::solve(&index, config).unwrap();

    assert_eq!(first.seed, None);
    assert_eq!(first.rows(&index), second.rows(&index));
}

#[test]
fn test_round_limit_bounds_refinement() {
    let index = instance(8);
    let config = strict_config(8).with_round_limit(1);
    let result = coverforge::solve(&index, config).unwrap();

    assert!(result.stats.round_count <= 1);
    assert_eq!(result.rows(&index).len(), AGENTS);
}
