use super::*;
use crate::director::AllocationDirector;
use crate::ranker::{EfficiencyRanker, TargetBand};
use coverforge_config::{EnvironmentMode, RankingConfig};
use coverforge_core::{Assignment, CoverageIndex};

fn scope<'a>(
    index: &'a CoverageIndex,
    assignment: Assignment,
    window: usize,
    targets: Vec<usize>,
    budget: u64,
) -> SolverScope<'a> {
    let director = AllocationDirector::from_assignment(index, assignment, window);
    let ranker = EfficiencyRanker::new(
        RankingConfig::default(),
        director.window_len(),
        TargetBand::new(1, 2),
    );
    let ranking = ranker.rank(index);
    SolverScope::new(director, ranking, targets, budget)
        .with_environment_mode(EnvironmentMode::FullAssert)
}

fn refiner(round_limit: u32) -> LocalSearchRefiner {
    LocalSearchRefiner::new(LocalSearchConfig {
        round_limit,
        ..LocalSearchConfig::default()
    })
}

#[test]
fn test_top_up_reaches_budget() {
    let index = CoverageIndex::from_resources(4, vec![(0, vec![0]), (1, vec![1, 2]), (2, vec![3])]);
    let assignment = Assignment::new(1, index.resource_count(), 3);
    let mut scope = scope(&index, assignment, 1, vec![4], 0);

    refiner(50).solve(&mut scope).unwrap();

    assert_eq!(scope.director().idle_total(), 0);
    assert!(scope.director().window_satisfied(0));
    assert_eq!(scope.termination(), Some(TerminationReason::BudgetReached));
}

#[test]
fn test_round_limit_stops_refinement() {
    let index = CoverageIndex::from_resources(4, vec![(0, vec![0]), (1, vec![1, 2])]);
    let assignment = Assignment::new(1, index.resource_count(), 3);
    let mut scope = scope(&index, assignment, 1, vec![4], 0);

    refiner(1).solve(&mut scope).unwrap();

    assert_eq!(scope.director().idle_total(), 1);
    assert_eq!(scope.stats().round_count, 1);
    assert_eq!(scope.termination(), Some(TerminationReason::RoundLimit));
}

#[test]
fn test_transfer_then_swap() {
    // r0 {0}, r1 {0,1}, r2 {2,3}
    let index = CoverageIndex::from_resources(
        4,
        vec![(0, vec![0]), (1, vec![0, 1]), (2, vec![2, 3])],
    );
    let mut assignment = Assignment::new(2, index.resource_count(), 2);
    assignment.assign(0, 0).unwrap();
    assignment.assign(1, 1).unwrap();
    assignment.assign(2, 1).unwrap();
    let mut scope = scope(&index, assignment, 1, vec![4, 1], 2);

    refiner(50).solve(&mut scope).unwrap();

    let director = scope.director();
    assert_eq!(director.assignment().owner(2), Some(0));
    assert_eq!(director.assignment().owner(1), Some(0));
    assert_eq!(director.assignment().owner(0), Some(1));
    assert_eq!(director.active_count(0), 4);
    assert_eq!(director.active_count(1), 1);
    assert_eq!(scope.total_deviation(), 0);
    assert_eq!(director.idle_total(), 3);
    assert_eq!(scope.termination(), Some(TerminationReason::LocalOptimum));
    assert_eq!(scope.stats().accepted(crate::moves::MoveKind::Transfer), 1);
    assert_eq!(scope.stats().accepted(crate::moves::MoveKind::Swap), 1);
}

#[test]
fn test_swap_never_strips_window() {
    // a0 over target with the only window resource, a1 under target
    let index = CoverageIndex::from_resources(4, vec![(0, vec![0, 1, 2]), (1, vec![3])]);
    let mut assignment = Assignment::new(2, index.resource_count(), 1);
    assignment.assign(0, 0).unwrap();
    assignment.assign(1, 1).unwrap();
    let mut scope = scope(&index, assignment, 1, vec![1, 3], 0);

    refiner(50).solve(&mut scope).unwrap();

    assert_eq!(scope.director().assignment().owner(0), Some(0));
    assert!(scope.director().window_satisfied(0));
    assert_eq!(scope.termination(), Some(TerminationReason::LocalOptimum));
    assert_eq!(scope.stats().moves_accepted, 0);
}

#[test]
fn test_transfers_disabled() {
    let index = CoverageIndex::from_resources(
        4,
        vec![(0, vec![0]), (1, vec![0, 1]), (2, vec![2, 3])],
    );
    let mut assignment = Assignment::new(2, index.resource_count(), 2);
    assignment.assign(0, 0).unwrap();
    assignment.assign(1, 1).unwrap();
    assignment.assign(2, 1).unwrap();
    let mut scope = scope(&index, assignment, 1, vec![4, 1], 0);

    let mut refiner = LocalSearchRefiner::new(LocalSearchConfig {
        transfer_moves: false,
        ..LocalSearchConfig::default()
    });
    refiner.solve(&mut scope).unwrap();

    assert_eq!(scope.stats().accepted(crate::moves::MoveKind::Transfer), 0);
    // only r0 <-> r1 helps: a0 ends at 2 of 4, a1 at 3 of 1
    assert_eq!(scope.director().assignment().owner(1), Some(0));
    assert_eq!(scope.director().assignment().owner(0), Some(1));
    assert_eq!(scope.total_deviation(), 4);
    assert_eq!(scope.termination(), Some(TerminationReason::LocalOptimum));
}

#[test]
fn test_already_on_budget_runs_no_round() {
    let index = CoverageIndex::from_resources(2, vec![(0, vec![0, 1])]);
    let mut assignment = Assignment::new(1, index.resource_count(), 1);
    assignment.assign(0, 0).unwrap();
    let mut scope = scope(&index, assignment, 1, vec![2], 0);

    refiner(50).solve(&mut scope).unwrap();

    assert_eq!(scope.stats().round_count, 0);
    assert_eq!(scope.termination(), Some(TerminationReason::BudgetReached));
}

#[test]
fn test_stops_on_the_move_that_meets_budget() {
    // four single-period resources; the agent could reach all four
    let index = CoverageIndex::from_resources(
        4,
        vec![(0, vec![0]), (1, vec![1]), (2, vec![2]), (3, vec![3])],
    );
    let assignment = Assignment::new(1, index.resource_count(), 4);
    let mut scope = scope(&index, assignment, 1, vec![4], 2);

    refiner(50).solve(&mut scope).unwrap();

    assert_eq!(scope.director().idle_total(), 2);
    assert_eq!(scope.director().assignment().held_count(0), 2);
    assert!(scope.director().window_satisfied(0));
    assert_eq!(scope.stats().round_count, 1);
    assert_eq!(scope.termination(), Some(TerminationReason::BudgetReached));
}
