//! Candidate move search for the refiner.
//!
//! Every finder returns the first improving move in a fixed scan order, or
//! `None`. Finders only read the director; applying is the caller's job.

use coverforge_core::{AgentId, PeriodSet, ResourceIdx};

use crate::moves::AllocationMove;
use crate::scope::SolverScope;
use crate::stats::PhaseStats;

/// Best-ranked unused resource covering the window, for an agent that has
/// no window coverage yet.
pub(crate) fn window_repair(
    scope: &SolverScope<'_>,
    agent: AgentId,
    order: &[ResourceIdx],
    stats: &mut PhaseStats,
) -> Option<AllocationMove> {
    let director = scope.director();
    if director.window_satisfied(agent) || !director.assignment().has_spare_capacity(agent) {
        return None;
    }
    let resource = order
        .iter()
        .copied()
        .find(|&r| !director.assignment().is_assigned(r) && director.covers_window(r))?;
    stats.record_evaluation();
    Some(AllocationMove::Assign { resource, agent })
}

/// Best-ranked unused resource with positive gain that keeps the agent at
/// most `tolerance` periods above its target.
pub(crate) fn top_up(
    scope: &SolverScope<'_>,
    agent: AgentId,
    order: &[ResourceIdx],
    tolerance: usize,
    stats: &mut PhaseStats,
) -> Option<AllocationMove> {
    let director = scope.director();
    if scope.deficit(agent) <= 0 || !director.assignment().has_spare_capacity(agent) {
        return None;
    }
    let active = director.active_count(agent);
    let ceiling = scope.target(agent) + tolerance;

    for &resource in order {
        if director.assignment().is_assigned(resource) {
            continue;
        }
        stats.record_evaluation();
        let gain = director.marginal_gain(agent, resource);
        if gain > 0 && active + gain <= ceiling {
            return Some(AllocationMove::Assign { resource, agent });
        }
    }
    None
}

/// A held resource of an over-target donor that the under-target receiver
/// can take.
///
/// Accepted when the pair's absolute deficit sum strictly drops, the pair's
/// total active count does not drop, and a donor with window coverage keeps
/// it.
pub(crate) fn transfer(
    scope: &SolverScope<'_>,
    receiver: AgentId,
    agents: &[AgentId],
    stats: &mut PhaseStats,
) -> Option<AllocationMove> {
    let director = scope.director();
    if scope.deficit(receiver) <= 0 || !director.assignment().has_spare_capacity(receiver) {
        return None;
    }
    let receiver_active = director.active_count(receiver);
    let receiver_target = scope.target(receiver);

    for &donor in agents {
        if donor == receiver || scope.deficit(donor) >= 0 {
            continue;
        }
        let donor_active = director.active_count(donor);
        let donor_target = scope.target(donor);
        let donor_window = director.window_satisfied(donor);
        let before = scope.deficit(receiver).unsigned_abs() + scope.deficit(donor).unsigned_abs();

        for resource in director.assignment().held(donor) {
            stats.record_evaluation();
            let remaining = director.active_without(donor, resource);
            if donor_window && !director.reaches_window(&remaining) {
                continue;
            }
            let receiver_after = receiver_active + director.marginal_gain(receiver, resource);
            let donor_after = remaining.len();
            if receiver_after + donor_after < receiver_active + donor_active {
                continue;
            }
            let after = receiver_target.abs_diff(receiver_after) as u64
                + donor_target.abs_diff(donor_after) as u64;
            if after < before {
                return Some(AllocationMove::Transfer {
                    resource,
                    to: receiver,
                });
            }
        }
    }
    None
}

/// Each held resource of `agent` with the active set the agent would keep
/// without it.
pub(crate) fn release_previews(
    scope: &SolverScope<'_>,
    agent: AgentId,
) -> Vec<(ResourceIdx, PeriodSet)> {
    let director = scope.director();
    director
        .assignment()
        .held(agent)
        .map(|resource| (resource, director.active_without(agent, resource)))
        .collect()
}

/// An exchange of one held resource each between `a` and `b`.
///
/// Accepted when the pair's absolute deficit sum strictly drops, the pair's
/// total active count does not drop, and neither agent loses window
/// coverage it had.
pub(crate) fn swap(
    scope: &SolverScope<'_>,
    a: AgentId,
    previews_a: &[(ResourceIdx, PeriodSet)],
    b: AgentId,
    previews_b: &[(ResourceIdx, PeriodSet)],
    stats: &mut PhaseStats,
) -> Option<AllocationMove> {
    let director = scope.director();
    let index = director.index();
    let (target_a, target_b) = (scope.target(a), scope.target(b));
    let active_total = director.active_count(a) + director.active_count(b);
    let before = scope.deficit(a).unsigned_abs() + scope.deficit(b).unsigned_abs();
    let (window_a, window_b) = (director.window_satisfied(a), director.window_satisfied(b));

    for (ra, without_a) in previews_a {
        let coverage_a = index.coverage(*ra);
        for (rb, without_b) in previews_b {
            stats.record_evaluation();
            let coverage_b = index.coverage(*rb);

            let after_a = without_a.union(coverage_b);
            if window_a && !director.reaches_window(&after_a) {
                continue;
            }
            let after_b = without_b.union(coverage_a);
            if window_b && !director.reaches_window(&after_b) {
                continue;
            }

            let (count_a, count_b) = (after_a.len(), after_b.len());
            if count_a + count_b < active_total {
                continue;
            }
            let after = target_a.abs_diff(count_a) as u64 + target_b.abs_diff(count_b) as u64;
            if after < before {
                return Some(AllocationMove::Swap { a: *ra, b: *rb });
            }
        }
    }
    None
}
