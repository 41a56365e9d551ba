//! Local search phase: bounded rounds of first-improvement repair.
//!
//! Each round visits agents in order (or a seeded shuffle of it) and tries,
//! in turn:
//! - **top-up**: window repair, then unused resources with positive gain
//!   that overshoot the target by at most the tolerance;
//! - **transfer**: a held resource moves from an over-target agent to an
//!   under-target one;
//! - **swap**: two off-target agents exchange one held resource each.
//!
//! No move lowers the affected agents' total active count, so the global
//! idle total never rises from one round to the next.

mod neighborhood;

use coverforge_config::LocalSearchConfig;
use coverforge_core::{AgentId, CoverForgeError, ResourceIdx, Result};
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::stats::PhaseStats;
use crate::termination::{
    first_fired, BudgetReachedTermination, RoundLimitTermination, Termination, TerminationReason,
};

/// Hill-climbing refiner over the working assignment.
#[derive(Debug, Clone)]
pub struct LocalSearchRefiner {
    config: LocalSearchConfig,
    budget: BudgetReachedTermination,
    round_limit: RoundLimitTermination,
}

impl LocalSearchRefiner {
    pub fn new(config: LocalSearchConfig) -> Self {
        let round_limit = RoundLimitTermination::new(u64::from(config.round_limit));
        Self {
            config,
            budget: BudgetReachedTermination,
            round_limit,
        }
    }

    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    fn agent_order(&self, scope: &mut SolverScope<'_>) -> Vec<AgentId> {
        let mut agents: Vec<AgentId> = (0..scope.director().agent_count()).collect();
        if self.config.shuffle_candidates {
            if let Some(rng) = scope.rng() {
                agents.shuffle(rng);
            }
        }
        agents
    }

    /// Runs one round; returns the number of applied moves.
    fn run_round(
        &self,
        scope: &mut SolverScope<'_>,
        agents: &[AgentId],
        order: &[ResourceIdx],
        stats: &mut PhaseStats,
    ) -> Result<u64> {
        let mut moves = 0;

        for &agent in agents {
            loop {
                let next = match neighborhood::window_repair(scope, agent, order, stats) {
                    Some(mv) => Some(mv),
                    None => neighborhood::top_up(
                        scope,
                        agent,
                        order,
                        self.config.overshoot_tolerance,
                        stats,
                    ),
                };
                let Some(mv) = next else { break };
                if !scope.apply(mv)? {
                    break;
                }
                stats.record_accepted();
                moves += 1;
                if scope.budget_reached() {
                    return Ok(moves);
                }
            }
        }

        if self.config.transfer_moves {
            for &agent in agents {
                loop {
                    let Some(mv) = neighborhood::transfer(scope, agent, agents, stats) else {
                        break;
                    };
                    if !scope.apply(mv)? {
                        break;
                    }
                    stats.record_accepted();
                    moves += 1;
                    if scope.budget_reached() {
                        return Ok(moves);
                    }
                }
            }
        }

        for (i, &a) in agents.iter().enumerate() {
            if scope.deficit(a) == 0 {
                continue;
            }
            let mut previews_a = neighborhood::release_previews(scope, a);
            for &b in &agents[i + 1..] {
                if scope.deficit(b) == 0 {
                    continue;
                }
                let previews_b = neighborhood::release_previews(scope, b);
                let Some(mv) = neighborhood::swap(scope, a, &previews_a, b, &previews_b, stats)
                else {
                    continue;
                };
                if scope.apply(mv)? {
                    stats.record_accepted();
                    moves += 1;
                    if scope.budget_reached() {
                        return Ok(moves);
                    }
                    if scope.deficit(a) == 0 {
                        break;
                    }
                    previews_a = neighborhood::release_previews(scope, a);
                }
            }
        }

        Ok(moves)
    }
}

impl Phase for LocalSearchRefiner {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) -> Result<()> {
        let mut stats = PhaseStats::new(1, "Local Search");
        let order: Vec<ResourceIdx> = solver_scope.ranking().resources().collect();

        info!(
            event = "phase_start",
            phase = "Local Search",
            phase_index = 1u64,
        );

        let terminations: [&dyn Termination; 2] = [&self.budget, &self.round_limit];
        let reason = loop {
            if let Some(reason) = first_fired(&terminations, solver_scope) {
                break reason;
            }

            let idle_before = solver_scope.director().idle_total();
            let agents = self.agent_order(solver_scope);
            let moves = self.run_round(solver_scope, &agents, &order, &mut stats)?;
            let idle_after = solver_scope.director().idle_total();

            if solver_scope.is_full_assert() && idle_after > idle_before {
                return Err(CoverForgeError::InvalidState(format!(
                    "idle total rose from {idle_before} to {idle_after} in round {}",
                    solver_scope.stats().round_count + 1
                )));
            }

            solver_scope.stats_mut().record_round();
            stats.record_step();
            info!(
                event = "round",
                round = solver_scope.stats().round_count,
                moves = moves,
                idle_total = idle_after,
                idle_budget = solver_scope.idle_budget(),
                deviation = solver_scope.total_deviation(),
            );

            if moves == 0 && !solver_scope.budget_reached() {
                break TerminationReason::LocalOptimum;
            }
        };

        solver_scope.set_termination(reason);
        debug!(event = "refine_stopped", reason = %reason);

        let score = solver_scope.score();
        info!(
            event = "phase_end",
            phase = "Local Search",
            phase_index = 1u64,
            duration_ms = stats.elapsed_ms(),
            steps = stats.step_count,
            speed = stats.moves_per_second(),
            acceptance_rate = stats.acceptance_rate_pct(),
            idle_total = solver_scope.director().idle_total(),
            score = %score,
        );
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}

#[cfg(test)]
mod tests;
