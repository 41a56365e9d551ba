//! Greedy construction phase.

use coverforge_core::{AgentId, ResourceIdx, Result};
use tracing::{debug, info};

use crate::moves::AllocationMove;
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::stats::PhaseStats;

/// Builds the initial assignment one agent at a time, in tier order.
///
/// For each agent:
/// 1. a pre-pass takes the best-ranked unused resource that covers the
///    mandatory window, if the agent lacks window coverage;
/// 2. up to `scan_limit` passes over the ranking accept any unused resource
///    whose marginal gain is positive and keeps the active count at or
///    below the agent's target.
///
/// The agent's turn ends when it reaches its target exactly, runs out of
/// capacity, or a pass accepts nothing. Earlier rank always wins.
#[derive(Debug, Clone, Default)]
pub struct GreedyAssigner {
    scan_limit: Option<usize>,
}

impl GreedyAssigner {
    /// `scan_limit` defaults to the agent capacity.
    pub fn new(scan_limit: Option<usize>) -> Self {
        Self { scan_limit }
    }

    fn window_pre_pass(
        scope: &mut SolverScope<'_>,
        agent: AgentId,
        order: &[ResourceIdx],
        stats: &mut PhaseStats,
    ) -> Result<bool> {
        let director = scope.director();
        if director.window_satisfied(agent) || !director.assignment().has_spare_capacity(agent) {
            return Ok(false);
        }
        let candidate = order
            .iter()
            .copied()
            .find(|&r| !director.assignment().is_assigned(r) && director.covers_window(r));

        match candidate {
            Some(resource) => {
                let applied = scope.apply(AllocationMove::Assign { resource, agent })?;
                stats.record_move(applied);
                Ok(applied)
            }
            None => Ok(false),
        }
    }

    fn scan_pass(
        scope: &mut SolverScope<'_>,
        agent: AgentId,
        order: &[ResourceIdx],
        stats: &mut PhaseStats,
    ) -> Result<usize> {
        let target = scope.target(agent);
        let mut accepted = 0;

        for &resource in order {
            let director = scope.director();
            let active = director.active_count(agent);
            if active >= target || !director.assignment().has_spare_capacity(agent) {
                break;
            }
            if director.assignment().is_assigned(resource) {
                continue;
            }
            let gain = director.marginal_gain(agent, resource);
            if gain == 0 || active + gain > target {
                continue;
            }
            let applied = scope.apply(AllocationMove::Assign { resource, agent })?;
            stats.record_move(applied);
            if applied {
                accepted += 1;
            }
        }
        Ok(accepted)
    }
}

impl Phase for GreedyAssigner {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) -> Result<()> {
        let mut stats = PhaseStats::new(0, "Construction Heuristic");
        let order: Vec<ResourceIdx> = solver_scope.ranking().resources().collect();
        let agent_count = solver_scope.director().agent_count();
        let capacity = solver_scope.director().assignment().capacity();
        let passes = self.scan_limit.unwrap_or(capacity).max(1);

        info!(
            event = "phase_start",
            phase = "Construction Heuristic",
            phase_index = 0u64,
        );

        for agent in 0..agent_count {
            Self::window_pre_pass(solver_scope, agent, &order, &mut stats)?;

            // Without window coverage here, no unused window resource is
            // left; the agent still fills toward its target.
            for _ in 0..passes {
                if Self::scan_pass(solver_scope, agent, &order, &mut stats)? == 0 {
                    break;
                }
            }

            let director = solver_scope.director();
            debug!(
                event = "agent_built",
                agent = agent as u64,
                target = solver_scope.target(agent) as u64,
                active = director.active_count(agent) as u64,
                held = director.assignment().held_count(agent) as u64,
                window = director.window_satisfied(agent),
            );
            stats.record_step();
            solver_scope.stats_mut().record_step();
        }

        let score = solver_scope.score();
        info!(
            event = "phase_end",
            phase = "Construction Heuristic",
            phase_index = 0u64,
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
        "GreedyConstruction"
    }
}
