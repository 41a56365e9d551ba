//! Solver-level scope.

use coverforge_config::EnvironmentMode;
use coverforge_core::{AgentId, CoverForgeError, HardSoftScore, Result};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::director::AllocationDirector;
use crate::moves::AllocationMove;
use crate::ranker::Ranking;
use crate::stats::SolverStats;
use crate::termination::TerminationReason;

/// Everything a phase reads or mutates during one solve.
pub struct SolverScope<'a> {
    director: AllocationDirector<'a>,
    ranking: Ranking,
    targets: Vec<usize>,
    idle_budget: u64,
    rng: Option<ChaCha8Rng>,
    environment_mode: EnvironmentMode,
    stats: SolverStats,
    termination: Option<TerminationReason>,
}

impl<'a> SolverScope<'a> {
    /// `targets` holds one target active count per agent of the director.
    pub fn new(
        director: AllocationDirector<'a>,
        ranking: Ranking,
        targets: Vec<usize>,
        idle_budget: u64,
    ) -> Self {
        debug_assert_eq!(targets.len(), director.agent_count());
        Self {
            director,
            ranking,
            targets,
            idle_budget,
            rng: None,
            environment_mode: EnvironmentMode::default(),
            stats: SolverStats::default(),
            termination: None,
        }
    }

    pub fn with_rng(mut self, rng: Option<ChaCha8Rng>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn start_solving(&mut self) {
        self.stats.start();
        self.termination = None;
    }

    pub fn director(&self) -> &AllocationDirector<'a> {
        &self.director
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    #[inline]
    pub fn target(&self, agent: AgentId) -> usize {
        self.targets[agent]
    }

    /// `target - active`: positive below target, negative above.
    #[inline]
    pub fn deficit(&self, agent: AgentId) -> i64 {
        self.targets[agent] as i64 - self.director.active_count(agent) as i64
    }

    /// Σ |deficit| over all agents.
    pub fn total_deviation(&self) -> u64 {
        (0..self.director.agent_count())
            .map(|agent| self.deficit(agent).unsigned_abs())
            .sum()
    }

    /// Working score, from the incremental state.
    pub fn score(&self) -> HardSoftScore {
        let director = &self.director;
        let window_violations = (0..director.agent_count())
            .filter(|&agent| !director.window_satisfied(agent))
            .count() as i64;
        let excess = director.idle_total().saturating_sub(self.idle_budget) as i64;
        HardSoftScore::of(
            -(window_violations + excess),
            -(self.total_deviation() as i64),
        )
    }

    pub fn idle_budget(&self) -> u64 {
        self.idle_budget
    }

    /// The global idle total sits exactly on the budget.
    pub fn budget_reached(&self) -> bool {
        self.director.idle_total() == self.idle_budget
    }

    pub fn rng(&mut self) -> Option<&mut ChaCha8Rng> {
        self.rng.as_mut()
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn is_full_assert(&self) -> bool {
        self.environment_mode == EnvironmentMode::FullAssert
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SolverStats {
        &mut self.stats
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    pub fn set_termination(&mut self, reason: TerminationReason) {
        self.termination = Some(reason);
    }

    /// Applies a move through the director.
    ///
    /// Returns `Ok(false)` when the assignment rejects the move; that is an
    /// ordinary outcome and leaves the state untouched. In full-assert mode
    /// the incremental state is re-verified after every applied move.
    pub fn apply(&mut self, mv: AllocationMove) -> Result<bool> {
        let accepted = match mv.do_move(&mut self.director) {
            Ok(()) => true,
            Err(rejection) => {
                trace!(event = "move_rejected", %mv, reason = %rejection);
                false
            }
        };
        self.stats.record_move(mv.kind(), accepted);

        if accepted && self.is_full_assert() {
            self.director.verify().map_err(|err| match err {
                CoverForgeError::InvalidState(msg) => {
                    CoverForgeError::InvalidState(format!("after {mv}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(accepted)
    }

    /// Consumes the scope, returning the director and the statistics.
    pub fn into_parts(self) -> (AllocationDirector<'a>, SolverStats, Option<TerminationReason>) {
        (self.director, self.stats, self.termination)
    }
}

impl std::fmt::Debug for SolverScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("agents", &self.director.agent_count())
            .field("ranked", &self.ranking.len())
            .field("idle_total", &self.director.idle_total())
            .field("idle_budget", &self.idle_budget)
            .field("environment_mode", &self.environment_mode)
            .finish()
    }
}
