//! Solver pipeline: rank, plan, construct, refine, evaluate.

use coverforge_config::{EnvironmentMode, SolverConfig};
use coverforge_core::{Assignment, CoverForgeError, CoverageIndex, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::analysis::FeasibilityAnalysis;
use crate::director::AllocationDirector;
use crate::evaluator::{Evaluation, SolutionEvaluator};
use crate::phase::{GreedyAssigner, LocalSearchRefiner, Phase};
use crate::quota::{QuotaPlan, QuotaPlanner, TierSplit};
use crate::ranker::{EfficiencyRanker, TargetBand};
use crate::scope::SolverScope;
use crate::stats::SolverStats;
use crate::termination::TerminationReason;

/// Everything a solve produces.
///
/// The assignment is always complete, even when the evaluation flags it
/// invalid.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub assignment: Assignment,
    pub evaluation: Evaluation,
    pub split: TierSplit,
    pub targets: Vec<usize>,
    /// The requested budget was infeasible and the split was clamped.
    pub quota_relaxed: bool,
    /// `None` when refinement never ran (no agents).
    pub termination: Option<TerminationReason>,
    pub stats: SolverStats,
    pub analysis: FeasibilityAnalysis,
    /// Seed actually used for shuffling, if any.
    pub seed: Option<u64>,
}

impl SolveResult {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.evaluation.valid
    }

    /// Output rows in external identifiers, `-1` for empty slots.
    pub fn rows(&self, index: &CoverageIndex) -> Vec<Vec<i64>> {
        self.assignment.to_rows(index)
    }
}

/// Runs the full allocation pipeline for one configuration.
///
/// # Examples
///
/// ```
/// use coverforge_config::{ProblemConfig, SolverConfig};
/// use coverforge_core::CoverageIndex;
/// use coverforge_solver::Solver;
///
/// let index = CoverageIndex::build(vec![vec![7], vec![7]], None);
/// let config = SolverConfig::new().with_problem(ProblemConfig {
///     agent_count: 1,
///     capacity: 1,
///     window: 1,
///     idle_budget: 0,
///     ..ProblemConfig::default()
/// });
///
/// let result = Solver::new(config).unwrap().solve(&index).unwrap();
/// assert!(result.is_valid());
/// assert_eq!(result.rows(&index), vec![vec![7]]);
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Validates the configuration up front.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|err| CoverForgeError::Config(err.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn resolve_seed(&self) -> Option<u64> {
        match (self.config.random_seed, self.config.environment_mode) {
            (Some(seed), _) => Some(seed),
            (None, EnvironmentMode::NonReproducible) => Some(rand::random()),
            (None, _) => None,
        }
    }

    pub fn solve(&self, index: &CoverageIndex) -> Result<SolveResult> {
        let problem = &self.config.problem;
        let analysis = FeasibilityAnalysis::analyze(index, problem);

        info!(
            event = "solve_start",
            agent_count = problem.agent_count as u64,
            resource_count = index.resource_count() as u64,
            period_count = index.period_count() as u64,
            capacity = problem.capacity as u64,
            window = analysis.window_len as u64,
            idle_budget = problem.idle_budget,
            idle_lower_bound = analysis.idle_lower_bound,
        );
        if index.dropped_count() > 0 {
            warn!(
                event = "ids_dropped",
                dropped = index.dropped_count() as u64,
            );
        }
        if !analysis.window_coverable() {
            warn!(
                event = "window_scarce",
                window_resources = analysis.window_resource_count as u64,
                agents = problem.agent_count as u64,
            );
        }

        let plan = QuotaPlanner::new(
            problem.agent_count,
            index.period_count(),
            problem.capacity,
            problem.idle_budget,
        )
        .plan();
        let quota_relaxed = !plan.is_feasible();
        if let QuotaPlan::Infeasible { required, max } = plan {
            warn!(event = "quota_infeasible", required = required, max = max);
        }
        let split = plan.relaxed(problem.agent_count);
        let targets = split.targets();
        info!(event = "quota", split = %split);

        let seed = self.resolve_seed();
        let mut rng = seed.map(ChaCha8Rng::seed_from_u64);

        let director =
            AllocationDirector::new(index, problem.agent_count, problem.capacity, problem.window);
        let ranker = EfficiencyRanker::new(
            self.config.ranking.clone(),
            director.window_len(),
            TargetBand::from(&split),
        );
        let ranking = match rng.as_mut() {
            Some(rng) if self.config.ranking.shuffle_ties => ranker.rank_shuffled(index, rng),
            _ => ranker.rank(index),
        };

        let mut scope = SolverScope::new(director, ranking, targets.clone(), problem.idle_budget)
            .with_rng(rng)
            .with_environment_mode(self.config.environment_mode);
        scope.start_solving();

        let mut construction = GreedyAssigner::new(self.config.construction.scan_limit);
        construction.solve(&mut scope)?;
        if problem.agent_count > 0 {
            let mut local_search = LocalSearchRefiner::new(self.config.local_search.clone());
            local_search.solve(&mut scope)?;
        }

        let (director, stats, termination) = scope.into_parts();
        let evaluator = SolutionEvaluator::new(problem.window, problem.idle_budget);
        let evaluation = evaluator.evaluate_director(&director, &targets);

        if self.config.environment_mode == EnvironmentMode::FullAssert {
            let full = evaluator.evaluate(index, director.assignment(), &targets);
            if full != evaluation {
                return Err(CoverForgeError::Internal(format!(
                    "incremental evaluation {} differs from full recomputation {}",
                    evaluation.score, full.score
                )));
            }
        }

        for violation in &evaluation.violations {
            warn!(event = "violation", detail = %violation);
        }
        info!(
            event = "solve_end",
            score = %evaluation.score,
            feasible = evaluation.valid,
            idle_total = evaluation.idle_total,
            rounds = stats.round_count,
            moves_evaluated = stats.moves_evaluated,
            moves_accepted = stats.moves_accepted,
            duration_ms = stats.elapsed().as_millis() as u64,
        );

        Ok(SolveResult {
            assignment: director.into_assignment(),
            evaluation,
            split,
            targets,
            quota_relaxed,
            termination,
            stats,
            analysis,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverforge_config::ProblemConfig;

    fn config(agents: usize, capacity: usize, window: usize, budget: u64) -> SolverConfig {
        SolverConfig::new()
            .with_environment_mode(EnvironmentMode::FullAssert)
            .with_problem(ProblemConfig {
                agent_count: agents,
                capacity,
                window,
                idle_budget: budget,
                ..ProblemConfig::default()
            })
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Solver::new(config(1, 0, 1, 0));
        assert!(matches!(result, Err(CoverForgeError::Config(_))));
    }

    #[test]
    fn test_scarce_window_is_reported_not_fatal() {
        let index = CoverageIndex::build(vec![vec![0]], None);
        let result = Solver::new(config(3, 1, 1, 2)).unwrap().solve(&index).unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.evaluation.window_violations, 2);
        assert_eq!(result.rows(&index).len(), 3);
    }

    #[test]
    fn test_infeasible_budget_relaxed() {
        let index = CoverageIndex::build(vec![vec![1], vec![1]], None);
        let result = Solver::new(config(1, 1, 1, 10)).unwrap().solve(&index).unwrap();
        assert!(result.quota_relaxed);
        assert_eq!(result.targets, vec![0]);
        // the window pre-pass still covers the agent
        assert_eq!(result.evaluation.window_violations, 0);
        assert!(result.is_valid());
    }

    #[test]
    fn test_huge_budget_is_relaxed_not_fatal() {
        let index = CoverageIndex::build(vec![vec![1], vec![1]], None);
        for budget in [1u64 << 63, u64::MAX] {
            let result = Solver::new(config(1, 1, 1, budget)).unwrap().solve(&index).unwrap();
            assert!(result.quota_relaxed);
            assert!(!result.analysis.budget_reachable());
            assert!(result.is_valid());
        }
    }

    #[test]
    fn test_no_agents() {
        let index = CoverageIndex::build(vec![vec![1]], None);
        let result = Solver::new(config(0, 1, 1, 0)).unwrap().solve(&index).unwrap();
        assert!(result.assignment.to_rows(&index).is_empty());
        assert_eq!(result.termination, None);
        assert!(result.is_valid());
    }

    #[test]
    fn test_empty_index() {
        let index = CoverageIndex::build(Vec::<Vec<i64>>::new(), None);
        let result = Solver::new(config(2, 2, 14, 0)).unwrap().solve(&index).unwrap();
        assert_eq!(result.rows(&index), vec![vec![-1, -1], vec![-1, -1]]);
        assert_eq!(result.evaluation.idle_total, 0);
        assert_eq!(result.termination, Some(TerminationReason::BudgetReached));
    }

    #[test]
    fn test_non_reproducible_draws_seed() {
        let index = CoverageIndex::build(vec![vec![1]], None);
        let config = config(1, 1, 1, 0).with_environment_mode(EnvironmentMode::NonReproducible);
        let result = Solver::new(config).unwrap().solve(&index).unwrap();
        assert!(result.seed.is_some());
    }
}
