//! Allocation engine for coverforge
//!
//! This crate provides the solving pipeline:
//! - Resource ranking (EfficiencyRanker)
//! - Per-agent targets from the idle budget (QuotaPlanner)
//! - Greedy construction (GreedyAssigner)
//! - Hill-climbing repair (LocalSearchRefiner)
//! - Constraint validation (SolutionEvaluator)
//! - Feasibility analysis and solver statistics

pub mod analysis;
pub mod director;
pub mod evaluator;
pub mod moves;
pub mod phase;
pub mod quota;
pub mod ranker;
pub mod scope;
pub mod solver;
pub mod stats;
pub mod termination;

pub use analysis::FeasibilityAnalysis;
pub use director::AllocationDirector;
pub use evaluator::{AgentReport, Evaluation, SolutionEvaluator, Violation};
pub use moves::{AllocationMove, MoveKind};
pub use phase::{GreedyAssigner, LocalSearchRefiner, Phase};
pub use quota::{QuotaPlan, QuotaPlanner, TierSplit};
pub use ranker::{EfficiencyRanker, RankedResource, Ranking, TargetBand};
pub use scope::SolverScope;
pub use solver::{SolveResult, Solver};
pub use stats::{PhaseStats, SolverStats};
pub use termination::{
    BudgetReachedTermination, RoundLimitTermination, Termination, TerminationReason,
};
