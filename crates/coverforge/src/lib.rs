//! coverforge - Resource-to-Agent Allocation in Rust
//!
//! Assigns resources exclusively to agents so that every agent is active
//! inside a mandatory early window, holds at most a fixed number of
//! resources, and the global idle total stays within a budget. The engine
//! is a best-effort heuristic: it always returns a complete assignment and
//! reports violations instead of failing.
//!
//! # Example
//!
//! ```rust
//! use coverforge::prelude::*;
//!
//! let periods = coverforge::io::load_periods("5 6\n5\n6\n".as_bytes(), None).unwrap();
//! let index = CoverageIndex::build(periods, None);
//!
//! let config = SolverConfig::new().with_problem(ProblemConfig {
//!     agent_count: 2,
//!     capacity: 1,
//!     window: 1,
//!     idle_budget: 2,
//!     ..ProblemConfig::default()
//! });
//!
//! let result = coverforge::solve(&index, config).unwrap();
//! assert!(result.is_valid());
//! assert_eq!(result.evaluation.idle_total, 2);
//! ```

pub mod io;

#[cfg(feature = "console")]
pub use coverforge_console as console;

// Core types
pub use coverforge_core::{
    AgentId, Assignment, AssignmentError, CoverForgeError, CoverageIndex, HardSoftScore,
    PeriodSet, ResourceId, ResourceIdx, Result, EMPTY_SLOT,
};

// Configuration
pub use coverforge_config::{
    ConfigError, ConstructionConfig, EnvironmentMode, LocalSearchConfig, ProblemConfig,
    RankingConfig, SolverConfig,
};

// Engine
pub use coverforge_solver::{
    AgentReport, EfficiencyRanker, Evaluation, FeasibilityAnalysis, QuotaPlan, QuotaPlanner,
    SolutionEvaluator, SolveResult, Solver, TerminationReason, TierSplit, Violation,
};

/// Runs the whole pipeline on an already built index.
///
/// With the `console` feature enabled the colored console output is
/// initialized on first use.
pub fn solve(index: &CoverageIndex, config: SolverConfig) -> Result<SolveResult> {
    #[cfg(feature = "console")]
    console::init();

    Solver::new(config)?.solve(index)
}

/// Analyzes an index against the problem parameters without solving.
pub fn analyze(index: &CoverageIndex, problem: &ProblemConfig) -> FeasibilityAnalysis {
    FeasibilityAnalysis::analyze(index, problem)
}

pub mod prelude {
    pub use super::{
        Assignment, CoverageIndex, Evaluation, HardSoftScore, ProblemConfig, SolveResult,
        SolverConfig, Violation,
    };
}
