//! Termination conditions for the refinement phase.

use std::fmt::{self, Debug};

use crate::scope::SolverScope;

/// Why refinement stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// Global idle total equals the budget exactly.
    BudgetReached,
    /// A full round produced no move.
    LocalOptimum,
    /// The round cap was hit.
    RoundLimit,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TerminationReason::BudgetReached => "budget reached",
            TerminationReason::LocalOptimum => "local optimum",
            TerminationReason::RoundLimit => "round limit",
        })
    }
}

/// Trait for determining when to stop refining.
pub trait Termination: Send + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, solver_scope: &SolverScope<'_>) -> bool;

    /// Reason reported when this condition fires.
    fn reason(&self) -> TerminationReason;
}

/// Terminates as soon as the idle total equals the budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetReachedTermination;

impl Termination for BudgetReachedTermination {
    fn is_terminated(&self, solver_scope: &SolverScope<'_>) -> bool {
        solver_scope.budget_reached()
    }

    fn reason(&self) -> TerminationReason {
        TerminationReason::BudgetReached
    }
}

/// Terminates after a number of refinement rounds.
///
/// # Example
///
/// ```
/// use coverforge_solver::termination::RoundLimitTermination;
///
/// let term = RoundLimitTermination::new(50);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RoundLimitTermination {
    limit: u64,
}

impl RoundLimitTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for RoundLimitTermination {
    fn is_terminated(&self, solver_scope: &SolverScope<'_>) -> bool {
        solver_scope.stats().round_count >= self.limit
    }

    fn reason(&self) -> TerminationReason {
        TerminationReason::RoundLimit
    }
}

/// First condition that fires, in order.
pub fn first_fired(
    terminations: &[&dyn Termination],
    solver_scope: &SolverScope<'_>,
) -> Option<TerminationReason> {
    terminations
        .iter()
        .find(|t| t.is_terminated(solver_scope))
        .map(|t| t.reason())
}
