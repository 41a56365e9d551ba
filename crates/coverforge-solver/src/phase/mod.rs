//! Solver phases
//!
//! Phases are the main building blocks of solving:
//! - GreedyAssigner: builds the initial assignment agent by agent
//! - LocalSearchRefiner: repairs it with top-up, transfer and swap moves

pub mod construction;
pub mod localsearch;

use std::fmt::Debug;

use coverforge_core::Result;

use crate::scope::SolverScope;

pub use construction::GreedyAssigner;
pub use localsearch::LocalSearchRefiner;

/// A phase of the solving process.
///
/// Phases are executed in sequence by the solver, each mutating the working
/// assignment held by the scope.
pub trait Phase: Send + Debug {
    /// Executes this phase.
    ///
    /// Only an invariant breach detected in full-assert mode is an error.
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) -> Result<()>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}
