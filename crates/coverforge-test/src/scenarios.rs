//! Hand-built instances with known outcomes.
//!
//! # Example
//!
//! ```
//! use coverforge_test::scenarios;
//!
//! let scenario = scenarios::single_resource();
//! assert_eq!(scenario.index().resource_count(), 1);
//! assert_eq!(scenario.problem.agent_count, 1);
//! ```

use coverforge_config::{ProblemConfig, SolverConfig};
use coverforge_core::CoverageIndex;

/// Raw period lists plus the problem parameters to solve them with.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub periods: Vec<Vec<i64>>,
    pub problem: ProblemConfig,
}

impl Scenario {
    pub fn new(
        name: &'static str,
        periods: Vec<Vec<i64>>,
        agent_count: usize,
        capacity: usize,
        window: usize,
        idle_budget: u64,
    ) -> Self {
        Self {
            name,
            periods,
            problem: ProblemConfig {
                agent_count,
                capacity,
                window,
                idle_budget,
                ..ProblemConfig::default()
            },
        }
    }

    pub fn index(&self) -> CoverageIndex {
        CoverageIndex::build(self.periods.clone(), self.problem.max_resource_id)
    }

    pub fn config(&self) -> SolverConfig {
        SolverConfig::new().with_problem(self.problem.clone())
    }
}

/// Two periods, one resource covering both, one agent, zero budget.
pub fn single_resource() -> Scenario {
    Scenario::new("single_resource", vec![vec![0], vec![0]], 1, 1, 1, 0)
}

/// Three agents compete for the only window resource.
pub fn scarce_window() -> Scenario {
    Scenario::new("scarce_window", vec![vec![0]], 3, 1, 1, 2)
}

/// Two resources with identical coverage `{0, 1}` over four periods.
pub fn identical_resources() -> Scenario {
    Scenario::new(
        "identical_resources",
        vec![vec![4, 3], vec![3, 4], vec![], vec![]],
        2,
        1,
        1,
        4,
    )
}

/// Ten agents, five periods, budget ten: every agent can reach exactly
/// four active periods with one resource.
pub fn exact_split() -> Scenario {
    let ids: Vec<i64> = (0..10).collect();
    Scenario::new(
        "exact_split",
        vec![ids.clone(), ids.clone(), ids.clone(), ids, vec![]],
        10,
        5,
        5,
        10,
    )
}

/// Every scenario above.
pub fn all() -> Vec<Scenario> {
    vec![
        single_resource(),
        scarce_window(),
        identical_resources(),
        exact_split(),
    ]
}
