//! Feasibility analysis of an instance before solving.

use std::fmt;

use coverforge_config::ProblemConfig;
use coverforge_core::{CoverageIndex, PeriodSet};

/// What the data allows, independent of any assignment.
///
/// Two idle figures are reported:
/// - `idle_lower_bound` is rigorous: no assignment can go below it, because
///   the `M * C` widest resources bound the total active count.
/// - `idle_estimate` assumes every agent could match the union of the `C`
///   widest window-covering resources. It is an optimistic planning figure,
///   not a bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeasibilityAnalysis {
    pub agent_count: usize,
    pub capacity: usize,
    pub period_count: usize,
    /// Effective window length.
    pub window_len: usize,
    pub idle_budget: u64,
    pub resource_count: usize,
    pub window_resource_count: usize,
    /// `M * C`.
    pub slot_supply: usize,
    /// `M * N - B`, negative when the budget exceeds the horizon.
    pub required_active: i64,
    pub idle_lower_bound: u64,
    /// Active count of the union of the `C` widest window resources.
    pub best_agent_active: usize,
    pub idle_estimate: u64,
}

impl FeasibilityAnalysis {
    pub fn analyze(index: &CoverageIndex, problem: &ProblemConfig) -> Self {
        let agent_count = problem.agent_count;
        let capacity = problem.capacity;
        let period_count = index.period_count();
        let window_len = problem.window.min(period_count);
        let horizon = agent_count as u64 * period_count as u64;

        let mut widths: Vec<usize> = index.iter().map(|(_, _, set)| set.len()).collect();
        widths.sort_unstable_by(|a, b| b.cmp(a));
        let slot_supply = agent_count.saturating_mul(capacity);
        let reachable: u64 = widths.iter().take(slot_supply).map(|&w| w as u64).sum();
        let idle_lower_bound = horizon - reachable.min(horizon);

        let mut window_sets: Vec<&PeriodSet> = index
            .iter()
            .map(|(_, _, set)| set)
            .filter(|set| window_len == 0 || set.any_below(window_len))
            .collect();
        let window_resource_count = if window_len == 0 {
            0
        } else {
            window_sets.len()
        };
        window_sets.sort_by(|a, b| b.len().cmp(&a.len()));
        let mut best = PeriodSet::with_capacity(period_count);
        for set in window_sets.into_iter().take(capacity) {
            best.union_with(set);
        }
        let best_agent_active = best.len();
        let idle_estimate = agent_count as u64 * (period_count - best_agent_active) as u64;
        let required_active = i128::from(horizon) - i128::from(problem.idle_budget);
        let required_active = i64::try_from(required_active).unwrap_or(i64::MIN);

        Self {
            agent_count,
            capacity,
            period_count,
            window_len,
            idle_budget: problem.idle_budget,
            resource_count: index.resource_count(),
            window_resource_count,
            slot_supply,
            required_active,
            idle_lower_bound,
            best_agent_active,
            idle_estimate,
        }
    }

    /// Enough window resources exist for every agent to get one.
    pub fn window_coverable(&self) -> bool {
        self.window_len == 0 || self.window_resource_count >= self.agent_count
    }

    /// The budget is not ruled out by the rigorous bound.
    pub fn budget_reachable(&self) -> bool {
        self.required_active >= 0 && self.idle_lower_bound <= self.idle_budget
    }

    /// The budget is met under the optimistic per-agent estimate.
    pub fn budget_plausible(&self) -> bool {
        self.required_active >= 0 && self.idle_estimate <= self.idle_budget
    }

    /// Every check passes.
    pub fn looks_feasible(&self) -> bool {
        self.window_coverable() && self.budget_reachable()
    }
}

impl fmt::Display for FeasibilityAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "agents {} x capacity {} = {} slots, {} resources ({} cover the window)",
            self.agent_count,
            self.capacity,
            self.slot_supply,
            self.resource_count,
            self.window_resource_count
        )?;
        writeln!(
            f,
            "periods {}, window {}, budget {}, required active {}",
            self.period_count, self.window_len, self.idle_budget, self.required_active
        )?;
        writeln!(
            f,
            "idle lower bound {} ({}), estimate {} at {} active per agent ({})",
            self.idle_lower_bound,
            if self.budget_reachable() { "reachable" } else { "unreachable" },
            self.idle_estimate,
            self.best_agent_active,
            if self.budget_plausible() { "plausible" } else { "implausible" }
        )?;
        write!(
            f,
            "window coverage {}",
            if self.window_coverable() { "possible for every agent" } else { "short of agents" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(agents: usize, capacity: usize, window: usize, budget: u64) -> ProblemConfig {
        ProblemConfig {
            agent_count: agents,
            capacity,
            window,
            idle_budget: budget,
            ..ProblemConfig::default()
        }
    }

    #[test]
    fn test_scarce_window() {
        let index = CoverageIndex::from_resources(1, vec![(0, vec![0])]);
        let analysis = FeasibilityAnalysis::analyze(&index, &problem(3, 1, 1, 2));
        assert_eq!(analysis.window_resource_count, 1);
        assert!(!analysis.window_coverable());
        assert_eq!(analysis.idle_lower_bound, 2);
        assert!(analysis.budget_reachable());
        assert!(!analysis.looks_feasible());
    }

    #[test]
    fn test_lower_bound_uses_widest_resources() {
        let index = CoverageIndex::from_resources(
            4,
            vec![(0, vec![0, 1, 2, 3]), (1, vec![0]), (2, vec![1, 2])],
        );
        let analysis = FeasibilityAnalysis::analyze(&index, &problem(2, 1, 2, 1));
        // widest two: 4 + 2 of 8 periods
        assert_eq!(analysis.idle_lower_bound, 2);
        assert!(!analysis.budget_reachable());
        assert_eq!(analysis.best_agent_active, 4);
        assert_eq!(analysis.idle_estimate, 0);
        assert!(analysis.budget_plausible());
    }

    #[test]
    fn test_negative_requirement() {
        let index = CoverageIndex::from_resources(2, vec![(0, vec![0, 1])]);
        let analysis = FeasibilityAnalysis::analyze(&index, &problem(1, 1, 1, 5));
        assert_eq!(analysis.required_active, -3);
        assert!(!analysis.budget_reachable());
    }

    #[test]
    fn test_huge_budget_saturates() {
        let index = CoverageIndex::from_resources(2, vec![(0, vec![0, 1])]);
        for budget in [1u64 << 63, u64::MAX] {
            let analysis = FeasibilityAnalysis::analyze(&index, &problem(1, 1, 1, budget));
            assert!(analysis.required_active < 0, "budget {budget}");
            assert!(!analysis.budget_reachable());
            assert!(!analysis.budget_plausible());
        }
    }
}
