//! SolutionEvaluator - validates an assignment against every constraint.

use std::collections::BTreeMap;
use std::fmt;

use coverforge_core::{AgentId, Assignment, CoverageIndex, HardSoftScore, PeriodSet};

use crate::director::AllocationDirector;

/// A broken constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The agent has no active period inside the mandatory window.
    MissingWindow { agent: AgentId },
    /// The global idle total is above the budget.
    IdleBudgetExceeded { idle_total: u64, budget: u64, excess: u64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingWindow { agent } => {
                write!(f, "agent {agent} has no active period in the window")
            }
            Violation::IdleBudgetExceeded {
                idle_total,
                budget,
                excess,
            } => write!(
                f,
                "idle total {idle_total} exceeds budget {budget} by {excess}"
            ),
        }
    }
}

/// Measured state of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentReport {
    pub agent: AgentId,
    pub held: usize,
    pub active: usize,
    pub idle: usize,
    pub window_satisfied: bool,
    pub target: Option<usize>,
}

impl AgentReport {
    /// `target - active`, zero without a target.
    pub fn deficit(&self) -> i64 {
        self.target
            .map_or(0, |target| target as i64 - self.active as i64)
    }
}

/// Result of evaluating an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// No violation at all.
    pub valid: bool,
    pub idle_total: u64,
    pub idle_budget: u64,
    /// Idle periods beyond the budget.
    pub excess_idle: u64,
    pub window_violations: usize,
    pub violations: Vec<Violation>,
    pub agents: Vec<AgentReport>,
    pub score: HardSoftScore,
    /// Active count -> number of agents with that count.
    pub distribution: BTreeMap<usize, usize>,
}

impl Evaluation {
    /// Σ |deficit| over agents with a target.
    pub fn total_deviation(&self) -> u64 {
        self.agents.iter().map(|a| a.deficit().unsigned_abs()).sum()
    }

    /// Agents violating the window constraint.
    pub fn window_violators(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.violations.iter().filter_map(|v| match v {
            Violation::MissingWindow { agent } => Some(*agent),
            Violation::IdleBudgetExceeded { .. } => None,
        })
    }
}

/// Recomputes per-agent active sets and validates the constraints.
///
/// # Examples
///
/// ```
/// use coverforge_core::{Assignment, CoverageIndex};
/// use coverforge_solver::evaluator::SolutionEvaluator;
///
/// let index = CoverageIndex::from_resources(2, vec![(0, vec![0, 1])]);
/// let mut assignment = Assignment::new(1, index.resource_count(), 1);
/// assignment.assign(0, 0).unwrap();
///
/// let evaluation = SolutionEvaluator::new(1, 0).evaluate(&index, &assignment, &[2]);
/// assert!(evaluation.valid);
/// assert_eq!(evaluation.idle_total, 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolutionEvaluator {
    window: usize,
    idle_budget: u64,
}

impl SolutionEvaluator {
    pub fn new(window: usize, idle_budget: u64) -> Self {
        Self {
            window,
            idle_budget,
        }
    }

    /// Full recomputation from the assignment alone.
    ///
    /// `targets` may be shorter than the agent count; agents without a
    /// target report a zero deficit.
    pub fn evaluate(
        &self,
        index: &CoverageIndex,
        assignment: &Assignment,
        targets: &[usize],
    ) -> Evaluation {
        let window_len = self.window.min(index.period_count());
        let rows = (0..assignment.agent_count()).map(|agent| {
            let active = assignment.active_periods(agent, index);
            (agent, assignment.held_count(agent), active)
        });
        self.build(index.period_count(), window_len, rows, targets)
    }

    /// Evaluation from the director's incremental active sets.
    pub fn evaluate_director(
        &self,
        director: &AllocationDirector<'_>,
        targets: &[usize],
    ) -> Evaluation {
        let rows = (0..director.agent_count()).map(|agent| {
            (
                agent,
                director.assignment().held_count(agent),
                director.active(agent).clone(),
            )
        });
        self.build(director.period_count(), director.window_len(), rows, targets)
    }

    fn build(
        &self,
        period_count: usize,
        window_len: usize,
        rows: impl Iterator<Item = (AgentId, usize, PeriodSet)>,
        targets: &[usize],
    ) -> Evaluation {
        let mut agents = Vec::new();
        let mut violations = Vec::new();
        let mut distribution = BTreeMap::new();
        let mut idle_total = 0u64;

        for (agent, held, active) in rows {
            let window_satisfied = window_len == 0 || active.any_below(window_len);
            let count = active.len();
            let idle = period_count - count;
            idle_total += idle as u64;
            *distribution.entry(count).or_insert(0) += 1;
            if !window_satisfied {
                violations.push(Violation::MissingWindow { agent });
            }
            agents.push(AgentReport {
                agent,
                held,
                active: count,
                idle,
                window_satisfied,
                target: targets.get(agent).copied(),
            });
        }

        let window_violations = violations.len();
        let excess_idle = idle_total.saturating_sub(self.idle_budget);
        if excess_idle > 0 {
            violations.push(Violation::IdleBudgetExceeded {
                idle_total,
                budget: self.idle_budget,
                excess: excess_idle,
            });
        }

        let deviation: u64 = agents.iter().map(|a| a.deficit().unsigned_abs()).sum();
        let score = HardSoftScore::of(
            -(window_violations as i64 + excess_idle as i64),
            -(deviation as i64),
        );

        Evaluation {
            valid: violations.is_empty(),
            idle_total,
            idle_budget: self.idle_budget,
            excess_idle,
            window_violations,
            violations,
            agents,
            score,
            distribution,
        }
    }
}
