//! QuotaPlanner - per-agent target active counts from the idle budget.

use std::fmt;

/// Two-tier target split.
///
/// Agents `0..low_count` target `low_target` active periods, the remaining
/// `high_count` agents target `high_target = low_target + 1`. The split is
/// exact: `low_count * low_target + high_count * high_target == required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierSplit {
    pub low_target: usize,
    pub high_target: usize,
    pub low_count: usize,
    pub high_count: usize,
    /// Required total active-period count `M * N - B`.
    pub required: u64,
}

impl TierSplit {
    fn of(agent_count: usize, required: u64) -> Self {
        if agent_count == 0 {
            return Self {
                low_target: 0,
                high_target: 1,
                low_count: 0,
                high_count: 0,
                required,
            };
        }
        let m = agent_count as u64;
        let low_target = (required / m) as usize;
        let high_count = (required % m) as usize;
        Self {
            low_target,
            high_target: low_target + 1,
            low_count: agent_count - high_count,
            high_count,
            required,
        }
    }

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.low_count + self.high_count
    }

    /// Target of an agent; the low tier comes first.
    #[inline]
    pub fn target_of(&self, agent: usize) -> usize {
        if agent < self.low_count {
            self.low_target
        } else {
            self.high_target
        }
    }

    /// Per-agent targets in agent order.
    pub fn targets(&self) -> Vec<usize> {
        (0..self.agent_count()).map(|a| self.target_of(a)).collect()
    }
}

impl fmt::Display for TierSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} + {} x {} = {}",
            self.low_count, self.low_target, self.high_count, self.high_target, self.required
        )
    }
}

/// Outcome of quota planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaPlan {
    Split(TierSplit),
    /// `M * N - B` lies outside `[0, M * N]`, or there is demand but no
    /// capacity to meet it.
    Infeasible { required: i64, max: u64 },
}

impl QuotaPlan {
    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self, QuotaPlan::Split(_))
    }

    pub fn split(&self) -> Option<&TierSplit> {
        match self {
            QuotaPlan::Split(split) => Some(split),
            QuotaPlan::Infeasible { .. } => None,
        }
    }

    /// The split itself, or the nearest achievable one with the required
    /// total clamped into `[0, M * N]`.
    pub fn relaxed(self, agent_count: usize) -> TierSplit {
        match self {
            QuotaPlan::Split(split) => split,
            QuotaPlan::Infeasible { required, max } => {
                let clamped = required.clamp(0, i64::try_from(max).unwrap_or(i64::MAX));
                TierSplit::of(agent_count, clamped as u64)
            }
        }
    }
}

/// Computes per-agent targets from the global idle budget.
///
/// # Examples
///
/// ```
/// use coverforge_solver::quota::{QuotaPlan, QuotaPlanner};
///
/// let plan = QuotaPlanner::new(336, 22, 5, 410).plan();
/// let QuotaPlan::Split(split) = plan else { panic!("feasible") };
/// assert_eq!((split.low_target, split.low_count), (20, 74));
/// assert_eq!((split.high_target, split.high_count), (21, 262));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QuotaPlanner {
    agent_count: usize,
    period_count: usize,
    capacity: usize,
    idle_budget: u64,
}

impl QuotaPlanner {
    pub fn new(agent_count: usize, period_count: usize, capacity: usize, idle_budget: u64) -> Self {
        Self {
            agent_count,
            period_count,
            capacity,
            idle_budget,
        }
    }

    /// Plans the two-tier split, or reports infeasibility.
    pub fn plan(&self) -> QuotaPlan {
        let max = self.agent_count as u64 * self.period_count as u64;
        let required = i128::from(max) - i128::from(self.idle_budget);
        let required = i64::try_from(required).unwrap_or(i64::MIN);

        if required < 0 || required as u64 > max || (required > 0 && self.capacity == 0) {
            return QuotaPlan::Infeasible { required, max };
        }
        QuotaPlan::Split(TierSplit::of(self.agent_count, required as u64))
    }
}
