//! Allocation director: working assignment plus incremental active sets.
//!
//! The director owns the working [`Assignment`] and keeps every agent's
//! active-period set in step with it. All ownership mutations go through the
//! director so the derived state can never go stale; [`verify`] recomputes
//! everything from scratch and reports any disagreement.
//!
//! [`verify`]: AllocationDirector::verify

use coverforge_core::{
    AgentId, Assignment, AssignmentError, CoverForgeError, CoverageIndex, PeriodSet, ResourceIdx,
};

/// Working state of a solve.
#[derive(Debug, Clone)]
pub struct AllocationDirector<'a> {
    index: &'a CoverageIndex,
    assignment: Assignment,
    active: Vec<PeriodSet>,
    window_len: usize,
}

impl<'a> AllocationDirector<'a> {
    /// Creates a director over an empty assignment.
    ///
    /// The mandatory window is `[0, min(window, N))`.
    pub fn new(index: &'a CoverageIndex, agent_count: usize, capacity: usize, window: usize) -> Self {
        let assignment = Assignment::new(agent_count, index.resource_count(), capacity);
        Self::from_assignment(index, assignment, window)
    }

    /// Wraps an existing assignment, computing active sets from scratch.
    pub fn from_assignment(index: &'a CoverageIndex, assignment: Assignment, window: usize) -> Self {
        let active = (0..assignment.agent_count())
            .map(|agent| assignment.active_periods(agent, index))
            .collect();
        Self {
            index,
            assignment,
            active,
            window_len: window.min(index.period_count()),
        }
    }

    #[inline]
    pub fn index(&self) -> &'a CoverageIndex {
        self.index
    }

    #[inline]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn into_assignment(self) -> Assignment {
        self.assignment
    }

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.assignment.agent_count()
    }

    #[inline]
    pub fn period_count(&self) -> usize {
        self.index.period_count()
    }

    /// Effective window length (clamped to the number of periods).
    #[inline]
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    #[inline]
    pub fn active(&self, agent: AgentId) -> &PeriodSet {
        &self.active[agent]
    }

    #[inline]
    pub fn active_count(&self, agent: AgentId) -> usize {
        self.active[agent].len()
    }

    #[inline]
    pub fn idle_count(&self, agent: AgentId) -> usize {
        self.period_count() - self.active_count(agent)
    }

    /// Σ idle counts over all agents.
    pub fn idle_total(&self) -> u64 {
        (0..self.agent_count())
            .map(|agent| self.idle_count(agent) as u64)
            .sum()
    }

    /// `true` if `periods` reaches into the mandatory window.
    ///
    /// An empty window imposes no constraint and is always reached.
    #[inline]
    pub fn reaches_window(&self, periods: &PeriodSet) -> bool {
        self.window_len == 0 || periods.any_below(self.window_len)
    }

    /// `true` if the agent has at least one active window period.
    #[inline]
    pub fn window_satisfied(&self, agent: AgentId) -> bool {
        self.reaches_window(&self.active[agent])
    }

    /// `true` if the resource is active in at least one window period.
    #[inline]
    pub fn covers_window(&self, resource: ResourceIdx) -> bool {
        self.index.coverage(resource).any_below(self.window_len)
    }

    /// Periods the resource would add to the agent's active set.
    #[inline]
    pub fn marginal_gain(&self, agent: AgentId, resource: ResourceIdx) -> usize {
        self.index
            .coverage(resource)
            .difference_len(&self.active[agent])
    }

    /// The agent's active set if `excluded` were released.
    pub fn active_without(&self, agent: AgentId, excluded: ResourceIdx) -> PeriodSet {
        let mut active = PeriodSet::with_capacity(self.period_count());
        for resource in self.assignment.held(agent) {
            if resource != excluded {
                active.union_with(self.index.coverage(resource));
            }
        }
        active
    }

    /// Gives an unassigned resource to `agent`.
    pub fn assign(&mut self, resource: ResourceIdx, agent: AgentId) -> Result<(), AssignmentError> {
        self.assignment.assign(resource, agent)?;
        self.active[agent].union_with(self.index.coverage(resource));
        Ok(())
    }

    /// Clears a resource back to unassigned. Returns the former owner.
    pub fn release(&mut self, resource: ResourceIdx) -> Result<AgentId, AssignmentError> {
        let agent = self.assignment.release(resource)?;
        self.refresh(agent);
        Ok(agent)
    }

    /// Moves a held resource to `to`. Returns the former owner.
    pub fn transfer(&mut self, resource: ResourceIdx, to: AgentId) -> Result<AgentId, AssignmentError> {
        let from = self.assignment.transfer(resource, to)?;
        self.refresh(from);
        self.active[to].union_with(self.index.coverage(resource));
        Ok(from)
    }

    /// Exchanges the owners of two held resources.
    pub fn swap(&mut self, a: ResourceIdx, b: ResourceIdx) -> Result<(), AssignmentError> {
        self.assignment.swap(a, b)?;
        for resource in [a, b] {
            if let Some(owner) = self.assignment.owner(resource) {
                self.refresh(owner);
            }
        }
        Ok(())
    }

    // Losing a resource cannot be undone by set difference: another held
    // resource may cover the same periods.
    fn refresh(&mut self, agent: AgentId) {
        self.active[agent] = self.assignment.active_periods(agent, self.index);
    }

    /// Recomputes every derived quantity and compares it with the
    /// incremental bookkeeping.
    pub fn verify(&self) -> Result<(), CoverForgeError> {
        let assignment = &self.assignment;
        let mut held_total = 0;

        for agent in 0..assignment.agent_count() {
            let held = assignment.held_count(agent);
            if held > assignment.capacity() {
                return Err(CoverForgeError::InvalidState(format!(
                    "agent {agent} holds {held} resources, capacity is {}",
                    assignment.capacity()
                )));
            }
            held_total += held;

            for resource in assignment.held(agent) {
                if assignment.owner(resource) != Some(agent) {
                    return Err(CoverForgeError::InvalidState(format!(
                        "resource {resource} sits in a slot of agent {agent} but is owned by {:?}",
                        assignment.owner(resource)
                    )));
                }
            }

            let expected = assignment.active_periods(agent, self.index);
            if expected != self.active[agent] {
                return Err(CoverForgeError::InvalidState(format!(
                    "agent {agent} active set {:?} differs from recomputed {:?}",
                    self.active[agent], expected
                )));
            }
        }

        if held_total != assignment.assigned_count() {
            return Err(CoverForgeError::InvalidState(format!(
                "{held_total} occupied slots but {} owned resources",
                assignment.assigned_count()
            )));
        }

        let recomputed: u64 = (0..assignment.agent_count())
            .map(|agent| {
                (self.period_count() - assignment.active_periods(agent, self.index).len()) as u64
            })
            .sum();
        if recomputed != self.idle_total() {
            return Err(CoverForgeError::InvalidState(format!(
                "idle total {} differs from recomputed {recomputed}",
                self.idle_total()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverforge_core::CoverageIndex;

    fn index() -> CoverageIndex {
        // r0 {0,1}, r1 {1,2}, r2 {3}, r3 {2,3}
        CoverageIndex::from_resources(
            4,
            vec![
                (0, vec![0, 1]),
                (1, vec![1, 2]),
                (2, vec![3]),
                (3, vec![2, 3]),
            ],
        )
    }

    #[test]
    fn test_assign_updates_active() {
        let index = index();
        let mut director = AllocationDirector::new(&index, 2, 2, 2);
        assert_eq!(director.idle_total(), 8);

        director.assign(0, 0).unwrap();
        director.assign(1, 0).unwrap();
        assert_eq!(director.active_count(0), 3);
        assert_eq!(director.idle_total(), 5);
        assert!(director.window_satisfied(0));
        assert!(!director.window_satisfied(1));
        director.verify().unwrap();
    }

    #[test]
    fn test_release_recomputes_overlap() {
        let index = index();
        let mut director = AllocationDirector::new(&index, 1, 2, 2);
        director.assign(0, 0).unwrap();
        director.assign(1, 0).unwrap();

        // period 1 is shared and must survive releasing r1
        assert_eq!(director.release(1), Ok(0));
        assert_eq!(director.active(0).iter().collect::<Vec<_>>(), vec![0, 1]);
        director.verify().unwrap();
    }

    #[test]
    fn test_transfer_and_swap() {
        let index = index();
        let mut director = AllocationDirector::new(&index, 2, 2, 2);
        director.assign(0, 0).unwrap();
        director.assign(2, 0).unwrap();
        director.assign(3, 1).unwrap();

        director.swap(2, 3).unwrap();
        assert_eq!(director.active(0).iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(director.active(1).iter().collect::<Vec<_>>(), vec![3]);

        assert_eq!(director.transfer(0, 1), Ok(0));
        assert_eq!(director.active(0).iter().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(director.active_count(1), 3);
        director.verify().unwrap();
    }

    #[test]
    fn test_rejected_move_leaves_state() {
        let index = index();
        let mut director = AllocationDirector::new(&index, 2, 1, 2);
        director.assign(0, 0).unwrap();
        assert!(director.assign(0, 1).is_err());
        assert!(director.assign(1, 0).is_err());
        assert_eq!(director.active_count(1), 0);
        director.verify().unwrap();
    }

    #[test]
    fn test_marginal_gain_and_preview() {
        let index = index();
        let mut director = AllocationDirector::new(&index, 1, 3, 2);
        director.assign(0, 0).unwrap();
        director.assign(1, 0).unwrap();
        assert_eq!(director.marginal_gain(0, 3), 1);
        assert_eq!(director.marginal_gain(0, 2), 1);
        assert_eq!(director.active_without(0, 0).len(), 2);
        assert!(director.covers_window(0));
        assert!(!director.covers_window(2));
    }

    #[test]
    fn test_empty_window_is_always_satisfied() {
        let index = index();
        let director = AllocationDirector::new(&index, 1, 1, 0);
        assert!(director.window_satisfied(0));
        assert_eq!(director.window_len(), 0);
    }

    #[test]
    fn test_window_clamped_to_horizon() {
        let index = index();
        let director = AllocationDirector::new(&index, 1, 1, 14);
        assert_eq!(director.window_len(), 4);
    }
}
