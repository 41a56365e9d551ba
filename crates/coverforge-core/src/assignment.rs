//! Assignment - exclusive resource ownership

use smallvec::SmallVec;

use crate::coverage::{CoverageIndex, ResourceIdx};
use crate::error::AssignmentError;
use crate::period::PeriodSet;

/// Position of an agent; agents are numbered `0..agent_count`.
pub type AgentId = usize;

/// Output sentinel for an empty slot.
pub const EMPTY_SLOT: i64 = -1;

type Slots = SmallVec<[Option<ResourceIdx>; 8]>;

/// Global mapping resource → at most one agent.
///
/// Kept in two mirrored views: `owner[resource]` and the agent's ordered
/// slot list of length `capacity`. Every mutation updates both, so the
/// exclusivity and capacity invariants hold after any successful call and a
/// rejected call leaves the assignment untouched.
///
/// Active-period sets are derived data and are not stored here; see
/// [`active_periods`](Self::active_periods) for the full recomputation.
///
/// # Examples
///
/// ```
/// use coverforge_core::{Assignment, AssignmentError};
///
/// let mut assignment = Assignment::new(2, 3, 1);
/// assignment.assign(0, 0).unwrap();
///
/// assert_eq!(assignment.owner(0), Some(0));
/// assert_eq!(
///     assignment.assign(1, 0),
///     Err(AssignmentError::CapacityExhausted { agent: 0, capacity: 1 })
/// );
/// assert_eq!(
///     assignment.assign(0, 1),
///     Err(AssignmentError::AlreadyHeld { resource: 0, owner: 0 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    capacity: usize,
    owner: Vec<Option<AgentId>>,
    slots: Vec<Slots>,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new(agent_count: usize, resource_count: usize, capacity: usize) -> Self {
        let mut empty = Slots::new();
        empty.resize(capacity, None);
        Self {
            capacity,
            owner: vec![None; resource_count],
            slots: vec![empty; agent_count],
        }
    }

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn resource_count(&self) -> usize {
        self.owner.len()
    }

    /// Maximum resources per agent.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Agent currently holding `resource`.
    #[inline]
    pub fn owner(&self, resource: ResourceIdx) -> Option<AgentId> {
        self.owner.get(resource).copied().flatten()
    }

    #[inline]
    pub fn is_assigned(&self, resource: ResourceIdx) -> bool {
        self.owner(resource).is_some()
    }

    /// The agent's slots in order; `None` marks an empty slot.
    pub fn slots(&self, agent: AgentId) -> &[Option<ResourceIdx>] {
        &self.slots[agent]
    }

    /// Resources held by `agent`, in slot order.
    pub fn held(&self, agent: AgentId) -> impl Iterator<Item = ResourceIdx> + '_ {
        self.slots[agent].iter().flatten().copied()
    }

    pub fn held_count(&self, agent: AgentId) -> usize {
        self.slots[agent].iter().filter(|s| s.is_some()).count()
    }

    pub fn has_spare_capacity(&self, agent: AgentId) -> bool {
        self.slots[agent].iter().any(Option::is_none)
    }

    /// Total number of held resources across all agents.
    pub fn assigned_count(&self) -> usize {
        self.owner.iter().filter(|o| o.is_some()).count()
    }

    fn check_agent(&self, agent: AgentId) -> Result<(), AssignmentError> {
        if agent < self.slots.len() {
            Ok(())
        } else {
            Err(AssignmentError::UnknownAgent { agent })
        }
    }

    fn check_resource(&self, resource: ResourceIdx) -> Result<(), AssignmentError> {
        if resource < self.owner.len() {
            Ok(())
        } else {
            Err(AssignmentError::UnknownResource { resource })
        }
    }

    /// Gives an unassigned resource to `agent`, using its first empty slot.
    ///
    /// Returns the slot position.
    pub fn assign(
        &mut self,
        resource: ResourceIdx,
        agent: AgentId,
    ) -> Result<usize, AssignmentError> {
        self.check_resource(resource)?;
        self.check_agent(agent)?;
        if let Some(owner) = self.owner[resource] {
            return Err(AssignmentError::AlreadyHeld { resource, owner });
        }
        let slot = self.slots[agent]
            .iter()
            .position(Option::is_none)
            .ok_or(AssignmentError::CapacityExhausted {
                agent,
                capacity: self.capacity,
            })?;

        self.slots[agent][slot] = Some(resource);
        self.owner[resource] = Some(agent);
        Ok(slot)
    }

    /// Clears a resource back to unassigned. Returns its former owner.
    pub fn release(&mut self, resource: ResourceIdx) -> Result<AgentId, AssignmentError> {
        self.check_resource(resource)?;
        let agent = self.owner[resource].ok_or(AssignmentError::NotHeld { resource })?;
        for slot in self.slots[agent].iter_mut() {
            if *slot == Some(resource) {
                *slot = None;
                break;
            }
        }
        self.owner[resource] = None;
        Ok(agent)
    }

    /// Moves a held resource to another agent. Returns the former owner.
    pub fn transfer(
        &mut self,
        resource: ResourceIdx,
        to: AgentId,
    ) -> Result<AgentId, AssignmentError> {
        self.check_resource(resource)?;
        self.check_agent(to)?;
        let from = self.owner[resource].ok_or(AssignmentError::NotHeld { resource })?;
        if from == to {
            return Err(AssignmentError::SameAgent { agent: to });
        }
        if !self.has_spare_capacity(to) {
            return Err(AssignmentError::CapacityExhausted {
                agent: to,
                capacity: self.capacity,
            });
        }
        self.release(resource)?;
        self.assign(resource, to)?;
        Ok(from)
    }

    /// Exchanges the owners of two held resources, keeping slot positions.
    pub fn swap(&mut self, a: ResourceIdx, b: ResourceIdx) -> Result<(), AssignmentError> {
        self.check_resource(a)?;
        self.check_resource(b)?;
        let owner_a = self.owner[a].ok_or(AssignmentError::NotHeld { resource: a })?;
        let owner_b = self.owner[b].ok_or(AssignmentError::NotHeld { resource: b })?;
        if owner_a == owner_b {
            return Err(AssignmentError::SameAgent { agent: owner_a });
        }

        for slot in self.slots[owner_a].iter_mut() {
            if *slot == Some(a) {
                *slot = Some(b);
                break;
            }
        }
        for slot in self.slots[owner_b].iter_mut() {
            if *slot == Some(b) {
                *slot = Some(a);
                break;
            }
        }
        self.owner[a] = Some(owner_b);
        self.owner[b] = Some(owner_a);
        Ok(())
    }

    /// Recomputes the agent's active periods from scratch.
    pub fn active_periods(&self, agent: AgentId, index: &CoverageIndex) -> PeriodSet {
        let mut active = PeriodSet::with_capacity(index.period_count());
        for resource in self.held(agent) {
            active.union_with(index.coverage(resource));
        }
        active
    }

    /// Renders each agent as `capacity` external identifiers, with
    /// [`EMPTY_SLOT`] for empty slots.
    pub fn to_rows(&self, index: &CoverageIndex) -> Vec<Vec<i64>> {
        self.slots
            .iter()
            .map(|slots| {
                slots
                    .iter()
                    .map(|slot| match slot {
                        Some(r) => i64::from(index.id(*r).0),
                        None => EMPTY_SLOT,
                    })
                    .collect()
            })
            .collect()
    }
}
