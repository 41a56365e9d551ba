//! Ownership moves applied through the director.

use std::fmt;

use coverforge_core::{AgentId, AssignmentError, ResourceIdx};

use crate::director::AllocationDirector;

/// Move category, for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Assign = 0,
    Transfer = 1,
    Swap = 2,
}

impl MoveKind {
    pub const COUNT: usize = 3;

    pub const ALL: [MoveKind; MoveKind::COUNT] = [MoveKind::Assign, MoveKind::Transfer, MoveKind::Swap];

    pub fn name(self) -> &'static str {
        match self {
            MoveKind::Assign => "assign",
            MoveKind::Transfer => "transfer",
            MoveKind::Swap => "swap",
        }
    }
}

/// A single change to resource ownership.
///
/// Moves never touch more than two agents, and none of them releases a
/// resource back to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationMove {
    /// Give an unassigned resource to an agent.
    Assign { resource: ResourceIdx, agent: AgentId },
    /// Move a held resource to another agent.
    Transfer { resource: ResourceIdx, to: AgentId },
    /// Exchange the owners of two held resources.
    Swap { a: ResourceIdx, b: ResourceIdx },
}

impl AllocationMove {
    pub fn kind(&self) -> MoveKind {
        match self {
            AllocationMove::Assign { .. } => MoveKind::Assign,
            AllocationMove::Transfer { .. } => MoveKind::Transfer,
            AllocationMove::Swap { .. } => MoveKind::Swap,
        }
    }

    /// Applies the move. A rejected move leaves the director unchanged.
    pub fn do_move(&self, director: &mut AllocationDirector<'_>) -> Result<(), AssignmentError> {
        match *self {
            AllocationMove::Assign { resource, agent } => director.assign(resource, agent),
            AllocationMove::Transfer { resource, to } => director.transfer(resource, to).map(|_| ()),
            AllocationMove::Swap { a, b } => director.swap(a, b),
        }
    }
}

impl fmt::Display for AllocationMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationMove::Assign { resource, agent } => write!(f, "assign r{resource} -> a{agent}"),
            AllocationMove::Transfer { resource, to } => write!(f, "transfer r{resource} -> a{to}"),
            AllocationMove::Swap { a, b } => write!(f, "swap r{a} <-> r{b}"),
        }
    }
}
