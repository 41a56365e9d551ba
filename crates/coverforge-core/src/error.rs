//! Error types for coverforge

use thiserror::Error;

use crate::assignment::AgentId;
use crate::coverage::ResourceIdx;

/// Main error type for coverforge operations
#[derive(Debug, Error)]
pub enum CoverForgeError {
    /// The input source could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input could not be turned into a coverage table
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Incremental bookkeeping disagrees with a full recomputation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for coverforge operations
pub type Result<T> = std::result::Result<T, CoverForgeError>;

/// A rejected ownership mutation.
///
/// Rejections are ordinary control flow for the search phases: a move that
/// would break exclusivity or capacity is simply not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("resource {resource} is already held by agent {owner}")]
    AlreadyHeld { resource: ResourceIdx, owner: AgentId },

    #[error("agent {agent} already holds {capacity} resources")]
    CapacityExhausted { agent: AgentId, capacity: usize },

    #[error("resource {resource} is not held by any agent")]
    NotHeld { resource: ResourceIdx },

    #[error("agent {agent} does not exist")]
    UnknownAgent { agent: AgentId },

    #[error("resource {resource} does not exist")]
    UnknownResource { resource: ResourceIdx },

    #[error("resources are both held by agent {agent}")]
    SameAgent { agent: AgentId },
}
