//! coverforge Core - Core types for resource-to-agent allocation
//!
//! This crate provides the fundamental abstractions shared by the solver:
//! - `PeriodSet`: word-packed set of period indices
//! - `CoverageIndex`: resource → active periods, built once from raw input
//! - `Assignment`: exclusive resource ownership with per-agent slots
//! - `HardSoftScore`: two-level quality measure of an assignment
//! - Error types

pub mod assignment;
pub mod coverage;
pub mod error;
pub mod period;
pub mod score;

#[cfg(test)]
mod assignment_tests;

pub use assignment::{AgentId, Assignment, EMPTY_SLOT};
pub use coverage::{CoverageIndex, ResourceId, ResourceIdx};
pub use error::{AssignmentError, CoverForgeError, Result};
pub use period::PeriodSet;
pub use score::HardSoftScore;
