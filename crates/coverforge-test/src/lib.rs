//! Shared test fixtures for coverforge crates.
//!
//! This crate provides data and pure functions for testing.
//! It does NOT depend on `coverforge-solver` to avoid circular dependencies.
//!
//! - [`scenarios`] - small hand-built instances with known outcomes
//! - [`generator`] - seeded random instances
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! coverforge-test = { workspace = true }
//! ```

pub mod generator;
pub mod scenarios;

pub use generator::{periods_to_text, InstanceGenerator};
pub use scenarios::Scenario;
