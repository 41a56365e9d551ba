//! Configuration system for coverforge.
//!
//! Load solver configuration from TOML or YAML files to control the problem
//! parameters, ranking weights and refinement bounds without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use coverforge_config::SolverConfig;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [problem]
//!     agent_count = 10
//!     capacity = 5
//!     window = 3
//!     idle_budget = 10
//!
//!     [local_search]
//!     round_limit = 100
//! "#).unwrap();
//!
//! assert_eq!(config.problem.agent_count, 10);
//! assert_eq!(config.local_search.round_limit, 100);
//! assert_eq!(config.ranking.window_period_bonus, 30.0);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use coverforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed for tie shuffling and candidate order.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Problem parameters.
    #[serde(default)]
    pub problem: ProblemConfig,

    /// Resource ranking weights.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Greedy construction settings.
    #[serde(default)]
    pub construction: ConstructionConfig,

    /// Refinement settings.
    #[serde(default)]
    pub local_search: LocalSearchConfig,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension
    /// (`.yaml`/`.yml` are YAML, anything else is TOML).
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Replaces the problem parameters.
    pub fn with_problem(mut self, problem: ProblemConfig) -> Self {
        self.problem = problem;
        self
    }

    /// Sets the refinement round cap.
    pub fn with_round_limit(mut self, rounds: u32) -> Self {
        self.local_search.round_limit = rounds;
        self
    }

    /// Checks values that would make a run meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.problem.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if self.local_search.round_limit == 0 {
            return Err(ConfigError::Invalid(
                "local_search.round_limit must be at least 1".into(),
            ));
        }
        if self.construction.scan_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "construction.scan_limit must be at least 1".into(),
            ));
        }
        self.ranking.validate()
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Deterministic behavior; a missing seed means no shuffling at all.
    #[default]
    Reproducible,

    /// A missing seed is drawn from the operating system.
    NonReproducible,

    /// Reproducible, and every applied move re-verifies the incremental
    /// bookkeeping against a full recomputation.
    FullAssert,
}

/// Problem parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ProblemConfig {
    /// Number of agents (M).
    pub agent_count: usize,

    /// Maximum resources per agent (C).
    pub capacity: usize,

    /// Length of the mandatory window (W).
    pub window: usize,

    /// Global idle-period budget (B).
    pub idle_budget: u64,

    /// Maximum number of period lines read from the input.
    pub expected_period_count: Option<usize>,

    /// Exclusive upper bound on resource identifiers.
    pub max_resource_id: Option<u32>,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            agent_count: 336,
            capacity: 5,
            window: 14,
            idle_budget: 410,
            expected_period_count: None,
            max_resource_id: None,
        }
    }
}

/// Resource ranking weights.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RankingConfig {
    /// Score per covered period.
    pub coverage_weight: f64,

    /// Extra score per covered period inside the mandatory window.
    pub window_period_bonus: f64,

    /// Bonus when the resource alone covers the whole window.
    pub full_window_bonus: f64,

    /// Bonus when the coverage count lies in `[target_low, target_high + 1]`.
    pub near_band_bonus: f64,

    /// Bonus when the coverage count lies within `wide_band_margin` below
    /// the near band.
    pub wide_band_bonus: f64,

    /// Width of the wide band below the near band.
    pub wide_band_margin: usize,

    /// Score per pair of consecutive covered periods.
    pub continuity_weight: f64,

    /// Exclude resources that cover no window period.
    pub window_only: bool,

    /// Shuffle exact ties with the seeded generator.
    pub shuffle_ties: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            coverage_weight: 1.0,
            window_period_bonus: 30.0,
            full_window_bonus: 100.0,
            near_band_bonus: 50.0,
            wide_band_bonus: 20.0,
            wide_band_margin: 4,
            continuity_weight: 2.0,
            window_only: false,
            shuffle_ties: false,
        }
    }
}

impl RankingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("coverage_weight", self.coverage_weight),
            ("window_period_bonus", self.window_period_bonus),
            ("full_window_bonus", self.full_window_bonus),
            ("near_band_bonus", self.near_band_bonus),
            ("wide_band_bonus", self.wide_band_bonus),
            ("continuity_weight", self.continuity_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "ranking.{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Greedy construction settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConstructionConfig {
    /// Maximum passes over the ranking per agent; defaults to the capacity.
    pub scan_limit: Option<usize>,
}

/// Refinement settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Maximum refinement rounds (R).
    pub round_limit: u32,

    /// How far a top-up may overshoot an agent's target.
    pub overshoot_tolerance: usize,

    /// Allow taking held resources from agents above target.
    pub transfer_moves: bool,

    /// Visit agents in a seeded random order each round.
    pub shuffle_candidates: bool,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            round_limit: 50,
            overshoot_tolerance: 1,
            transfer_moves: true,
            shuffle_candidates: false,
        }
    }
}

#[cfg(test)]
mod tests;
