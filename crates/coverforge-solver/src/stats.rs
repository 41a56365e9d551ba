//! Solver statistics.
//!
//! Plain counters for solver and phase performance tracking.

use std::time::{Duration, Instant};

use crate::moves::MoveKind;

/// Solver-level statistics.
///
/// Tracks aggregate metrics across all phases of a solve run.
///
/// # Example
///
/// ```
/// use coverforge_solver::moves::MoveKind;
/// use coverforge_solver::stats::SolverStats;
///
/// let mut stats = SolverStats::default();
/// stats.start();
/// stats.record_round();
/// stats.record_move(MoveKind::Assign, true);
/// stats.record_move(MoveKind::Swap, false);
///
/// assert_eq!(stats.round_count, 1);
/// assert_eq!(stats.moves_evaluated, 2);
/// assert_eq!(stats.moves_accepted, 1);
/// assert_eq!(stats.accepted(MoveKind::Assign), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
    start_time: Option<Instant>,
    /// Refinement rounds completed.
    pub round_count: u64,
    /// Construction steps (agents processed).
    pub step_count: u64,
    /// Moves attempted across all phases.
    pub moves_evaluated: u64,
    /// Moves applied across all phases.
    pub moves_accepted: u64,
    accepted_by_kind: [u64; MoveKind::COUNT],
}

impl SolverStats {
    /// Marks the start of solving.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Returns the elapsed time since solving started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Records a move attempt and whether it was applied.
    pub fn record_move(&mut self, kind: MoveKind, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
            self.accepted_by_kind[kind as usize] += 1;
        }
    }

    /// Records a completed refinement round.
    pub fn record_round(&mut self) {
        self.round_count += 1;
    }

    /// Records a construction step.
    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    /// Applied moves of one kind.
    pub fn accepted(&self, kind: MoveKind) -> u64 {
        self.accepted_by_kind[kind as usize]
    }

    /// Returns the moves per second rate.
    pub fn moves_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.moves_evaluated as f64 / secs
        } else {
            0.0
        }
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}

/// Phase-level statistics.
///
/// # Example
///
/// ```
/// use coverforge_solver::stats::PhaseStats;
///
/// let mut stats = PhaseStats::new(1, "Local Search");
/// stats.record_step();
/// stats.record_move(true);
///
/// assert_eq!(stats.phase_index, 1);
/// assert_eq!(stats.phase_type, "Local Search");
/// assert_eq!(stats.step_count, 1);
/// assert_eq!(stats.moves_accepted, 1);
/// ```
#[derive(Debug)]
pub struct PhaseStats {
    /// Index of this phase (0-based).
    pub phase_index: usize,
    /// Type name of the phase.
    pub phase_type: &'static str,
    start_time: Instant,
    /// Agents processed (construction) or rounds run (refinement).
    pub step_count: u64,
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
}

impl PhaseStats {
    /// Creates new phase statistics.
    pub fn new(phase_index: usize, phase_type: &'static str) -> Self {
        Self {
            phase_index,
            phase_type,
            start_time: Instant::now(),
            step_count: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
        }
    }

    /// Returns the elapsed time for this phase.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    /// Counts a candidate looked at, applied or not.
    pub fn record_evaluation(&mut self) {
        self.moves_evaluated += 1;
    }

    /// Counts an applied candidate previously counted as evaluated.
    pub fn record_accepted(&mut self) {
        self.moves_accepted += 1;
    }

    /// Returns the moves per second rate.
    pub fn moves_per_second(&self) -> u64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            (self.moves_evaluated as f64 / secs) as u64
        } else {
            0
        }
    }

    /// Acceptance rate formatted as a percentage, for log fields.
    pub fn acceptance_rate_pct(&self) -> String {
        if self.moves_evaluated == 0 {
            return "0.0%".to_string();
        }
        format!(
            "{:.1}%",
            self.moves_accepted as f64 / self.moves_evaluated as f64 * 100.0
        )
    }
}
