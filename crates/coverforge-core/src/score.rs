//! HardSoftScore - two-level measure of an assignment

use std::cmp::Ordering;
use std::fmt;

/// A score with separate hard and soft levels.
///
/// Hard counts broken constraints (agents without window coverage plus idle
/// periods beyond the budget); soft counts distance from the per-agent
/// targets. Both are non-positive, zero is perfect.
///
/// When comparing scores:
/// 1. Hard scores are compared first
/// 2. Soft scores are only compared when hard scores are equal
///
/// # Examples
///
/// ```
/// use coverforge_core::HardSoftScore;
///
/// let broken = HardSoftScore::of(-1, 0);
/// let feasible = HardSoftScore::of(0, -12);
///
/// assert!(feasible > broken);
/// assert!(feasible.is_feasible());
/// assert_eq!(feasible.to_string(), "0hard/-12soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftScore {
    hard: i64,
    soft: i64,
}

impl HardSoftScore {
    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftScore { hard, soft }
    }

    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }

    /// No hard constraint is broken.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard >= 0
    }
}

impl Ord for HardSoftScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => self.soft.cmp(&other.soft),
            other => other,
        }
    }
}

impl PartialOrd for HardSoftScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardSoftScore({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_dominates() {
        assert!(HardSoftScore::of(0, -100) > HardSoftScore::of(-1, 0));
        assert!(HardSoftScore::of(-1, -1) < HardSoftScore::of(-1, 0));
    }
}
