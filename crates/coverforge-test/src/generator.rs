//! Seeded random instances.
//!
//! # Example
//!
//! ```
//! use coverforge_test::InstanceGenerator;
//!
//! let generator = InstanceGenerator::new(22, 300);
//! let a = generator.generate(7);
//! let b = generator.generate(7);
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 22);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generates per-period resource lists.
///
/// Each resource is active over one run of consecutive periods, sometimes
/// with one extra isolated period.
#[derive(Clone, Debug)]
pub struct InstanceGenerator {
    period_count: usize,
    resource_count: u32,
    min_run: usize,
    max_run: usize,
    extra_period_chance: f64,
}

impl InstanceGenerator {
    pub fn new(period_count: usize, resource_count: u32) -> Self {
        Self {
            period_count,
            resource_count,
            min_run: 1,
            max_run: period_count.max(1),
            extra_period_chance: 0.3,
        }
    }

    /// Bounds on the run length of each resource.
    pub fn with_runs(mut self, min_run: usize, max_run: usize) -> Self {
        self.min_run = min_run.max(1);
        self.max_run = max_run.max(self.min_run);
        self
    }

    pub fn with_extra_period_chance(mut self, chance: f64) -> Self {
        self.extra_period_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn generate(&self, seed: u64) -> Vec<Vec<i64>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut periods = vec![Vec::new(); self.period_count];
        if self.period_count == 0 {
            return periods;
        }

        let max_run = self.max_run.min(self.period_count);
        let min_run = self.min_run.min(max_run);
        for id in 0..self.resource_count {
            let len = rng.random_range(min_run..=max_run);
            let start = rng.random_range(0..=self.period_count - len);
            for period in periods.iter_mut().skip(start).take(len) {
                period.push(i64::from(id));
            }
            if rng.random_bool(self.extra_period_chance) {
                let extra = rng.random_range(0..self.period_count);
                if extra < start || extra >= start + len {
                    periods[extra].push(i64::from(id));
                }
            }
        }
        periods
    }
}

/// Renders period lists in the loader's text format, one line per period.
///
/// An empty period becomes an empty line, which the loader skips.
pub fn periods_to_text(periods: &[Vec<i64>]) -> String {
    let mut out = String::new();
    for ids in periods {
        let line: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_respect_bounds() {
        let periods = InstanceGenerator::new(10, 50)
            .with_runs(3, 4)
            .with_extra_period_chance(0.0)
            .generate(1);
        for id in 0..50i64 {
            let count = periods.iter().filter(|p| p.contains(&id)).count();
            assert!((3..=4).contains(&count), "resource {id} covers {count}");
        }
    }

    #[test]
    fn test_text_format() {
        let text = periods_to_text(&[vec![1, 2], vec![], vec![3]]);
        assert_eq!(text, "1 2\n\n3\n");
    }
}
