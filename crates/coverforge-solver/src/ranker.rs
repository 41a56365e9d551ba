//! EfficiencyRanker - orders resources by their value for the window and
//! coverage constraints.
//!
//! The score of a resource with coverage set `P` is
//!
//! ```text
//! coverage_weight     * |P|
//! window_period_bonus * |P ∩ window|
//! full_window_bonus   if P ⊇ window (non-empty window)
//! near_band_bonus     if |P| ∈ [low, high + 1]
//! wide_band_bonus     else if |P| ∈ [low - margin, low)
//! continuity_weight   * adjacent period pairs in P
//! ```
//!
//! Ordering is score descending, then coverage count descending, then
//! identifier ascending.

use std::cmp::Ordering;

use coverforge_config::RankingConfig;
use coverforge_core::{CoverageIndex, PeriodSet, ResourceIdx};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::quota::TierSplit;

/// Coverage counts considered close to a typical agent target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetBand {
    pub low: usize,
    pub high: usize,
}

impl TargetBand {
    pub fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }
}

impl From<&TierSplit> for TargetBand {
    fn from(split: &TierSplit) -> Self {
        Self::new(split.low_target, split.high_target)
    }
}

/// One entry of a [`Ranking`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedResource {
    pub resource: ResourceIdx,
    pub score: f64,
    pub coverage: usize,
    pub window_periods: usize,
}

/// Resources in rank order, best first.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    entries: Vec<RankedResource>,
    position: Vec<Option<usize>>,
}

impl Ranking {
    fn from_entries(entries: Vec<RankedResource>, resource_count: usize) -> Self {
        let mut position = vec![None; resource_count];
        for (pos, entry) in entries.iter().enumerate() {
            position[entry.resource] = Some(pos);
        }
        Self { entries, position }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, rank: usize) -> Option<&RankedResource> {
        self.entries.get(rank)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedResource> {
        self.entries.iter()
    }

    /// Resource indices in rank order.
    pub fn resources(&self) -> impl Iterator<Item = ResourceIdx> + '_ {
        self.entries.iter().map(|e| e.resource)
    }

    /// Rank of a resource, `None` if it was excluded.
    pub fn rank_of(&self, resource: ResourceIdx) -> Option<usize> {
        self.position.get(resource).copied().flatten()
    }
}

/// Scores and orders resources.
///
/// # Examples
///
/// ```
/// use coverforge_config::RankingConfig;
/// use coverforge_core::CoverageIndex;
/// use coverforge_solver::ranker::{EfficiencyRanker, TargetBand};
///
/// let index = CoverageIndex::from_resources(6, vec![
///     (1, vec![4, 5]),
///     (2, vec![0, 1]),
/// ]);
/// let ranker = EfficiencyRanker::new(RankingConfig::default(), 2, TargetBand::new(4, 5));
/// let ranking = ranker.rank(&index);
///
/// // the window resource wins despite equal coverage
/// assert_eq!(ranking.resources().collect::<Vec<_>>(), vec![1, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct EfficiencyRanker {
    config: RankingConfig,
    window_len: usize,
    band: TargetBand,
}

impl EfficiencyRanker {
    /// `window_len` is the effective window length, already clamped to the
    /// number of periods.
    pub fn new(config: RankingConfig, window_len: usize, band: TargetBand) -> Self {
        Self {
            config,
            window_len,
            band,
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Scalar score of one coverage set.
    pub fn score(&self, coverage: &PeriodSet) -> f64 {
        let c = &self.config;
        let count = coverage.len();
        let window_periods = coverage.count_below(self.window_len);

        let mut score = c.coverage_weight * count as f64;
        score += c.window_period_bonus * window_periods as f64;
        if self.window_len > 0 && window_periods == self.window_len {
            score += c.full_window_bonus;
        }
        if count >= self.band.low && count <= self.band.high + 1 {
            score += c.near_band_bonus;
        } else if count < self.band.low && count + c.wide_band_margin >= self.band.low {
            score += c.wide_band_bonus;
        }
        score += c.continuity_weight * coverage.adjacent_pairs() as f64;
        score
    }

    /// Ranks every eligible resource deterministically.
    pub fn rank(&self, index: &CoverageIndex) -> Ranking {
        let entries = self.sorted_entries(index);
        Ranking::from_entries(entries, index.resource_count())
    }

    /// Like [`rank`](Self::rank), but runs of exact ties (same score and
    /// same coverage count) are shuffled with `rng`.
    pub fn rank_shuffled<R: Rng + ?Sized>(&self, index: &CoverageIndex, rng: &mut R) -> Ranking {
        let mut entries = self.sorted_entries(index);
        let mut start = 0;
        while start < entries.len() {
            let mut end = start + 1;
            while end < entries.len() && Self::is_tie(&entries[start], &entries[end]) {
                end += 1;
            }
            if end - start > 1 {
                entries[start..end].shuffle(rng);
            }
            start = end;
        }
        Ranking::from_entries(entries, index.resource_count())
    }

    fn sorted_entries(&self, index: &CoverageIndex) -> Vec<RankedResource> {
        let mut entries: Vec<RankedResource> = index
            .iter()
            .filter_map(|(resource, _, coverage)| {
                let window_periods = coverage.count_below(self.window_len);
                if self.config.window_only && self.window_len > 0 && window_periods == 0 {
                    return None;
                }
                Some(RankedResource {
                    resource,
                    score: self.score(coverage),
                    coverage: coverage.len(),
                    window_periods,
                })
            })
            .collect();

        // dense indices follow ascending identifiers
        entries.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.coverage.cmp(&a.coverage))
                .then_with(|| a.resource.cmp(&b.resource))
        });
        entries
    }

    fn is_tie(a: &RankedResource, b: &RankedResource) -> bool {
        a.score.total_cmp(&b.score) == Ordering::Equal && a.coverage == b.coverage
    }
}
