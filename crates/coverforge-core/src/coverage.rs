//! CoverageIndex - static resource → active-period view of the input

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::period::PeriodSet;

/// External identifier of a resource, as it appears in input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense position of a resource inside a [`CoverageIndex`].
pub type ResourceIdx = usize;

/// Resource → set of periods it is active in.
///
/// Built once from the raw per-period resource lists and never mutated.
/// Resources are stored densely in ascending identifier order; everything
/// downstream addresses them by [`ResourceIdx`] and only maps back to
/// [`ResourceId`] at the output boundary.
///
/// Identifiers that are negative or not below `max_resource_id` are dropped
/// silently (counted in [`dropped_count`](Self::dropped_count)). A resource
/// that appears in no period does not exist in the index.
///
/// # Examples
///
/// ```
/// use coverforge_core::{CoverageIndex, ResourceId};
///
/// let periods = vec![vec![7, 3], vec![3], vec![-1, 9999]];
/// let index = CoverageIndex::build(periods, Some(1620));
///
/// assert_eq!(index.period_count(), 3);
/// assert_eq!(index.resource_count(), 2);
/// assert_eq!(index.dropped_count(), 2);
///
/// let three = index.index_of(ResourceId(3)).unwrap();
/// assert_eq!(index.coverage(three).iter().collect::<Vec<_>>(), vec![0, 1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoverageIndex {
    period_count: usize,
    ids: Vec<ResourceId>,
    coverage: Vec<PeriodSet>,
    by_id: HashMap<ResourceId, ResourceIdx>,
    dropped: usize,
}

impl CoverageIndex {
    /// Builds the index from per-period raw identifier lists.
    ///
    /// The number of periods is the number of lists received, which may be
    /// fewer than the caller expected (partial load).
    pub fn build<P, R>(periods: P, max_resource_id: Option<u32>) -> Self
    where
        P: IntoIterator<Item = R>,
        R: IntoIterator<Item = i64>,
    {
        let mut sets: BTreeMap<ResourceId, PeriodSet> = BTreeMap::new();
        let mut period_count = 0;
        let mut dropped = 0;

        for (period, raw_ids) in periods.into_iter().enumerate() {
            period_count = period + 1;
            for raw in raw_ids {
                match Self::accept_id(raw, max_resource_id) {
                    Some(id) => {
                        sets.entry(id).or_default().insert(period);
                    }
                    None => dropped += 1,
                }
            }
        }

        let mut index = Self::from_sets(period_count, sets);
        index.dropped = dropped;
        index
    }

    /// Builds the index directly from resource coverage lists.
    ///
    /// Periods at or beyond `period_count` are ignored; resources left with
    /// no period are excluded.
    pub fn from_resources<I, P>(period_count: usize, resources: I) -> Self
    where
        I: IntoIterator<Item = (u32, P)>,
        P: IntoIterator<Item = usize>,
    {
        let mut sets: BTreeMap<ResourceId, PeriodSet> = BTreeMap::new();
        for (id, periods) in resources {
            let set = sets.entry(ResourceId(id)).or_default();
            set.extend(periods.into_iter().filter(|&p| p < period_count));
        }
        Self::from_sets(period_count, sets)
    }

    fn from_sets(period_count: usize, sets: BTreeMap<ResourceId, PeriodSet>) -> Self {
        let mut ids = Vec::with_capacity(sets.len());
        let mut coverage = Vec::with_capacity(sets.len());
        for (id, set) in sets {
            if set.is_empty() {
                continue;
            }
            ids.push(id);
            coverage.push(set);
        }
        let by_id = ids.iter().enumerate().map(|(idx, &id)| (id, idx)).collect();

        Self {
            period_count,
            ids,
            coverage,
            by_id,
            dropped: 0,
        }
    }

    fn accept_id(raw: i64, max_resource_id: Option<u32>) -> Option<ResourceId> {
        let id = u32::try_from(raw).ok()?;
        match max_resource_id {
            Some(max) if id >= max => None,
            _ => Some(ResourceId(id)),
        }
    }

    /// Number of periods N the index was built over.
    #[inline]
    pub fn period_count(&self) -> usize {
        self.period_count
    }

    /// Number of distinct resources.
    #[inline]
    pub fn resource_count(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of raw identifiers rejected while building.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// External identifier of the resource at `idx`.
    #[inline]
    pub fn id(&self, idx: ResourceIdx) -> ResourceId {
        self.ids[idx]
    }

    /// Dense index of an external identifier, if present.
    pub fn index_of(&self, id: ResourceId) -> Option<ResourceIdx> {
        self.by_id.get(&id).copied()
    }

    /// Periods the resource at `idx` is active in.
    #[inline]
    pub fn coverage(&self, idx: ResourceIdx) -> &PeriodSet {
        &self.coverage[idx]
    }

    /// Iterates `(index, id, coverage)` in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceIdx, ResourceId, &PeriodSet)> + '_ {
        self.ids
            .iter()
            .zip(self.coverage.iter())
            .enumerate()
            .map(|(idx, (&id, set))| (idx, id, set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sorts_and_interns() {
        let periods = vec![vec![5, 2], vec![2, 5, 5], vec![9]];
        let index = CoverageIndex::build(periods, None);

        assert_eq!(index.period_count(), 3);
        assert_eq!(index.resource_count(), 3);
        assert_eq!(index.id(0), ResourceId(2));
        assert_eq!(index.id(2), ResourceId(9));
        assert_eq!(index.coverage(1).len(), 2);
        assert_eq!(index.index_of(ResourceId(9)), Some(2));
        assert_eq!(index.index_of(ResourceId(4)), None);
    }

    #[test]
    fn test_out_of_range_ids_dropped() {
        let periods = vec![vec![-3, 0, 1620, 1619]];
        let index = CoverageIndex::build(periods, Some(1620));
        assert_eq!(index.resource_count(), 2);
        assert_eq!(index.dropped_count(), 2);
    }

    #[test]
    fn test_empty_periods_still_count() {
        let periods: Vec<Vec<i64>> = vec![vec![], vec![1], vec![]];
        let index = CoverageIndex::build(periods, None);
        assert_eq!(index.period_count(), 3);
        assert_eq!(index.resource_count(), 1);
    }

    #[test]
    fn test_from_resources_filters_out_of_horizon() {
        let index = CoverageIndex::from_resources(2, vec![(1, vec![0, 1, 4]), (2, vec![7])]);
        assert_eq!(index.resource_count(), 1);
        assert_eq!(index.coverage(0).len(), 2);
    }
}
