//! PeriodSet - word-packed set of period indices

use std::fmt;

use smallvec::SmallVec;

const WORD_BITS: usize = u64::BITS as usize;

/// A set of period indices stored as a bitset.
///
/// Union, size and difference-size run in O(words), which is what the
/// construction and refinement loops spend most of their time on.
/// Sets of different word lengths compare and combine as if the shorter one
/// were padded with zero words.
///
/// # Examples
///
/// ```
/// use coverforge_core::PeriodSet;
///
/// let mut active: PeriodSet = [0, 1, 5].into_iter().collect();
/// let offered: PeriodSet = [1, 2, 3].into_iter().collect();
///
/// assert_eq!(offered.difference_len(&active), 2);
/// active.union_with(&offered);
/// assert_eq!(active.len(), 5);
/// assert_eq!(active.count_below(3), 3);
/// ```
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodSet {
    words: SmallVec<[u64; 2]>,
}

impl PeriodSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `period_count` periods.
    pub fn with_capacity(period_count: usize) -> Self {
        let mut words = SmallVec::new();
        words.resize(period_count.div_ceil(WORD_BITS), 0);
        Self { words }
    }

    #[inline]
    fn locate(period: usize) -> (usize, u64) {
        (period / WORD_BITS, 1u64 << (period % WORD_BITS))
    }

    /// Inserts a period. Returns `true` if it was not present.
    pub fn insert(&mut self, period: usize) -> bool {
        let (word, mask) = Self::locate(period);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    #[inline]
    pub fn contains(&self, period: usize) -> bool {
        let (word, mask) = Self::locate(period);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    /// Number of periods in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Adds every period of `other` to `self`.
    pub fn union_with(&mut self, other: &PeriodSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (mine, theirs) in self.words.iter_mut().zip(other.words.iter()) {
            *mine |= theirs;
        }
    }

    /// Returns `self ∪ other`.
    pub fn union(&self, other: &PeriodSet) -> PeriodSet {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    /// Returns `|self \ other|`: how many periods `self` would add to `other`.
    pub fn difference_len(&self, other: &PeriodSet) -> usize {
        self.words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let theirs = other.words.get(i).copied().unwrap_or(0);
                (w & !theirs).count_ones() as usize
            })
            .sum()
    }

    /// Number of periods strictly below `bound`.
    pub fn count_below(&self, bound: usize) -> usize {
        let full = bound / WORD_BITS;
        let mut count: usize = self
            .words
            .iter()
            .take(full)
            .map(|w| w.count_ones() as usize)
            .sum();
        let rem = bound % WORD_BITS;
        if rem > 0 {
            if let Some(w) = self.words.get(full) {
                count += (w & ((1u64 << rem) - 1)).count_ones() as usize;
            }
        }
        count
    }

    /// Returns `true` if any period below `bound` is present.
    #[inline]
    pub fn any_below(&self, bound: usize) -> bool {
        self.count_below(bound) > 0
    }

    /// Number of periods `p` in the set such that `p + 1` is also present.
    pub fn adjacent_pairs(&self) -> usize {
        let mut pairs = 0usize;
        let mut carry = 0u64;
        for &w in &self.words {
            // bit i of (w << 1 | carry) is bit i-1 of the stream
            let shifted = (w << 1) | carry;
            pairs += (w & shifted).count_ones() as usize;
            carry = w >> (WORD_BITS - 1);
        }
        pairs
    }

    /// Iterates periods in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let bit = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }
}

impl PartialEq for PeriodSet {
    fn eq(&self, other: &Self) -> bool {
        let len = self.words.len().max(other.words.len());
        (0..len).all(|i| {
            self.words.get(i).copied().unwrap_or(0) == other.words.get(i).copied().unwrap_or(0)
        })
    }
}

impl Eq for PeriodSet {}

impl FromIterator<usize> for PeriodSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = PeriodSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<usize> for PeriodSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for period in iter {
            self.insert(period);
        }
    }
}

impl fmt::Debug for PeriodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
