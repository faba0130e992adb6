// File: src/core/table.rs
use crate::core::types::{Count, FrequencyEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::Take;
use std::slice::Iter;

/// An immutable mapping from single characters to occurrence counts.
///
/// Built once (by [`crate::core::parser::load`], a merge, or a
/// [`crate::core::counter::CharCounter`]) and read-only afterwards. The rank
/// order and the total are computed at construction, so every query takes
/// `&self` and a table can be shared across threads without locking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<char, Count>", into = "BTreeMap<char, Count>")]
pub struct FrequencyTable {
    counts: BTreeMap<char, Count>,
    /// Count descending, then code point ascending.
    ranked: Vec<FrequencyEntry>,
    total: Count,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point lookup. `None` means the character was never counted.
    pub fn get(&self, character: char) -> Option<Count> {
        self.counts.get(&character).copied()
    }

    pub fn contains(&self, character: char) -> bool {
        self.counts.contains_key(&character)
    }

    /// The top `n` entries. Equal counts are ordered by code point so the
    /// result is the same on every run and platform.
    ///
    /// The returned iterator is lazy and `Clone`; cloning it before
    /// consuming restarts the sequence.
    pub fn rank(&self, n: usize) -> Ranking<'_> {
        Ranking {
            inner: self.ranked.iter().take(n),
        }
    }

    /// Every entry in rank order.
    pub fn ranked(&self) -> Ranking<'_> {
        self.rank(self.ranked.len())
    }

    /// Sum of all counts.
    pub fn total_count(&self) -> Count {
        self.total
    }

    /// `count / total`, for display. `None` when absent or the table sums to zero.
    pub fn frequency(&self, character: char) -> Option<f64> {
        let count = self.get(character)?;
        if self.total == 0 {
            return None;
        }
        Some(count as f64 / self.total as f64)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in code-point order.
    pub fn iter(&self) -> impl Iterator<Item = FrequencyEntry> + '_ {
        self.counts
            .iter()
            .map(|(&character, &count)| FrequencyEntry { character, count })
    }

    pub(crate) fn counts(&self) -> &BTreeMap<char, Count> {
        &self.counts
    }
}

impl From<BTreeMap<char, Count>> for FrequencyTable {
    fn from(counts: BTreeMap<char, Count>) -> Self {
        let mut ranked: Vec<FrequencyEntry> = counts
            .iter()
            .map(|(&character, &count)| FrequencyEntry { character, count })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.character.cmp(&b.character)));

        let total = counts.values().fold(0, |acc: Count, &c| acc.saturating_add(c));

        Self {
            counts,
            ranked,
            total,
        }
    }
}

impl From<FrequencyTable> for BTreeMap<char, Count> {
    fn from(table: FrequencyTable) -> Self {
        table.counts
    }
}

/// Lazy, restartable view over a table's entries in rank order.
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    inner: Take<Iter<'a, FrequencyEntry>>,
}

impl Iterator for Ranking<'_> {
    type Item = FrequencyEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Ranking<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(char, Count)]) -> FrequencyTable {
        pairs.iter().copied().collect::<BTreeMap<_, _>>().into()
    }

    #[test]
    fn get_distinguishes_absent_from_zero() {
        let t = table(&[('我', 513), ('零', 0)]);
        assert_eq!(t.get('我'), Some(513));
        assert_eq!(t.get('零'), Some(0));
        assert_eq!(t.get('彼'), None);
        assert!(!t.contains('彼'));
    }

    #[test]
    fn rank_breaks_ties_by_code_point() {
        let t = table(&[('c', 5), ('a', 5), ('z', 9), ('b', 1), ('d', 5)]);
        let got: Vec<char> = t.ranked().map(|e| e.character).collect();
        assert_eq!(got, vec!['z', 'a', 'c', 'd', 'b']);
    }

    #[test]
    fn rank_is_truncated_and_restartable() {
        let t = table(&[('a', 3), ('b', 2), ('c', 1)]);

        let top = t.rank(2);
        assert_eq!(top.len(), 2);

        let mut first = top.clone();
        assert_eq!(first.next(), Some(FrequencyEntry::new('a', 3)));

        let again: Vec<_> = top.collect();
        assert_eq!(
            again,
            vec![FrequencyEntry::new('a', 3), FrequencyEntry::new('b', 2)]
        );

        assert_eq!(t.rank(10).count(), 3);
        assert_eq!(t.rank(0).count(), 0);
    }

    #[test]
    fn total_is_sum_and_stable() {
        let t = table(&[('a', 3), ('b', 2), ('c', 0)]);
        assert_eq!(t.total_count(), 5);
        assert_eq!(t.total_count(), 5);
        assert_eq!(FrequencyTable::new().total_count(), 0);
    }

    #[test]
    fn total_saturates() {
        let t = table(&[('a', Count::MAX), ('b', 1)]);
        assert_eq!(t.total_count(), Count::MAX);
    }

    #[test]
    fn frequency_normalises_by_total() {
        let t = table(&[('a', 1), ('b', 3)]);
        assert_eq!(t.frequency('b'), Some(0.75));
        assert_eq!(t.frequency('x'), None);
        assert_eq!(table(&[('a', 0)]).frequency('a'), None);
    }

    #[test]
    fn iter_is_code_point_order() {
        let t = table(&[('彼', 1), ('我', 2), ('a', 3)]);
        let got: Vec<char> = t.iter().map(|e| e.character).collect();
        assert_eq!(got, vec!['a', '彼', '我']);
    }

    #[test]
    fn shared_across_threads() {
        let t = table(&[('我', 513), ('彼', 432)]);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert_eq!(t.get('我'), Some(513));
                    assert_eq!(t.rank(1).next().map(|e| e.character), Some('我'));
                });
            }
        });
    }
}
