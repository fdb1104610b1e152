//! Comparators for persistence pairs.
//!
//! Pairs are ordered lexicographically on floating-point keys. In
//! [`PairOrdering::Tolerant`] mode two keys within [`EPSILON`] of each other
//! count as equal and the comparison moves on to the next key; this is the
//! historical behaviour and the default. Tolerant equality is not transitive,
//! so chains of keys spaced just under `EPSILON` apart can form cycles.
//! [`PairOrdering::Exact`] compares with [`f64::total_cmp`] and is a genuine
//! total order.
//!
//! [`stable_merge_sort_by`] is used for every pair sort in both modes: it is
//! stable, deterministic, and does not panic when handed a comparator that is
//! not a strict weak order.
//!
//! ```rust
//! use discrete_morse::persistence::ordering::{EPSILON, PairOrdering};
//! use std::cmp::Ordering;
//!
//! let tolerant = PairOrdering::Tolerant;
//! assert_eq!(tolerant.compare(1.0, 1.0 + EPSILON / 2.0), Ordering::Equal);
//! assert_eq!(PairOrdering::Exact.compare(1.0, 1.0 + EPSILON / 2.0), Ordering::Less);
//! assert!(tolerant.within_threshold(0.5 + EPSILON / 2.0, 0.5));
//! ```

#![forbid(unsafe_code)]

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Absolute tolerance for tolerant comparisons.
pub const EPSILON: f64 = 1e-8;

/// How persistence values and perturbation keys are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairOrdering {
    /// Keys within [`EPSILON`] compare equal.
    #[default]
    Tolerant,
    /// Keys compare with [`f64::total_cmp`].
    Exact,
}

impl PairOrdering {
    /// Compares two keys.
    #[must_use]
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Tolerant => tolerant_cmp(a, b),
            Self::Exact => a.total_cmp(&b),
        }
    }

    /// Compares two key sequences lexicographically, stopping at the shorter one.
    #[must_use]
    pub fn compare_keys(self, a: &[f64], b: &[f64]) -> Ordering {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| self.compare(x, y))
            .find(|&o| o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// The δ test: `persistence ≤ threshold (+ EPSILON when tolerant)`.
    #[must_use]
    pub fn within_threshold(self, persistence: f64, threshold: f64) -> bool {
        match self {
            Self::Tolerant => persistence <= threshold + EPSILON,
            Self::Exact => persistence.total_cmp(&threshold) != Ordering::Greater,
        }
    }

    /// Whether two function values coincide for the trivial-cancellation shortcut.
    #[must_use]
    pub fn same_value(self, a: f64, b: f64) -> bool {
        match self {
            Self::Tolerant => (a - b).abs() < EPSILON,
            Self::Exact => a.total_cmp(&b) == Ordering::Equal,
        }
    }

    /// Merge predicate between the heads of the two pair sequences: does the
    /// vertex–edge pair `(persistence, key)` go before the edge–triangle pair
    /// `(persistence, first key)`?
    ///
    /// Persistence is compared first, then the key, each with [`compare`](Self::compare).
    /// When both levels tie the vertex–edge pair goes first.
    #[must_use]
    pub fn min_saddle_first(self, min_saddle: (f64, f64), saddle_max: (f64, f64)) -> bool {
        let (p1, s1) = min_saddle;
        let (p2, s2) = saddle_max;
        match self.compare(p1, p2) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.compare(s1, s2) != Ordering::Greater,
        }
    }
}

/// `Less` if `a < b − ε`, `Greater` if `a > b + ε`, else `Equal`.
///
/// NaN compares equal to everything.
#[must_use]
pub fn tolerant_cmp(a: f64, b: f64) -> Ordering {
    if a < b - EPSILON {
        Ordering::Less
    } else if a > b + EPSILON {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Bottom-up stable merge sort.
///
/// An element of the right run is taken before one of the left run only when
/// `cmp(right, left)` is `Less`. Any comparator is accepted; the result is a
/// permutation of the input determined solely by the input and the comparator.
///
/// ```rust
/// use discrete_morse::persistence::ordering::stable_merge_sort_by;
///
/// let mut items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
/// stable_merge_sort_by(&mut items, |x, y| x.0.cmp(&y.0));
/// assert_eq!(items, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
/// ```
pub fn stable_merge_sort_by<T, F>(items: &mut Vec<T>, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = items.len();
    if n < 2 {
        return;
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut buffer = vec![0usize; n];
    let mut width = 1;
    while width < n {
        let mut start = 0;
        while start < n {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            let (mut i, mut j, mut k) = (start, mid, start);
            while i < mid && j < end {
                if cmp(&items[order[j]], &items[order[i]]) == Ordering::Less {
                    buffer[k] = order[j];
                    j += 1;
                } else {
                    buffer[k] = order[i];
                    i += 1;
                }
                k += 1;
            }
            let left_rest = mid - i;
            buffer[k..k + left_rest].copy_from_slice(&order[i..mid]);
            buffer[k + left_rest..end].copy_from_slice(&order[j..end]);
            start = end;
        }
        std::mem::swap(&mut order, &mut buffer);
        width *= 2;
    }

    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(order.into_iter().filter_map(|i| slots[i].take()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerant_cmp_bands() {
        assert_eq!(tolerant_cmp(0.0, 1.0), Ordering::Less);
        assert_eq!(tolerant_cmp(1.0, 0.0), Ordering::Greater);
        assert_eq!(tolerant_cmp(1.0, 1.0 + 0.5 * EPSILON), Ordering::Equal);
        assert_eq!(tolerant_cmp(1.0, 1.0 + 2.0 * EPSILON), Ordering::Less);
        assert_eq!(tolerant_cmp(f64::NAN, 0.0), Ordering::Equal);
    }

    #[test]
    fn test_compare_keys_falls_through_levels() {
        let t = PairOrdering::Tolerant;
        assert_eq!(t.compare_keys(&[1.0, 2.0], &[1.0 + 1e-9, 1.0]), Ordering::Greater);
        assert_eq!(t.compare_keys(&[1.0, 2.0], &[1.0, 2.0]), Ordering::Equal);
        assert_eq!(
            PairOrdering::Exact.compare_keys(&[1.0, 2.0], &[1.0 + 1e-9, 1.0]),
            Ordering::Less
        );
    }

    #[test]
    fn test_threshold_and_shortcut_tests() {
        assert!(PairOrdering::Tolerant.within_threshold(1e-9, 0.0));
        assert!(!PairOrdering::Exact.within_threshold(1e-9, 0.0));
        assert!(PairOrdering::Exact.within_threshold(0.0, 0.0));
        assert!(PairOrdering::Tolerant.same_value(2.0, 2.0 + 1e-9));
        assert!(!PairOrdering::Exact.same_value(2.0, 2.0 + 1e-9));
    }

    #[test]
    fn test_min_saddle_first() {
        let t = PairOrdering::Tolerant;
        assert!(t.min_saddle_first((0.1, 5.0), (0.2, 0.0)));
        assert!(!t.min_saddle_first((0.3, 0.0), (0.2, 0.0)));
        // Persistence tie: decided by the keys, with ties going to the vertex–edge pair.
        assert!(t.min_saddle_first((0.2, 1.0), (0.2 + 1e-9, 1.0)));
        assert!(!t.min_saddle_first((0.2, 1.5), (0.2, 1.0)));

        let e = PairOrdering::Exact;
        assert!(e.min_saddle_first((0.2, 1.0), (0.2, 1.0)));
        assert!(!e.min_saddle_first((0.2 + 1e-9, 0.0), (0.2, 1.0)));
    }

    #[test]
    fn test_min_saddle_first_within_epsilon_is_decided_by_keys() {
        let t = PairOrdering::Tolerant;
        let (p, near) = (0.5, 0.5 + 0.5 * EPSILON);

        // The smaller key wins whichever persistence is nudged up.
        assert!(!t.min_saddle_first((p, 2.0), (near, 1.0)));
        assert!(!t.min_saddle_first((near, 2.0), (p, 1.0)));
        assert!(t.min_saddle_first((p, 1.0), (near, 2.0)));
        assert!(t.min_saddle_first((near, 1.0), (p, 2.0)));

        // Keys within ε tie as well; the vertex–edge pair goes first.
        assert!(t.min_saddle_first((near, 1.0 + 0.5 * EPSILON), (p, 1.0)));
        assert!(t.min_saddle_first((p, 1.0), (near, 1.0 + 0.5 * EPSILON)));
    }

    #[test]
    fn test_merge_sort_is_stable_and_handles_odd_lengths() {
        let mut items: Vec<(u8, usize)> = [3, 1, 2, 1, 3, 0, 2].iter().copied().zip(0..).collect();
        stable_merge_sort_by(&mut items, |a, b| a.0.cmp(&b.0));
        assert_eq!(
            items,
            vec![(0, 5), (1, 1), (1, 3), (2, 2), (2, 6), (3, 0), (3, 4)]
        );
    }

    #[test]
    fn test_merge_sort_survives_inconsistent_comparator() {
        let mut items: Vec<u32> = (0..97).collect();
        stable_merge_sort_by(&mut items, |a, b| if (a + b) % 3 == 0 { Ordering::Less } else { Ordering::Greater });
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..97).collect::<Vec<_>>());
    }
}
