//! Top-K selection over metric columns
//!
//! A bounded binary heap keeps the K best values seen so far, so selecting the
//! best candidates of a long search is O(N log K) instead of a full sort.
//! Ties are broken by row order: the earlier evaluation ranks first.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Sort order for Top-K selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending order (smallest K values)
    Ascending,
    /// Descending order (largest K values)
    #[default]
    Descending,
}

// Heap item ranked by how bad it is for the requested order; the worst
// retained item sits at the top of the heap and is evicted first.
#[derive(Debug)]
struct RankedItem {
    value: f64,
    index: usize,
    order: SortOrder,
}

impl RankedItem {
    fn beats(&self, other: &Self) -> bool {
        match self.order {
            SortOrder::Descending => self.value > other.value,
            SortOrder::Ascending => self.value < other.value,
        }
    }
}

impl PartialEq for RankedItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedItem {}

impl Ord for RankedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_value = match self.order {
            SortOrder::Descending => other.value.total_cmp(&self.value),
            SortOrder::Ascending => self.value.total_cmp(&other.value),
        };
        by_value.then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for RankedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Indices of the `k` best values in `values`, best first.
///
/// NaN values never rank. Returns fewer than `k` indices when the input is
/// shorter; `k == 0` yields an empty selection.
///
/// # Examples
///
/// ```rust
/// use gama_report::topk::{top_k_indices, SortOrder};
///
/// let scores = [0.7, 0.9, 0.8, 0.9];
/// assert_eq!(top_k_indices(&scores, 3, SortOrder::Descending), vec![1, 3, 2]);
/// assert_eq!(top_k_indices(&scores, 1, SortOrder::Ascending), vec![0]);
/// ```
#[must_use]
pub fn top_k_indices(values: &[f64], k: usize, order: SortOrder) -> Vec<usize> {
    if k == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<RankedItem> = BinaryHeap::with_capacity(k.min(values.len()));
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        let item = RankedItem {
            value,
            index,
            order,
        };

        if heap.len() < k {
            heap.push(item);
        } else if let Some(top) = heap.peek() {
            if item.beats(top) {
                heap.pop();
                heap.push(item);
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|item| item.index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_descending_basic() {
        let values = [1.0, 5.0, 3.0, 9.0, 2.0];
        assert_eq!(top_k_indices(&values, 3, SortOrder::Descending), vec![3, 1, 2]);
    }

    #[test]
    fn test_top_k_ascending_basic() {
        let values = [1.0, 5.0, 3.0, 9.0, 2.0];
        assert_eq!(top_k_indices(&values, 2, SortOrder::Ascending), vec![0, 4]);
    }

    #[test]
    fn test_top_k_ties_prefer_earlier_rows() {
        let values = [0.5, 0.5, 0.5, 0.1];
        assert_eq!(top_k_indices(&values, 2, SortOrder::Descending), vec![0, 1]);
    }

    #[test]
    fn test_top_k_k_greater_than_length() {
        let values = [2.0, 1.0];
        assert_eq!(top_k_indices(&values, 10, SortOrder::Descending), vec![0, 1]);
    }

    #[test]
    fn test_top_k_skips_nan() {
        let values = [f64::NAN, 1.0, f64::NAN];
        assert_eq!(top_k_indices(&values, 3, SortOrder::Descending), vec![1]);
    }

    #[test]
    fn test_top_k_zero() {
        assert!(top_k_indices(&[1.0], 0, SortOrder::Descending).is_empty());
    }
}
