// Sorting and searching primitives shared by the percentile and FDR stages.

use crate::config::EPSILON;

/// Sorts the values in increasing order, in place.
///
/// Ties carry no meaning here, so the sort is not stable. The underlying
/// pattern-defeating quicksort falls back to heapsort, which bounds the
/// worst case on sorted or adversarial input.
pub fn sort_values(values: &mut [f64]) {
    values.sort_unstable_by(|a, b| a.total_cmp(b));
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut res = values.to_vec();
    sort_values(&mut res);
    res
}

/// The number of elements strictly smaller than `threshold` in a sorted slice.
///
/// This is the insertion point of `threshold` found by binary search.
pub fn rank_below(threshold: f64, sorted_values: &[f64]) -> usize {
    sorted_values.partition_point(|v| *v < threshold)
}

/// The mid-rank of `value` within `sorted_values`, counted from 1.
///
/// Values within `EPSILON` of `value` form a tied block and all get the
/// average rank of the block. When `value` is absent, this is the position
/// where it would be inserted, plus one half.
pub fn mid_rank(value: f64, sorted_values: &[f64]) -> f64 {
    let below = rank_below(value - EPSILON, sorted_values);
    let above = rank_below(value + EPSILON, sorted_values);
    (below + above + 1) as f64 / 2.0
}
