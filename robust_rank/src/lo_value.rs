use log::debug;

use crate::beta::beta_noncentral_cdf;
use crate::config::*;
use crate::order_stats::sorted_copy;

/// Computes the lo-value of a set of percentiles.
///
/// The percentiles are sorted, then for each order statistic `p_(i)` (0-based)
/// the probability that the `(i+1)`-th smallest of `n` uniform draws is at most
/// `p_(i)` is evaluated. The lo-value is the smallest of these probabilities.
///
/// The scan stops at the first order statistic above `max_percentile`, except
/// for the first one which is always evaluated.
pub fn compute_lo_value(percentiles: &[f64], max_percentile: f64) -> Result<f64, RraError> {
    check_max_percentile(max_percentile)?;
    if percentiles.is_empty() {
        return Err(RraError::EmptyPercentiles);
    }
    let sorted = sorted_copy(percentiles);
    let n = sorted.len();

    let mut lo_value: f64 = 1.0;
    for (i, &p) in sorted.iter().enumerate() {
        if p > max_percentile && i > 0 {
            break;
        }
        let prob = beta_noncentral_cdf((i + 1) as f64, (n - i) as f64, 0.0, p, CDF_MAX_ERROR)?;
        if prob < lo_value {
            lo_value = prob;
        }
    }
    Ok(lo_value)
}

/// Fills the lo-value of every group from the percentiles of its items.
pub fn assign_lo_values(groups: &mut [Group], max_percentile: f64) -> Result<(), RraError> {
    for group in groups.iter_mut() {
        if group.items.is_empty() {
            return Err(RraError::EmptyGroup(group.name.clone()));
        }
        group.lo_value = compute_lo_value(&group.percentiles(), max_percentile)?;
        debug!(
            "assign_lo_values: group {}: {} items, lo-value {:e}",
            group.name,
            group.items.len(),
            group.lo_value
        );
    }
    Ok(())
}
