//! Empirical false discovery rates of the groups.
//!
//! The null distribution of the lo-value depends on the size of the group, and
//! has no convenient closed form. It is approximated by simulation: every real
//! group is replayed with uniform percentiles, keeping its size, and the
//! resulting lo-values are pooled. Each real group is then calibrated by the
//! rank of its lo-value in the pool.

use log::{debug, info, warn};

use crate::config::*;
use crate::lo_value::compute_lo_value;
use crate::order_stats::{mid_rank, sort_values};
use crate::rng::UniformSource;

/// Holds the generator for the null simulation.
///
/// The generator is seeded once at construction and advanced by every draw.
pub struct FdrEstimator<R: UniformSource> {
    source: R,
    max_percentile: f64,
}

impl<R: UniformSource> FdrEstimator<R> {
    pub fn new(source: R, max_percentile: f64) -> Result<FdrEstimator<R>, RraError> {
        check_max_percentile(max_percentile)?;
        Ok(FdrEstimator {
            source,
            max_percentile,
        })
    }

    /// Simulates `scan_pass` null lo-values for each group size in `group_sizes`,
    /// pass after pass, and returns them sorted.
    pub fn null_lo_values(
        &mut self,
        group_sizes: &[usize],
        scan_pass: usize,
    ) -> Result<Vec<f64>, RraError> {
        let max_size = group_sizes.iter().cloned().max().unwrap_or(0);
        let mut percentiles: Vec<f64> = Vec::with_capacity(max_size);
        let pool_size = group_sizes
            .len()
            .checked_mul(scan_pass)
            .ok_or(RraError::PassCountOverflow)?;
        let mut pool: Vec<f64> = Vec::new();
        pool.try_reserve_exact(pool_size)
            .map_err(|_| RraError::PassCountOverflow)?;
        for _ in 0..scan_pass {
            for &n in group_sizes {
                percentiles.clear();
                for _ in 0..n {
                    percentiles.push(self.source.uniform(0.0, 1.0));
                }
                pool.push(compute_lo_value(&percentiles, self.max_percentile)?);
            }
        }
        sort_values(&mut pool);
        Ok(pool)
    }

    /// Computes the FDR of every group, using about `num_rand_pass` null lo-values.
    ///
    /// The lo-values of the groups must already be filled. As a side effect, the
    /// groups are sorted by increasing lo-value.
    pub fn estimate(&mut self, groups: &mut [Group], num_rand_pass: usize) -> Result<(), RraError> {
        if groups.is_empty() {
            return Err(RraError::EmptyDataset);
        }
        if let Some(g) = groups.iter().find(|g| g.items.is_empty()) {
            return Err(RraError::EmptyGroup(g.name.clone()));
        }
        let group_count = groups.len();
        let scan_pass = scan_pass_count(num_rand_pass, group_count)?;
        info!(
            "estimate: {} groups, {} null passes ({} null lo-values)",
            group_count,
            scan_pass,
            scan_pass * group_count
        );

        let group_sizes: Vec<usize> = groups.iter().map(|g| g.items.len()).collect();
        let pool = self.null_lo_values(&group_sizes, scan_pass)?;
        debug!(
            "estimate: null lo-values range from {:e} to {:e}",
            pool.first().cloned().unwrap_or(f64::NAN),
            pool.last().cloned().unwrap_or(f64::NAN)
        );

        groups.sort_by(|g1, g2| g1.lo_value.total_cmp(&g2.lo_value));
        let num_ties = groups
            .windows(2)
            .filter(|w| w[0].lo_value == w[1].lo_value)
            .count();
        if num_ties > 0 {
            warn!(
                "estimate: {} groups share their lo-value with the previous group",
                num_ties
            );
        }

        let lo_values: Vec<f64> = groups.iter().map(|g| g.lo_value).collect();
        let fdrs = calibrate(&lo_values, &pool);
        for (group, fdr) in groups.iter_mut().zip(fdrs) {
            group.fdr = fdr;
        }
        Ok(())
    }
}

/// The number of null passes so that at least `num_rand_pass` null lo-values
/// are drawn.
pub fn scan_pass_count(num_rand_pass: usize, group_count: usize) -> Result<usize, RraError> {
    if group_count == 0 {
        return Err(RraError::EmptyDataset);
    }
    if num_rand_pass == 0 {
        return Err(RraError::InvalidPassCount);
    }
    Ok(num_rand_pass / group_count + usize::from(num_rand_pass % group_count != 0))
}

/// Turns sorted lo-values into FDRs against a sorted pool of null lo-values.
///
/// The `i`-th lo-value gets `rank / poolSize / (i + 0.5) * groupCount`, where
/// `rank` is its mid-rank in the pool. The values are then capped at 1 and
/// made non-decreasing with a backward running minimum.
pub fn calibrate(sorted_lo_values: &[f64], sorted_pool: &[f64]) -> Vec<f64> {
    let group_count = sorted_lo_values.len() as f64;
    let pool_size = sorted_pool.len() as f64;
    let mut fdrs: Vec<f64> = sorted_lo_values
        .iter()
        .enumerate()
        .map(|(i, &lo)| mid_rank(lo, sorted_pool) / pool_size / (i as f64 + 0.5) * group_count)
        .collect();

    if let Some(last) = fdrs.last_mut() {
        if *last > 1.0 {
            *last = 1.0;
        }
    }
    for i in (0..fdrs.len().saturating_sub(1)).rev() {
        if fdrs[i] > fdrs[i + 1] {
            fdrs[i] = fdrs[i + 1];
        }
    }
    fdrs
}
