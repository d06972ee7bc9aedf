/*!

Robust Rank Aggregation (RRA).

Given many ranked lists of items, and a grouping of the items (for example the
guides of a CRISPR screen grouped by target gene, measured in several screens),
this crate finds the groups whose items are consistently ranked near the top of
their lists, more often than chance would predict.

The computation has three stages:
- every item gets the mid-rank percentile of its value within its list,
- every group gets a lo-value: the smallest order-statistic probability among
  its top percentiles,
- every group gets an empirical false discovery rate, calibrated against
  lo-values simulated under the null hypothesis.

```
use robust_rank::builder::Builder;
use robust_rank::*;

let mut builder = Builder::new(&RraOptions::DEFAULT_OPTIONS)?;
for (item, group, value) in [("a1", "A", 1.0), ("a2", "A", 2.0), ("b1", "B", 9.0), ("b2", "B", 8.0)] {
    builder.add_item(item, group, "screen", value)?;
}
let summaries = run_rra(builder.build()?, &RraOptions::DEFAULT_OPTIONS)?;
assert_eq!(summaries[0].name, "A");
# Ok::<(), RraError>(())
```

See the [manual] for the meaning of the options.
*/

mod config;
use log::{debug, info};

pub mod beta;
pub mod builder;
pub mod fdr;
pub mod lo_value;
pub mod manual;
pub mod order_stats;
pub mod percentile;
pub mod rng;

pub use crate::config::*;
use crate::fdr::FdrEstimator;

/// Runs the full aggregation on a dataset.
///
/// Returns one summary per group, sorted by increasing lo-value. Nothing is
/// returned if any stage fails.
///
/// Arguments:
/// * `dataset` the groups and lists, as produced by the builder
/// * `options` the parameters of the aggregation
pub fn run_rra(dataset: Dataset, options: &RraOptions) -> Result<Vec<GroupSummary>, RraError> {
    options.validate()?;
    let Dataset {
        mut groups,
        mut lists,
    } = dataset;
    info!(
        "run_rra: {} groups, {} lists, options: {:?}",
        groups.len(),
        lists.len(),
        options
    );
    if groups.is_empty() {
        return Err(RraError::EmptyDataset);
    }

    info!("computing lo-values for each group");
    percentile::assign_percentiles(&mut groups, &mut lists)?;
    lo_value::assign_lo_values(&mut groups, options.max_percentile)?;

    info!("computing false discovery rate");
    let source = rng::make_source(options.generator, options.seed)?;
    let mut estimator = FdrEstimator::new(source, options.max_percentile)?;
    let num_rand_pass = options.num_rand_pass(groups.len())?;
    estimator.estimate(&mut groups, num_rand_pass)?;

    let summaries: Vec<GroupSummary> = groups
        .into_iter()
        .map(|g| GroupSummary {
            item_count: g.items.len(),
            name: g.name,
            lo_value: g.lo_value,
            fdr: g.fdr,
        })
        .collect();
    for s in summaries.iter().take(10) {
        debug!(
            "run_rra: top group {}: {} items, lo-value {:e}, fdr {}",
            s.name, s.item_count, s.lo_value, s.fdr
        );
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::builder::Builder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // Three screens. Genes "hit1" and "hit2" are ranked at the top of every screen,
    // the other genes are spread over the rest.
    fn screen_dataset(options: &RraOptions) -> Dataset {
        let mut b = Builder::new(options).unwrap();
        for screen in 0..3 {
            let list = format!("screen{}", screen);
            let mut value = 0.0;
            for hit in ["hit1", "hit2"] {
                for k in 0..4 {
                    value += 1.0;
                    b.add_item(&format!("{}_{}", hit, k), hit, &list, value)
                        .unwrap();
                }
            }
            for gene in 0..30 {
                for k in 0..4 {
                    // Interleave the remaining genes.
                    let v = 100.0 + (((gene * 7 + k * 13 + screen * 5) % 120) as f64);
                    b.add_item(
                        &format!("gene{}_{}", gene, k),
                        &format!("gene{}", gene),
                        &list,
                        v,
                    )
                    .unwrap();
                }
            }
        }
        b.build().unwrap()
    }

    #[test]
    fn top_ranked_groups_come_first() {
        init();
        let options = RraOptions::DEFAULT_OPTIONS;
        let res = run_rra(screen_dataset(&options), &options).unwrap();
        assert_eq!(res.len(), 32);
        let top: Vec<&str> = res.iter().take(2).map(|s| s.name.as_str()).collect();
        assert!(top.contains(&"hit1") && top.contains(&"hit2"), "{:?}", top);
        assert_eq!(res[0].item_count, 12);
        assert!(res[0].fdr < res[31].fdr);
        for w in res.windows(2) {
            assert!(w[0].lo_value <= w[1].lo_value);
            assert!(w[0].fdr <= w[1].fdr);
        }
        assert!(res.iter().all(|s| (0.0..=1.0).contains(&s.fdr)));
    }

    #[test]
    fn bit_identical_runs() {
        init();
        let options = RraOptions {
            rand_passes_per_group: 20,
            ..RraOptions::DEFAULT_OPTIONS
        };
        let r1 = run_rra(screen_dataset(&options), &options).unwrap();
        let r2 = run_rra(screen_dataset(&options), &options).unwrap();
        assert_eq!(r1, r2);
        let f1: Vec<u64> = r1.iter().map(|s| s.fdr.to_bits()).collect();
        let f2: Vec<u64> = r2.iter().map(|s| s.fdr.to_bits()).collect();
        assert_eq!(f1, f2);
    }

    #[test]
    fn xoshiro_generator() {
        init();
        let options = RraOptions {
            generator: NullGenerator::Xoshiro,
            rand_passes_per_group: 20,
            ..RraOptions::DEFAULT_OPTIONS
        };
        let res = run_rra(screen_dataset(&options), &options).unwrap();
        assert!(res.windows(2).all(|w| w[0].fdr <= w[1].fdr));
    }

    #[test]
    fn rejects_bad_options() {
        let options = RraOptions::DEFAULT_OPTIONS;
        let ds = screen_dataset(&options);
        let bad = RraOptions {
            max_percentile: -0.5,
            ..RraOptions::DEFAULT_OPTIONS
        };
        assert_eq!(
            run_rra(ds.clone(), &bad),
            Err(RraError::InvalidMaxPercentile(-0.5))
        );
        let bad_seed = RraOptions {
            seed: 0,
            ..RraOptions::DEFAULT_OPTIONS
        };
        assert_eq!(run_rra(ds, &bad_seed), Err(RraError::InvalidSeed(0)));
    }

    #[test]
    fn huge_pass_count_is_an_error() {
        let options = RraOptions {
            rand_passes_per_group: usize::MAX,
            ..RraOptions::DEFAULT_OPTIONS
        };
        let ds = screen_dataset(&options);
        assert_eq!(run_rra(ds, &options), Err(RraError::PassCountOverflow));

        let options = RraOptions {
            num_rand_pass: Some(usize::MAX),
            ..RraOptions::DEFAULT_OPTIONS
        };
        let ds = screen_dataset(&options);
        assert_eq!(run_rra(ds, &options), Err(RraError::PassCountOverflow));
    }

    #[test]
    fn empty_group_aborts() {
        let mut ds = screen_dataset(&RraOptions::DEFAULT_OPTIONS);
        ds.groups.push(Group::new("ghost"));
        assert_eq!(
            run_rra(ds, &RraOptions::DEFAULT_OPTIONS),
            Err(RraError::EmptyGroup("ghost".to_string()))
        );
    }
}
