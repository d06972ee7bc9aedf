// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Half-width of the bracket used around a value when counting ranks.
///
/// Counting the values strictly below `x - EPSILON` and strictly below `x + EPSILON`
/// brackets the block of values tied with `x`, which gives a mid-rank.
pub const EPSILON: f64 = 0.000000001;

/// Maximum absolute error requested from the Beta CDF evaluator.
pub const CDF_MAX_ERROR: f64 = 1E-10;

pub const DEFAULT_MAX_PERCENTILE: f64 = 0.25;
pub const DEFAULT_SEED: u64 = 123456;
/// Number of null simulation passes per group.
pub const RAND_PASS_NUM: usize = 100;
pub const MAX_GROUP_NUM: usize = 100000;
pub const MAX_LIST_NUM: usize = 1000;

/// One observation: an item measured in one list.
#[derive(PartialEq, Debug, Clone)]
pub struct Item {
    pub name: String,
    /// Index of the list this item was measured in.
    pub list_index: usize,
    pub value: f64,
    /// Mid-rank fraction of the value in its list, in (0, 1].
    /// Zero until the percentiles are computed.
    pub percentile: f64,
}

/// A named collection of items aggregated together (for example all the
/// guides targeting one gene).
#[derive(PartialEq, Debug, Clone)]
pub struct Group {
    pub name: String,
    pub items: Vec<Item>,
    /// Lower is more significant.
    pub lo_value: f64,
    pub fdr: f64,
}

impl Group {
    pub fn new(name: &str) -> Group {
        Group {
            name: name.to_string(),
            items: Vec::new(),
            lo_value: 1.0,
            fdr: 1.0,
        }
    }

    pub fn percentiles(&self) -> Vec<f64> {
        self.items.iter().map(|it| it.percentile).collect()
    }
}

/// A ranking context: all the values measured in one screen or replicate.
///
/// Percentiles can only be computed against a sorted list. Adding a value
/// invalidates the ordering until `sort` is called again.
#[derive(PartialEq, Debug, Clone)]
pub struct List {
    pub name: String,
    values: Vec<f64>,
    sorted: bool,
}

impl List {
    pub fn new(name: &str) -> List {
        List {
            name: name.to_string(),
            values: Vec::new(),
            sorted: true,
        }
    }

    pub fn push(&mut self, value: f64) {
        if let Some(&last) = self.values.last() {
            self.sorted = self.sorted && last <= value;
        }
        self.values.push(value);
    }

    pub fn sort(&mut self) {
        if !self.sorted {
            crate::order_stats::sort_values(&mut self.values);
            self.sorted = true;
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Groups and lists, as assembled by the builder.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    pub groups: Vec<Group>,
    pub lists: Vec<List>,
}

impl Dataset {
    pub fn num_items(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

// ******** Output data structures *********

/// The output record for one group.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupSummary {
    pub name: String,
    pub item_count: usize,
    pub lo_value: f64,
    pub fdr: f64,
}

/// Errors that prevent the aggregation from completing.
///
/// There is no partial result: any of these aborts the run.
#[derive(PartialEq, Debug, Clone)]
pub enum RraError {
    EmptyDataset,
    EmptyGroup(String),
    EmptyPercentiles,
    EmptyList(String),
    UnsortedList(String),
    InvalidListIndex { item: String, list_index: usize },
    InvalidMaxPercentile(f64),
    InvalidPassCount,
    PassCountOverflow,
    InvalidSeed(u64),
    InvalidValue { item: String, value: f64 },
    InvalidBetaParameters { a: f64, b: f64, lambda: f64 },
    CdfNoConvergence { a: f64, b: f64, x: f64 },
    TooManyGroups(usize),
    TooManyLists(usize),
}

impl Error for RraError {}

impl Display for RraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RraError::EmptyDataset => write!(f, "no group to aggregate"),
            RraError::EmptyGroup(name) => write!(f, "group {} has no item", name),
            RraError::EmptyPercentiles => write!(f, "no percentile to compute a lo-value from"),
            RraError::EmptyList(name) => write!(f, "list {} has no value", name),
            RraError::UnsortedList(name) => {
                write!(f, "list {} must be sorted before computing percentiles", name)
            }
            RraError::InvalidListIndex { item, list_index } => {
                write!(f, "item {} refers to unknown list #{}", item, list_index)
            }
            RraError::InvalidMaxPercentile(p) => {
                write!(f, "maxPercentile should be within 0.0 and 1.0, got {}", p)
            }
            RraError::InvalidPassCount => {
                write!(f, "the number of random passes must be positive")
            }
            RraError::PassCountOverflow => {
                write!(f, "the number of random passes is too large")
            }
            RraError::InvalidSeed(s) => write!(f, "invalid random seed {}", s),
            RraError::InvalidValue { item, value } => {
                write!(f, "item {} has a non-finite value {}", item, value)
            }
            RraError::InvalidBetaParameters { a, b, lambda } => write!(
                f,
                "invalid Beta parameters a={} b={} non-centrality={}",
                a, b, lambda
            ),
            RraError::CdfNoConvergence { a, b, x } => write!(
                f,
                "Beta CDF did not converge for a={} b={} at x={}",
                a, b, x
            ),
            RraError::TooManyGroups(max) => write!(f, "too many groups. maxGroupNum = {}", max),
            RraError::TooManyLists(max) => write!(f, "too many lists. maxListNum = {}", max),
        }
    }
}

// ********* Configuration **********

/// The generator used to draw the null percentiles.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NullGenerator {
    /// Park-Miller multiplicative congruential generator (multiplier 48271).
    /// Reproduces the classic seeding sequence.
    Lehmer,
    /// xoshiro256++ from `rand_xoshiro`.
    Xoshiro,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RraOptions {
    /// Only the order statistics whose percentile is at most this value are
    /// considered (the first one is always considered).
    pub max_percentile: f64,
    /// Null passes per group when `num_rand_pass` is not given.
    pub rand_passes_per_group: usize,
    /// Total number of null lo-values to aim for. Overrides
    /// `rand_passes_per_group` when provided.
    pub num_rand_pass: Option<usize>,
    pub seed: u64,
    pub generator: NullGenerator,
    pub max_groups: usize,
    pub max_lists: usize,
}

impl RraOptions {
    pub const DEFAULT_OPTIONS: RraOptions = RraOptions {
        max_percentile: DEFAULT_MAX_PERCENTILE,
        rand_passes_per_group: RAND_PASS_NUM,
        num_rand_pass: None,
        seed: DEFAULT_SEED,
        generator: NullGenerator::Lehmer,
        max_groups: MAX_GROUP_NUM,
        max_lists: MAX_LIST_NUM,
    };

    pub fn validate(&self) -> Result<(), RraError> {
        check_max_percentile(self.max_percentile)?;
        if self.num_rand_pass == Some(0) || self.rand_passes_per_group == 0 {
            return Err(RraError::InvalidPassCount);
        }
        Ok(())
    }

    /// The number of null lo-values requested for `group_count` groups.
    pub fn num_rand_pass(&self, group_count: usize) -> Result<usize, RraError> {
        match self.num_rand_pass {
            Some(n) => Ok(n),
            None => self
                .rand_passes_per_group
                .checked_mul(group_count)
                .ok_or(RraError::PassCountOverflow),
        }
    }
}

impl Default for RraOptions {
    fn default() -> Self {
        RraOptions::DEFAULT_OPTIONS
    }
}

pub(crate) fn check_max_percentile(max_percentile: f64) -> Result<(), RraError> {
    if (0.0..=1.0).contains(&max_percentile) {
        Ok(())
    } else {
        Err(RraError::InvalidMaxPercentile(max_percentile))
    }
}
