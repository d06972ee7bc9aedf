use clap::Parser;

/// This is a robust rank aggregation program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of the run. The other options
    /// override the values found in this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The input data file. Format: <item id> <group id> <list id> <value>,
    /// with a header line.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path) The output file. Format: <group id> <number of items in the group>
    /// <lo-value> <false discovery rate>
    #[clap(short, long, value_parser)]
    pub output: Option<String>,

    /// (default 0.25) RRA only considers the items with a percentile smaller than this
    /// parameter.
    #[clap(short = 'p', long, value_parser)]
    pub max_percentile: Option<f64>,

    /// (default 123456) The seed of the null simulation.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// (default 100) The number of simulated null lo-values for each group.
    #[clap(long, value_parser)]
    pub passes_per_group: Option<usize>,

    /// (default lehmer) The random generator of the null simulation: lehmer or xoshiro.
    #[clap(long, value_parser)]
    pub generator: Option<String>,

    /// (file path) A reference output. If provided, rra checks that the computed output
    /// matches the reference before writing it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
