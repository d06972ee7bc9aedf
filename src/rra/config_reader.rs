use crate::rra::*;

use serde::{Deserialize, Serialize};

/// The settings that can be stored in a JSON configuration file.
///
/// All the fields are optional. Missing values fall back to the command line,
/// then to the defaults of the library.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RraConfig {
    #[serde(rename = "inputFile")]
    pub input_file: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "maxPercentile")]
    pub max_percentile: Option<f64>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<u64>,
    #[serde(rename = "randPassesPerGroup")]
    pub rand_passes_per_group: Option<usize>,
    pub generator: Option<String>,
    #[serde(rename = "maxGroups")]
    pub max_groups: Option<usize>,
    #[serde(rename = "maxLists")]
    pub max_lists: Option<usize>,
}

pub fn read_config(path: &str) -> RraCliResult<RraConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RraConfig = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);
    Ok(config)
}
