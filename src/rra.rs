use log::{debug, info, warn};

use robust_rank::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use text_diff::print_diff;

use crate::args::Args;
use crate::rra::config_reader::*;

pub mod config_reader;
pub mod io_input;
pub mod io_output;

#[derive(Debug, Snafu)]
pub enum RraCliError {
    #[snafu(display("Cannot open file {path}"))]
    OpeningInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Input file {path} is empty"))]
    EmptyInput { path: String },
    #[snafu(display(
        "Input file {path}, line {lineno}: expected <item id> <group id> <list id> <finite value>, found {content:?}"
    ))]
    MalformedRow {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Cannot write output file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot read the configuration file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot parse the configuration file"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Missing option: {name}"))]
    MissingOption { name: String },
    #[snafu(display("Unknown generator {name:?}, expected lehmer or xoshiro"))]
    UnknownGenerator { name: String },
    #[snafu(display("Cannot read the reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between computed output and reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("Aggregation failed: {source}"))]
    Aggregation { source: RraError },
}

pub type RraCliResult<T> = Result<T, RraCliError>;

/// The settings of one run, once the configuration file and the command line
/// have been merged.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input_file: String,
    pub output_file: String,
    pub reference_file: Option<String>,
    pub options: RraOptions,
}

pub fn resolve_settings(args: &Args) -> RraCliResult<RunSettings> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => RraConfig::default(),
    };
    debug!("resolve_settings: config file: {:?}", config);

    let input_file = args
        .input
        .clone()
        .or(config.input_file)
        .context(MissingOptionSnafu { name: "input" })?;
    let output_file = args
        .output
        .clone()
        .or(config.output_file)
        .context(MissingOptionSnafu { name: "output" })?;

    let defaults = RraOptions::DEFAULT_OPTIONS;
    let generator_name = args.generator.clone().or(config.generator);
    let generator = match generator_name.as_deref() {
        None => defaults.generator,
        Some(name) => parse_generator(name)?,
    };
    let options = RraOptions {
        max_percentile: args
            .max_percentile
            .or(config.max_percentile)
            .unwrap_or(defaults.max_percentile),
        rand_passes_per_group: args
            .passes_per_group
            .or(config.rand_passes_per_group)
            .unwrap_or(defaults.rand_passes_per_group),
        num_rand_pass: None,
        seed: args.seed.or(config.random_seed).unwrap_or(defaults.seed),
        generator,
        max_groups: config.max_groups.unwrap_or(defaults.max_groups),
        max_lists: config.max_lists.unwrap_or(defaults.max_lists),
    };
    // Fail on bad parameters before touching any file.
    options.validate().context(AggregationSnafu {})?;

    Ok(RunSettings {
        input_file,
        output_file,
        reference_file: args.reference.clone(),
        options,
    })
}

fn parse_generator(name: &str) -> RraCliResult<NullGenerator> {
    match name.to_lowercase().as_str() {
        "lehmer" => Ok(NullGenerator::Lehmer),
        "xoshiro" => Ok(NullGenerator::Xoshiro),
        _ => UnknownGeneratorSnafu { name }.fail(),
    }
}

pub fn run_aggregation(settings: &RunSettings) -> RraCliResult<()> {
    info!("reading input file {}", settings.input_file);
    let dataset = io_input::read_dataset(&settings.input_file, &settings.options)?;
    info!(
        "{} items, {} groups, {} lists",
        dataset.num_items(),
        dataset.groups.len(),
        dataset.lists.len()
    );

    let summaries = run_rra(dataset, &settings.options).context(AggregationSnafu {})?;

    let text = io_output::render_summaries(&summaries);

    if let Some(reference_path) = &settings.reference_file {
        let reference = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
            path: reference_path.clone(),
        })?;
        if reference != text {
            warn!("Found differences with the reference file {}", reference_path);
            print_diff(reference.as_str(), text.as_str(), "\n");
            return ReferenceMismatchSnafu {
                path: reference_path.clone(),
            }
            .fail();
        }
        info!("output matches the reference {}", reference_path);
    }

    info!("save to output file {}", settings.output_file);
    fs::write(&settings.output_file, text).context(WritingOutputSnafu {
        path: settings.output_file.clone(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> Args {
        Args {
            config: None,
            input: Some("in.txt".to_string()),
            output: Some("out.txt".to_string()),
            max_percentile: None,
            seed: None,
            passes_per_group: None,
            generator: None,
            reference: None,
            verbose: false,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rra-tools-{}-{}", std::process::id(), name))
    }

    #[test]
    fn defaults() {
        let s = resolve_settings(&args()).unwrap();
        assert_eq!(s.options, RraOptions::DEFAULT_OPTIONS);
        assert_eq!(s.input_file, "in.txt");
    }

    #[test]
    fn missing_input() {
        let a = Args {
            input: None,
            ..args()
        };
        assert!(matches!(
            resolve_settings(&a),
            Err(RraCliError::MissingOption { .. })
        ));
    }

    #[test]
    fn bad_percentile_is_rejected_early() {
        let a = Args {
            max_percentile: Some(1.5),
            ..args()
        };
        assert!(matches!(
            resolve_settings(&a),
            Err(RraCliError::Aggregation {
                source: RraError::InvalidMaxPercentile(_)
            })
        ));
    }

    #[test]
    fn command_line_overrides_config() {
        let path = temp_path("config.json");
        fs::write(
            &path,
            r#"{"inputFile": "a.txt", "outputFile": "b.txt", "maxPercentile": 0.1,
                "randomSeed": 7, "generator": "xoshiro", "maxLists": 3}"#,
        )
        .unwrap();
        let a = Args {
            config: Some(path.display().to_string()),
            input: None,
            output: None,
            seed: Some(11),
            ..args()
        };
        let s = resolve_settings(&a).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(s.input_file, "a.txt");
        assert_eq!(s.output_file, "b.txt");
        assert_eq!(s.options.max_percentile, 0.1);
        assert_eq!(s.options.seed, 11);
        assert_eq!(s.options.generator, NullGenerator::Xoshiro);
        assert_eq!(s.options.max_lists, 3);
    }

    #[test]
    fn unknown_generator() {
        let a = Args {
            generator: Some("mersenne".to_string()),
            ..args()
        };
        assert!(matches!(
            resolve_settings(&a),
            Err(RraCliError::UnknownGenerator { .. })
        ));
    }

    fn write_input(name: &str) -> PathBuf {
        let path = temp_path(name);
        let mut content = String::from("sgrna\tgene\tlist\tvalue\n");
        for (k, gene) in ["top", "mid", "low"].iter().enumerate() {
            for i in 0..3 {
                content.push_str(&format!(
                    "{}_{}\t{}\tscreen\t{}\n",
                    gene,
                    i,
                    gene,
                    k * 10 + i
                ));
            }
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn end_to_end_and_reference() {
        let input = write_input("e2e-input.txt");
        let output = temp_path("e2e-output.txt");
        let settings = RunSettings {
            input_file: input.display().to_string(),
            output_file: output.display().to_string(),
            reference_file: None,
            options: RraOptions::DEFAULT_OPTIONS,
        };
        run_aggregation(&settings).unwrap();
        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "group_id\t#_items_in_group\tlo_value\tFDR");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("top\t3\t"));

        // Same run checked against its own output: succeeds.
        let output2 = temp_path("e2e-output2.txt");
        let checked = RunSettings {
            output_file: output2.display().to_string(),
            reference_file: Some(output.display().to_string()),
            ..settings.clone()
        };
        run_aggregation(&checked).unwrap();
        assert_eq!(fs::read_to_string(&output2).unwrap(), text);

        // A different reference: fails and writes nothing.
        let reference = temp_path("e2e-reference.txt");
        fs::write(&reference, "group_id\t#_items_in_group\tlo_value\tFDR\n").unwrap();
        let output3 = temp_path("e2e-output3.txt");
        let mismatched = RunSettings {
            output_file: output3.display().to_string(),
            reference_file: Some(reference.display().to_string()),
            ..settings.clone()
        };
        assert!(matches!(
            run_aggregation(&mismatched),
            Err(RraCliError::ReferenceMismatch { .. })
        ));
        assert!(!output3.exists());

        for p in [input, output, output2, reference] {
            fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn failed_run_writes_nothing() {
        let input = write_input("fail-input.txt");
        let output = temp_path("fail-output.txt");
        let settings = RunSettings {
            input_file: input.display().to_string(),
            output_file: output.display().to_string(),
            reference_file: None,
            options: RraOptions {
                max_groups: 2,
                ..RraOptions::DEFAULT_OPTIONS
            },
        };
        assert!(matches!(
            run_aggregation(&settings),
            Err(RraCliError::Aggregation {
                source: RraError::TooManyGroups(2)
            })
        ));
        assert!(!output.exists());
        fs::remove_file(input).unwrap();
    }
}
