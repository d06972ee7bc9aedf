use clap::Parser;
use log::{info, LevelFilter};
use std::error::Error;

mod args;
mod rra;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let res = rra::resolve_settings(&args).and_then(|settings| rra::run_aggregation(&settings));
    match res {
        Ok(()) => {
            info!("finished.");
        }
        Err(e) => {
            eprintln!("An error occured: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            eprintln!("program exit!");
            std::process::exit(1);
        }
    }
}
