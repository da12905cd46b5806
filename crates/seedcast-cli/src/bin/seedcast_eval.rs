//! seedcast-eval - expected-spread evaluation for a fixed seed set
//!
//! Usage:
//!   seedcast-eval -g graph.txt -e seeds.txt          # forward spread
//!   seedcast-eval -g graph.txt -e seeds.txt -b -r    # plus backward, as TSV

use clap::Parser;
use seedcast_cli::EvalOptions;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = EvalOptions::parse();
    if let Err(e) = seedcast_cli::evaluate(&options) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
