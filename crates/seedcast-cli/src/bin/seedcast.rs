//! seedcast - influence-maximization benchmark CLI
//!
//! Usage:
//!   seedcast -g graph.txt -a imm                     # one solver
//!   seedcast -g graph.txt -k 10 -a celf 10000 ipa    # several, with parameters
//!   seedcast -g graph.txt -d lt -a highdegree -r     # raw tab-separated output

use clap::Parser;
use seedcast_cli::Options;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = Options::parse();
    if let Err(e) = seedcast_cli::run(&options) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
