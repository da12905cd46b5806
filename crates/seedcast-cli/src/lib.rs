//! Benchmark runner around the seedcast influence-maximization
//! library: load a graph file, run the requested solvers, report seed
//! sets and spreads. A companion entry point scores a fixed,
//! externally supplied seed set instead of running solvers.

pub mod errors;
pub mod options;
pub mod parser;
pub mod report;

pub use errors::CliError;
pub use options::{EvalOptions, Options};

use std::path::Path;

use seedcast_core::{GraphStore, SolverRequest, WeightModel};
use tracing::info;

use options::GraphFormat;

/// Runs one full benchmark session as configured by `options`.
pub fn run(options: &Options) -> Result<(), CliError> {
    configure_threads(options.threads)?;
    let run_seed = options.seed.unwrap_or_else(rand::random);
    info!(run_seed, "session seed");

    let graph = load_session_graph(
        &options.graph,
        options.format,
        options.inverse,
        options.random_edge_weights,
        run_seed,
    )?;
    let requests = SolverRequest::scan(&options.algorithms);
    let result = report::Benchmarker::new(&graph, options, run_seed).run(&requests);
    result
}

/// Scores the seed set in `options.seed_set` against the graph,
/// without running any solver.
pub fn evaluate(options: &EvalOptions) -> Result<(), CliError> {
    configure_threads(options.threads)?;
    let run_seed = options.seed.unwrap_or_else(rand::random);
    info!(run_seed, "session seed");

    let graph = load_session_graph(
        &options.graph,
        options.format,
        options.inverse,
        options.random_edge_weights,
        run_seed,
    )?;
    let seeds = parser::load_seed_set(&options.seed_set)?;
    if let Some(&bad) = seeds
        .iter()
        .find(|&&s| s as usize >= graph.number_of_nodes())
    {
        return Err(CliError::MalformedSeedSet {
            path: options.seed_set.display().to_string(),
            reason: format!(
                "seed {bad} outside node range 0..{}",
                graph.number_of_nodes()
            ),
        });
    }
    report::evaluate(&graph, options, seeds, run_seed);
    Ok(())
}

fn configure_threads(threads: Option<usize>) -> Result<(), CliError> {
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    Ok(())
}

fn load_session_graph(
    path: &Path,
    format: GraphFormat,
    inverse: bool,
    random_edge_weights: bool,
    run_seed: u64,
) -> Result<GraphStore, CliError> {
    let weights = if random_edge_weights {
        WeightModel::Random { seed: run_seed }
    } else {
        WeightModel::WeightedCascade
    };
    let mut graph = parser::load_graph(path, format, weights)?;
    if inverse {
        graph.inverse();
    }
    info!(
        graph = %graph.name(),
        nodes = graph.number_of_nodes(),
        edges = graph.number_of_edges(),
        "graph loaded"
    );
    Ok(graph)
}
