//! Command-line surface of the benchmark runner.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use seedcast_core::DiffusionModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    /// One line per node: the node id followed by its out-neighbors.
    VertexList,
    /// One directed edge per line; `#` and `%` lines are comments.
    EdgeList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    /// Independent cascade.
    Ic,
    /// Linear threshold.
    Lt,
}

impl From<ModelArg> for DiffusionModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Ic => DiffusionModel::IndependentCascade,
            ModelArg::Lt => DiffusionModel::LinearThreshold,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "seedcast")]
#[command(version)]
#[command(about = "Influence-maximization benchmark runner")]
#[command(
    long_about = "Loads a directed graph, runs the requested seed-selection \
solvers and reports the expected spread of each seed set"
)]
pub struct Options {
    /// Graph file to load
    #[arg(short = 'g', long = "graph", value_name = "FILE")]
    pub graph: PathBuf,

    /// Input format of the graph file
    #[arg(short = 'f', long = "format", value_enum, default_value_t = GraphFormat::EdgeList)]
    pub format: GraphFormat,

    /// Diffusion model used for spread estimates
    #[arg(short = 'd', long = "diffusion-model", value_enum, default_value_t = ModelArg::Ic)]
    pub model: ModelArg,

    /// Directory for seed-set result files (omit to skip writing)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Monte-Carlo trials behind every reported spread
    #[arg(short = 's', long = "simulations", default_value_t = 20_000)]
    pub simulations: usize,

    /// Worker threads (defaults to one per core)
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Seed-set size every solver must produce
    #[arg(short = 'k', long = "seeds", default_value_t = 50)]
    pub seed_count: usize,

    /// Solvers to run; a selector may be followed by one numeric
    /// parameter, e.g. `-a celf 10000 imm ipa 320`
    #[arg(short = 'a', long = "algorithm", required = true, num_args = 1..)]
    pub algorithms: Vec<String>,

    /// Emit tab-separated records instead of the framed report
    #[arg(short = 'r', long = "print-raw")]
    pub raw: bool,

    /// Invert every edge before benchmarking
    #[arg(short = 'i', long = "inverse")]
    pub inverse: bool,

    /// Additionally report spread over reversed edges
    #[arg(short = 'b', long = "backwards-activation")]
    pub backwards: bool,

    /// Draw edge weights from {0.1, 0.01, 0.001} instead of 1/in-degree
    #[arg(long = "random-edge-weights")]
    pub random_edge_weights: bool,

    /// Run seed for reproducible results (random when omitted)
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

/// Options of the `seedcast-eval` companion binary: the same graph
/// flags as [`Options`], but instead of running solvers it scores an
/// externally supplied seed set.
#[derive(Debug, Parser)]
#[command(name = "seedcast-eval")]
#[command(version)]
#[command(about = "Evaluate the expected spread of a fixed seed set")]
pub struct EvalOptions {
    /// Graph file to load
    #[arg(short = 'g', long = "graph", value_name = "FILE")]
    pub graph: PathBuf,

    /// Input format of the graph file
    #[arg(short = 'f', long = "format", value_enum, default_value_t = GraphFormat::EdgeList)]
    pub format: GraphFormat,

    /// Diffusion model used for spread estimates
    #[arg(short = 'd', long = "diffusion-model", value_enum, default_value_t = ModelArg::Ic)]
    pub model: ModelArg,

    /// Seed-set file, one node id per line
    #[arg(short = 'e', long = "seed-set", value_name = "FILE")]
    pub seed_set: PathBuf,

    /// Monte-Carlo trials behind every reported spread
    #[arg(short = 's', long = "simulations", default_value_t = 20_000)]
    pub simulations: usize,

    /// Worker threads (defaults to one per core)
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Emit a tab-separated record instead of the framed report
    #[arg(short = 'r', long = "print-raw")]
    pub raw: bool,

    /// Invert every edge before evaluating
    #[arg(short = 'i', long = "inverse")]
    pub inverse: bool,

    /// Additionally report spread over reversed edges
    #[arg(short = 'b', long = "backwards-activation")]
    pub backwards: bool,

    /// Draw edge weights from {0.1, 0.01, 0.001} instead of 1/in-degree
    #[arg(long = "random-edge-weights")]
    pub random_edge_weights: bool,

    /// Run seed for reproducible results (random when omitted)
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}
