//! Seed-selection solvers.
//!
//! Every solver implements [`Solver`]: pick up to `k` seed nodes that
//! (approximately) maximize expected spread, and report a descriptive
//! name that encodes its sub-parameters. Concrete solvers are
//! constructed through [`SolverRequest`], which mirrors the benchmark
//! CLI's selector syntax: a selector string optionally followed by one
//! numeric parameter (`celf 10000`, `ipa 320`, `pr 10`).

pub mod celf;
pub mod heuristics;
pub mod imm;
pub mod ipa;

pub use celf::CelfSolver;
pub use imm::{ImmSolver, ImmStats};
pub use ipa::IpaSolver;

use crate::diffusion::DiffusionModel;
use crate::errors::CoreError;
use crate::graph::{GraphStore, NodeId};
use heuristics::{
    DegreeDiscountSolver, HighDegreeSolver, PageRankSolver, RandomSolver, WeightedDegreeSolver,
};

/// Common contract of all seed-selection algorithms.
pub trait Solver {
    /// Returns an ordered seed sequence of length `min(k, N)`.
    /// `k = 0` yields an empty sequence; `k ≥ N` yields every node.
    fn solve(&mut self, k: usize) -> Vec<NodeId>;

    /// Descriptive name used for reporting, including sub-parameters
    /// where the solver has any.
    fn name(&self) -> String;
}

/// One requested solver: lowercased selector plus an optional numeric
/// parameter taken from the following argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverRequest {
    pub selector: String,
    pub parameter: Option<i64>,
}

impl SolverRequest {
    /// Scans an argument list into requests. A purely numeric argument
    /// is consumed as the parameter of the selector before it; a
    /// parameter that does not fit `i64` is dropped so the solver
    /// falls back to its default.
    pub fn scan(args: &[String]) -> Vec<SolverRequest> {
        let mut requests = Vec::new();
        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            let selector = arg.to_lowercase();
            let parameter = match iter.peek() {
                Some(next) if is_number(next) => {
                    let number = iter.next().expect("peeked");
                    number.parse().ok()
                }
                _ => None,
            };
            requests.push(SolverRequest {
                selector,
                parameter,
            });
        }
        requests
    }

    /// Builds the requested solver over `graph`. `model` configures
    /// the diffusion engine of simulation-based solvers; `run_seed`
    /// roots every randomized decision the solver makes.
    ///
    /// Non-positive parameters are treated like absent ones: the
    /// solver's documented default applies.
    pub fn build<'g>(
        &self,
        graph: &'g GraphStore,
        model: DiffusionModel,
        run_seed: u64,
    ) -> Result<Box<dyn Solver + 'g>, CoreError> {
        let parameter = self.parameter.filter(|&p| p > 0);
        let solver: Box<dyn Solver> = match self.selector.as_str() {
            "celf" | "celfgreedy" => Box::new(CelfSolver::new(
                graph,
                model,
                parameter.map_or(celf::DEFAULT_SIMULATIONS, |p| p as usize),
                run_seed,
            )),
            "imm" => Box::new(ImmSolver::new(graph, run_seed)),
            "ipa" => Box::new(IpaSolver::new(
                graph,
                parameter.map_or(ipa::DEFAULT_DIVIDER, |p| p as u32),
            )),
            "pr" => Box::new(PageRankSolver::new(
                graph,
                parameter.map_or(heuristics::DEFAULT_PAGERANK_ITERATIONS, |p| p as usize),
            )),
            "degree" => Box::new(DegreeDiscountSolver::new(graph)),
            "highdegree" | "high_degree" => Box::new(HighDegreeSolver::new(graph)),
            "random" | "rnd" => Box::new(RandomSolver::new(graph, run_seed)),
            "wd" | "weighteddegree" => Box::new(WeightedDegreeSolver::new(graph)),
            _ => return Err(CoreError::UnknownSolver(self.selector.clone())),
        };
        Ok(solver)
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
