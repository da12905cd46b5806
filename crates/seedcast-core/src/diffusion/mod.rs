//! Stochastic diffusion simulation.
//!
//! Two cascade semantics share one contract, [`Diffusion::spread`]:
//! run `trials` independent simulations from a seed set and return the
//! mean number of activated nodes (seeds included).
//!
//! ## Concurrency
//!
//! Trials are embarrassingly parallel: each trial owns its activation
//! bitmap, scratch arrays and generator (see [`crate::rng`]), so the
//! rayon reduction is a plain commutative sum and no trial can observe
//! another's partial state.

mod independent_cascade;
mod linear_threshold;

pub use independent_cascade::IndependentCascade;
pub use linear_threshold::LinearThreshold;

use crate::graph::{GraphStore, NodeId};

/// Which diffusion semantics to simulate. The enum is matched exactly
/// once, in [`DiffusionModel::build`]; everything downstream goes
/// through the [`Diffusion`] trait object it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffusionModel {
    IndependentCascade,
    LinearThreshold,
}

impl DiffusionModel {
    /// Constructs the cascade engine for this model over `graph`.
    pub fn build(self, graph: &GraphStore) -> Box<dyn Diffusion + '_> {
        match self {
            DiffusionModel::IndependentCascade => Box::new(IndependentCascade::new(graph)),
            DiffusionModel::LinearThreshold => Box::new(LinearThreshold::new(graph)),
        }
    }

    /// Human-readable model name for reporting.
    pub fn as_str(self) -> &'static str {
        match self {
            DiffusionModel::IndependentCascade => "Independent Cascade",
            DiffusionModel::LinearThreshold => "Linear Threshold",
        }
    }
}

/// Which edge direction a cascade walks. `Backward` runs the same
/// propagation over the reverse graph, approximating each node's
/// susceptibility to influence rather than its reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Monte-Carlo spread estimation over a fixed, read-only graph.
pub trait Diffusion: Sync {
    /// Mean activated-node count over `trials` independent cascades
    /// started from `seeds`. Every trial derives its own generator
    /// from `run_seed`, so a fixed seed reproduces the estimate.
    ///
    /// The result is never negative and never exceeds the node count.
    /// `trials == 0` degenerates to the seed count alone.
    fn spread(&self, seeds: &[NodeId], trials: usize, direction: Direction, run_seed: u64)
        -> f64;
}
