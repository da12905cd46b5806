//! # Seedcast Core
//!
//! Engine for influence-maximization experiments on directed, weighted
//! social-influence graphs.
//!
//! ## Key Components
//!
//! - **GraphStore**: immutable bidirectional CSR graph, built once and
//!   read-only afterwards
//! - **Diffusion**: stochastic cascade simulation (independent cascade
//!   and linear threshold) with parallel Monte-Carlo spread estimation
//! - **Solvers**: seed-selection algorithms behind a common trait:
//!   CELF lazy greedy, IMM reverse-reachable-set sampling, IPA
//!   influence-path trees, plus the simple degree/rank baselines

pub mod diffusion;
pub mod errors;
pub mod graph;
pub mod rng;
pub mod solver;

pub use diffusion::{Diffusion, DiffusionModel, Direction};
pub use errors::CoreError;
pub use graph::{Edge, GraphBuilder, GraphStore, NodeId, WeightModel};
pub use solver::{Solver, SolverRequest};
