//! CELF lazy-greedy solver.
//!
//! Greedy seed selection with the cost-effective-lazy-forward
//! optimization: expected spread is submodular in the seed set, so a
//! node's marginal gain can only shrink as seeds are added. Stale gain
//! estimates therefore remain valid upper bounds and most candidates
//! never need recomputation in a given round.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::Rng;

use super::Solver;
use crate::diffusion::{Diffusion, DiffusionModel, Direction};
use crate::graph::{GraphStore, NodeId};
use crate::rng::stream_rng;

/// Monte-Carlo trials per spread estimate when no parameter is given.
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Heap entry: a candidate with the gain estimate computed during
/// `round`. An entry whose stamp equals the solver's current round is
/// up to date for the present seed set; equal gains prefer the fresher
/// stamp so recently recomputed candidates win ties (avoids cycling,
/// never falls back to id order).
struct Candidate {
    gain: f64,
    round: u64,
    node: NodeId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain
            .total_cmp(&other.gain)
            .then(self.round.cmp(&other.round))
            .then(self.node.cmp(&other.node))
    }
}

pub struct CelfSolver<'g> {
    graph: &'g GraphStore,
    engine: Box<dyn Diffusion + 'g>,
    simulations: usize,
    run_seed: u64,
    /// Next estimation stream; every spread estimate draws fresh
    /// trial generators.
    stream: u64,
}

impl<'g> CelfSolver<'g> {
    pub fn new(
        graph: &'g GraphStore,
        model: DiffusionModel,
        simulations: usize,
        run_seed: u64,
    ) -> Self {
        CelfSolver {
            graph,
            engine: model.build(graph),
            simulations,
            run_seed,
            stream: 0,
        }
    }

    /// One Monte-Carlo spread estimate; trials run in parallel inside.
    fn estimate(&mut self, seeds: &[NodeId]) -> f64 {
        self.stream += 1;
        let seed: u64 = stream_rng(self.run_seed, self.stream).gen();
        self.engine
            .spread(seeds, self.simulations, Direction::Forward, seed)
    }
}

impl Solver for CelfSolver<'_> {
    fn solve(&mut self, k: usize) -> Vec<NodeId> {
        let n = self.graph.number_of_nodes();
        let k = k.min(n);
        let mut seeds = Vec::with_capacity(k);
        if k == 0 {
            return seeds;
        }

        // Initial pass: each node's spread in isolation. Sequential
        // across nodes; the trials inside each estimate are parallel.
        let mut heap = BinaryHeap::with_capacity(n);
        for node in self.graph.nodes() {
            let gain = self.estimate(&[node]);
            heap.push(Candidate {
                gain,
                round: 0,
                node,
            });
        }

        // The very first pick is exact: no gain depends on prior seeds.
        let top = heap.pop().expect("graph has at least one node");
        seeds.push(top.node);

        // `round` bumps on every acceptance, invalidating all cached
        // gains at once; `base_spread` is spread(S) for the current S.
        let mut round = 1u64;
        let mut base_spread = self.estimate(&seeds);

        while seeds.len() < k {
            let top = heap.pop().expect("heap holds all unselected nodes");

            if top.round == round {
                // Already recomputed against the present seed set.
                seeds.push(top.node);
                round += 1;
                if seeds.len() < k {
                    base_spread = self.estimate(&seeds);
                }
                continue;
            }

            // Stale: recompute the marginal gain against the current
            // seed set.
            let mut with_candidate = seeds.clone();
            with_candidate.push(top.node);
            let gain = (self.estimate(&with_candidate) - base_spread).max(0.0);

            // By submodularity the refreshed gain shrank; if it still
            // beats the runner-up's stale gain, no recomputation of
            // anything else can overtake it this round.
            let still_best = heap.peek().map_or(true, |next| gain >= next.gain);
            if still_best {
                seeds.push(top.node);
                round += 1;
                if seeds.len() < k {
                    base_spread = self.estimate(&seeds);
                }
            } else {
                heap.push(Candidate {
                    gain,
                    round,
                    node: top.node,
                });
            }
        }

        seeds
    }

    fn name(&self) -> String {
        format!("CELF-Greedy,{}", self.simulations)
    }
}
