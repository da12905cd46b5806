//! Linear-threshold semantics: a node activates permanently once the
//! summed weight of its activated in-neighbors reaches its threshold
//! θ ∈ [0, 1). The threshold is drawn lazily on first contact, not
//! upfront for all nodes.

use rand::rngs::SmallRng;
use rand::Rng;
use rayon::prelude::*;

use super::{Diffusion, Direction};
use crate::graph::{GraphStore, NodeId};
use crate::rng::stream_rng;

/// Sentinel for "no threshold drawn yet".
const UNASSIGNED: f64 = -1.0;

pub struct LinearThreshold<'g> {
    graph: &'g GraphStore,
}

impl<'g> LinearThreshold<'g> {
    pub fn new(graph: &'g GraphStore) -> Self {
        LinearThreshold { graph }
    }

    fn cascade(&self, seeds: &[NodeId], direction: Direction, rng: &mut SmallRng) -> usize {
        let n = self.graph.number_of_nodes();
        let mut activated = vec![false; n];
        let mut input = vec![0.0f64; n];
        let mut threshold = vec![UNASSIGNED; n];
        let mut work: Vec<NodeId> = seeds.to_vec();
        for &s in seeds {
            activated[s as usize] = true;
        }
        let mut count = work.len();

        while let Some(current) = work.pop() {
            let edges = match direction {
                Direction::Forward => self.graph.edges_of(current),
                Direction::Backward => self.graph.inverse_edges_of(current),
            };
            for e in edges {
                let dest = e.destination as usize;
                if activated[dest] {
                    continue;
                }
                if threshold[dest] < 0.0 {
                    threshold[dest] = rng.gen::<f64>();
                }
                input[dest] += f64::from(e.weight);
                if threshold[dest] <= input[dest] {
                    activated[dest] = true;
                    count += 1;
                    work.push(e.destination);
                }
            }
        }

        count
    }
}

impl Diffusion for LinearThreshold<'_> {
    fn spread(
        &self,
        seeds: &[NodeId],
        trials: usize,
        direction: Direction,
        run_seed: u64,
    ) -> f64 {
        if trials == 0 {
            return seeds.len() as f64;
        }
        let total: u64 = (0..trials as u64)
            .into_par_iter()
            .map(|trial| {
                let mut rng = stream_rng(run_seed, trial);
                self.cascade(seeds, direction, &mut rng) as u64
            })
            .sum();
        total as f64 / trials as f64
    }
}
