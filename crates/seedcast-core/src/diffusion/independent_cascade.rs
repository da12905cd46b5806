//! Independent-cascade semantics: an activated node gets exactly one
//! chance per outgoing edge to activate the neighbor, succeeding with
//! probability equal to the edge weight.

use rand::rngs::SmallRng;
use rand::Rng;
use rayon::prelude::*;

use super::{Diffusion, Direction};
use crate::graph::{GraphStore, NodeId};
use crate::rng::stream_rng;

pub struct IndependentCascade<'g> {
    graph: &'g GraphStore,
}

impl<'g> IndependentCascade<'g> {
    pub fn new(graph: &'g GraphStore) -> Self {
        IndependentCascade { graph }
    }

    /// One cascade to quiescence; returns the activated count, seeds
    /// included. Finite because each node enters the worklist at most
    /// once.
    fn cascade(&self, seeds: &[NodeId], direction: Direction, rng: &mut SmallRng) -> usize {
        let mut activated = vec![false; self.graph.number_of_nodes()];
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
                if activated[e.destination as usize] {
                    continue;
                }
                if rng.gen::<f32>() < e.weight {
                    activated[e.destination as usize] = true;
                    count += 1;
                    work.push(e.destination);
                }
            }
        }

        count
    }
}

impl Diffusion for IndependentCascade<'_> {
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
