//! Simulation-free baseline solvers.
//!
//! These rank nodes by a structural score and take the top `k`. They
//! exist to bracket the expensive solvers in benchmarks: a solver that
//! cannot beat HighDegree on a given graph is not earning its runtime.

use rand::seq::index;
use rayon::prelude::*;

use super::Solver;
use crate::graph::{GraphStore, NodeId};
use crate::rng::stream_rng;

/// Power-iteration rounds when no parameter is given.
pub const DEFAULT_PAGERANK_ITERATIONS: usize = 10;

const DAMPING: f64 = 0.85;

/// Node ids sorted by score, highest first; ties resolve to the
/// lowest id so rankings are deterministic.
fn top_k(scores: &[f64], k: usize) -> Vec<NodeId> {
    let mut order: Vec<NodeId> = (0..scores.len() as NodeId).collect();
    order.sort_by(|&a, &b| {
        scores[b as usize]
            .total_cmp(&scores[a as usize])
            .then(a.cmp(&b))
    });
    order.truncate(k.min(scores.len()));
    order
}

/// Uniform sample of distinct nodes.
pub struct RandomSolver<'g> {
    graph: &'g GraphStore,
    run_seed: u64,
}

impl<'g> RandomSolver<'g> {
    pub fn new(graph: &'g GraphStore, run_seed: u64) -> Self {
        RandomSolver { graph, run_seed }
    }
}

impl Solver for RandomSolver<'_> {
    fn solve(&mut self, k: usize) -> Vec<NodeId> {
        let n = self.graph.number_of_nodes();
        let mut rng = stream_rng(self.run_seed, 0);
        index::sample(&mut rng, n, k.min(n))
            .iter()
            .map(|i| i as NodeId)
            .collect()
    }

    fn name(&self) -> String {
        "Random".to_string()
    }
}

/// Highest out-degree first.
pub struct HighDegreeSolver<'g> {
    graph: &'g GraphStore,
}

impl<'g> HighDegreeSolver<'g> {
    pub fn new(graph: &'g GraphStore) -> Self {
        HighDegreeSolver { graph }
    }
}

impl Solver for HighDegreeSolver<'_> {
    fn solve(&mut self, k: usize) -> Vec<NodeId> {
        let scores: Vec<f64> = self
            .graph
            .nodes()
            .map(|v| self.graph.out_degree(v) as f64)
            .collect();
        top_k(&scores, k)
    }

    fn name(&self) -> String {
        "HighDegree".to_string()
    }
}

/// Highest summed outgoing edge weight first. Unlike raw degree this
/// discounts hubs whose edges all carry tiny activation probability.
pub struct WeightedDegreeSolver<'g> {
    graph: &'g GraphStore,
}

impl<'g> WeightedDegreeSolver<'g> {
    pub fn new(graph: &'g GraphStore) -> Self {
        WeightedDegreeSolver { graph }
    }
}

impl Solver for WeightedDegreeSolver<'_> {
    fn solve(&mut self, k: usize) -> Vec<NodeId> {
        let graph = self.graph;
        let scores: Vec<f64> = (0..graph.number_of_nodes() as NodeId)
            .into_par_iter()
            .map(|v| graph.edges_of(v).iter().map(|e| f64::from(e.weight)).sum())
            .collect();
        top_k(&scores, k)
    }

    fn name(&self) -> String {
        "WD".to_string()
    }
}

/// Degree ranking that discounts a node for each already-selected
/// seed it points at; selecting a hub devalues its fellow fans.
pub struct DegreeDiscountSolver<'g> {
    graph: &'g GraphStore,
}

impl<'g> DegreeDiscountSolver<'g> {
    pub fn new(graph: &'g GraphStore) -> Self {
        DegreeDiscountSolver { graph }
    }
}

impl Solver for DegreeDiscountSolver<'_> {
    fn solve(&mut self, k: usize) -> Vec<NodeId> {
        let n = self.graph.number_of_nodes();
        let k = k.min(n);
        let mut degree: Vec<i64> = self
            .graph
            .nodes()
            .map(|v| self.graph.out_degree(v) as i64)
            .collect();
        let mut seeds = Vec::with_capacity(k);
        for _ in 0..k {
            // first maximum wins so ties fall to the lowest id
            let mut best = 0usize;
            for v in 1..n {
                if degree[v] > degree[best] {
                    best = v;
                }
            }
            seeds.push(best as NodeId);
            // sentinel keeps the node out of later argmax rounds
            degree[best] = -1;
            for e in self.graph.inverse_edges_of(best as NodeId) {
                let pointer = e.destination as usize;
                if degree[pointer] > 0 {
                    degree[pointer] -= 1;
                }
            }
        }
        seeds
    }

    fn name(&self) -> String {
        "DegreeDiscount".to_string()
    }
}

/// Plain PageRank over a fixed number of power iterations. A node's
/// incoming mass is split by the in-degree of the nodes it links to.
pub struct PageRankSolver<'g> {
    graph: &'g GraphStore,
    iterations: usize,
}

impl<'g> PageRankSolver<'g> {
    pub fn new(graph: &'g GraphStore, iterations: usize) -> Self {
        PageRankSolver { graph, iterations }
    }
}

impl Solver for PageRankSolver<'_> {
    fn solve(&mut self, k: usize) -> Vec<NodeId> {
        let n = self.graph.number_of_nodes();
        let mut rank = vec![1.0f64; n];
        for _ in 0..self.iterations {
            let next: Vec<f64> = (0..n as NodeId)
                .map(|v| {
                    let incoming: f64 = self
                        .graph
                        .edges_of(v)
                        .iter()
                        .map(|e| {
                            rank[e.destination as usize]
                                / self.graph.in_degree(e.destination) as f64
                        })
                        .sum();
                    (1.0 - DAMPING) + DAMPING * incoming
                })
                .collect();
            rank = next;
        }
        top_k(&rank, k)
    }

    fn name(&self) -> String {
        format!("PageRank,{}", self.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, WeightModel};

    /// Node 0 fans out to everyone; 1 points at 2; 2 and 3 are sinks.
    fn fan() -> GraphStore {
        let mut b = GraphStore::builder("fan");
        b.push_node([Edge::new(1), Edge::new(2), Edge::new(3)]);
        b.push_node([Edge::new(2)]);
        b.push_node([]);
        b.push_node([]);
        b.build(WeightModel::WeightedCascade).unwrap()
    }

    #[test]
    fn high_degree_ranks_by_out_degree() {
        let g = fan();
        let mut solver = HighDegreeSolver::new(&g);
        assert_eq!(solver.solve(2), vec![0, 1]);
        // ties among the sinks resolve to the lower id
        assert_eq!(solver.solve(4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn weighted_degree_discounts_shared_targets() {
        let g = fan();
        // node 0: 1.0 + 0.5 + 1.0 = 2.5; node 1: 0.5 (node 2 has
        // in-degree 2)
        let mut solver = WeightedDegreeSolver::new(&g);
        assert_eq!(solver.solve(2), vec![0, 1]);
    }

    #[test]
    fn degree_discount_devalues_neighbors_of_seeds() {
        // 0 and 1 both have out-degree 2, but 1 points at 0; once 0 is
        // taken, 1 drops to 1 and loses to 2
        let mut b = GraphStore::builder("discount");
        b.push_node([Edge::new(3), Edge::new(4)]);
        b.push_node([Edge::new(0), Edge::new(3)]);
        b.push_node([Edge::new(5), Edge::new(6)]);
        for _ in 0..4 {
            b.push_node([]);
        }
        let g = b.build(WeightModel::WeightedCascade).unwrap();
        let mut solver = DegreeDiscountSolver::new(&g);
        assert_eq!(solver.solve(2), vec![0, 2]);
    }

    #[test]
    fn random_solver_is_reproducible_and_duplicate_free() {
        let g = fan();
        let mut a = RandomSolver::new(&g, 21);
        let mut b = RandomSolver::new(&g, 21);
        let seeds = a.solve(3);
        assert_eq!(seeds, b.solve(3));
        assert_eq!(seeds.len(), 3);
        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        // never more seeds than nodes
        assert_eq!(a.solve(10).len(), 4);
    }

    #[test]
    fn pagerank_favors_nodes_linking_into_heavy_sinks() {
        // 1 → 0 and 2 → 0: node 0 accumulates rank, and 1 and 2 score
        // identically above any isolated node
        let mut b = GraphStore::builder("sink");
        b.push_node([]);
        b.push_node([Edge::new(0)]);
        b.push_node([Edge::new(0)]);
        b.push_node([]);
        let g = b.build(WeightModel::WeightedCascade).unwrap();
        let mut solver = PageRankSolver::new(&g, DEFAULT_PAGERANK_ITERATIONS);
        let seeds = solver.solve(4);
        assert_eq!(&seeds[..3], &[1, 2, 0]);
    }
}
