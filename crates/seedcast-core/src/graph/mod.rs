//! Immutable CSR graph storage.
//!
//! [`GraphStore`] holds a directed, weighted graph in two compressed
//! sparse-row layouts at once, forward edges and backward (reverse)
//! edges, each as a flat edge array plus a per-node offset array.
//! `offset[i]..offset[i + 1]` bounds node `i`'s edge slice, so neighbor
//! lookup is an O(1) slice.
//!
//! The store is built exactly once through [`GraphBuilder`] and is
//! read-only afterwards: no solver or diffusion run mutates it, which
//! is what makes sharing it across worker threads lock-free.
//!
//! ## Invariants
//!
//! - Offset arrays are non-decreasing, have length N + 1, start at 0
//!   and end at the edge count.
//! - Forward and backward arrays describe the same edge multiset with
//!   endpoints reversed and identical weights.
//! - Node ids are dense in `[0, N)`. Queries with an id outside that
//!   range are programmer errors and panic.

use rand::Rng;

use crate::errors::CoreError;

/// Dense node index in `[0, N)`. All per-node state throughout the
/// crate lives in parallel arrays indexed by this id.
pub type NodeId = u32;

/// A directed edge as stored in either CSR array: the node on the far
/// end plus the activation probability of the edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub destination: NodeId,
    /// Activation probability in `(0, 1]`, assigned once by
    /// [`GraphBuilder::build`] and immutable afterwards.
    pub weight: f32,
}

impl Edge {
    pub fn new(destination: NodeId) -> Self {
        Edge {
            destination,
            weight: f32::NAN,
        }
    }
}

/// How edge activation probabilities are assigned when the graph is
/// frozen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightModel {
    /// Every edge into node `v` gets weight `1 / in-degree(v)`
    /// (the weighted-cascade model, the default).
    WeightedCascade,
    /// Every edge draws once, uniformly, from {0.1, 0.01, 0.001}.
    Random { seed: u64 },
}

/// Values the [`WeightModel::Random`] mode draws from.
const RANDOM_WEIGHTS: [f32; 3] = [0.1, 0.01, 0.001];

/// Immutable bidirectional CSR graph. See the module docs for the
/// layout invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStore {
    name: String,
    forward_offsets: Vec<usize>,
    backward_offsets: Vec<usize>,
    forward_edges: Vec<Edge>,
    backward_edges: Vec<Edge>,
}

impl GraphStore {
    /// Starts construction. `name` is carried along for reporting only.
    pub fn builder(name: impl Into<String>) -> GraphBuilder {
        GraphBuilder {
            name: name.into(),
            forward_offsets: vec![0],
            forward_edges: Vec::new(),
        }
    }

    /// Outgoing edges of `node`.
    pub fn edges_of(&self, node: NodeId) -> &[Edge] {
        let node = node as usize;
        &self.forward_edges[self.forward_offsets[node]..self.forward_offsets[node + 1]]
    }

    /// Incoming edges of `node`, stored with reversed endpoints: each
    /// returned edge points at the source node and carries the weight
    /// of the original forward edge.
    pub fn inverse_edges_of(&self, node: NodeId) -> &[Edge] {
        let node = node as usize;
        &self.backward_edges[self.backward_offsets[node]..self.backward_offsets[node + 1]]
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.edges_of(node).len()
    }

    pub fn in_degree(&self, node: NodeId) -> usize {
        self.inverse_edges_of(node).len()
    }

    pub fn number_of_nodes(&self) -> usize {
        self.forward_offsets.len() - 1
    }

    pub fn number_of_edges(&self) -> usize {
        self.forward_edges.len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates all node ids in increasing order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        0..self.number_of_nodes() as NodeId
    }

    /// Uniformly random node, drawn from the caller's generator.
    pub fn random_node(&self, rng: &mut impl Rng) -> NodeId {
        rng.gen_range(0..self.number_of_nodes() as NodeId)
    }

    /// Swaps the forward and backward roles wholesale, transposing the
    /// graph in O(1) without copying either edge array. Applying it
    /// twice restores the original orientation exactly.
    pub fn inverse(&mut self) {
        std::mem::swap(&mut self.forward_offsets, &mut self.backward_offsets);
        std::mem::swap(&mut self.forward_edges, &mut self.backward_edges);
    }
}

/// Append-only construction handle. Node ids are implied by append
/// order: the first [`push_node`](GraphBuilder::push_node) call creates
/// node 0, the next node 1, and so on, so a non-sequential id cannot
/// be expressed at all.
#[derive(Debug)]
pub struct GraphBuilder {
    name: String,
    forward_offsets: Vec<usize>,
    forward_edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Id the next `push_node` call will create.
    pub fn next_id(&self) -> NodeId {
        (self.forward_offsets.len() - 1) as NodeId
    }

    /// Appends the next node together with its outgoing edge list.
    /// Edge weights passed here are placeholders; `build` assigns the
    /// final weights.
    pub fn push_node(&mut self, edges: impl IntoIterator<Item = Edge>) {
        self.forward_edges.extend(edges);
        self.forward_offsets.push(self.forward_edges.len());
    }

    /// Freezes the graph: validates edge destinations, derives the
    /// backward CSR arrays and assigns edge weights per `weights`.
    pub fn build(self, weights: WeightModel) -> Result<GraphStore, CoreError> {
        let GraphBuilder {
            name,
            forward_offsets,
            mut forward_edges,
        } = self;
        let n = forward_offsets.len() - 1;

        if let Some(bad) = forward_edges
            .iter()
            .find(|e| e.destination as usize >= n)
        {
            return Err(CoreError::GraphConstruction(format!(
                "edge destination {} outside node range 0..{n}",
                bad.destination
            )));
        }

        // In-degrees double as backward-CSR bucket sizes.
        let mut in_degree = vec![0usize; n];
        for e in &forward_edges {
            in_degree[e.destination as usize] += 1;
        }

        match weights {
            WeightModel::WeightedCascade => {
                for e in &mut forward_edges {
                    e.weight = 1.0 / in_degree[e.destination as usize] as f32;
                }
            }
            WeightModel::Random { seed } => {
                let mut rng = crate::rng::stream_rng(seed, 0);
                for e in &mut forward_edges {
                    e.weight = RANDOM_WEIGHTS[rng.gen_range(0..RANDOM_WEIGHTS.len())];
                }
            }
        }

        let mut backward_offsets = Vec::with_capacity(n + 1);
        backward_offsets.push(0);
        let mut total = 0;
        for &d in &in_degree {
            total += d;
            backward_offsets.push(total);
        }

        // Counting-sort the reversed edges into their buckets; cursor
        // tracks the next free slot per destination.
        let mut cursor = backward_offsets.clone();
        let mut backward_edges = vec![Edge::new(0); forward_edges.len()];
        for (from, window) in forward_offsets.windows(2).enumerate() {
            for e in &forward_edges[window[0]..window[1]] {
                let slot = &mut cursor[e.destination as usize];
                backward_edges[*slot] = Edge {
                    destination: from as NodeId,
                    weight: e.weight,
                };
                *slot += 1;
            }
        }

        Ok(GraphStore {
            name,
            forward_offsets,
            backward_offsets,
            forward_edges,
            backward_edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 0 → 1 → 2, plus 0 → 2.
    fn diamondless() -> GraphStore {
        let mut b = GraphStore::builder("test");
        b.push_node([Edge::new(1), Edge::new(2)]);
        b.push_node([Edge::new(2)]);
        b.push_node([]);
        b.build(WeightModel::WeightedCascade).unwrap()
    }

    fn assert_offsets_valid(offsets: &[usize], nodes: usize, edges: usize) {
        assert_eq!(offsets.len(), nodes + 1);
        assert_eq!(offsets[0], 0);
        assert_eq!(*offsets.last().unwrap(), edges);
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn builder_produces_valid_offsets() {
        let g = diamondless();
        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.number_of_edges(), 3);
        assert_offsets_valid(&g.forward_offsets, 3, 3);
        assert_offsets_valid(&g.backward_offsets, 3, 3);
    }

    #[test]
    fn degrees_and_slices() {
        let g = diamondless();
        assert_eq!(g.out_degree(0), 2);
        assert_eq!(g.out_degree(2), 0);
        assert_eq!(g.in_degree(0), 0);
        assert_eq!(g.in_degree(2), 2);
        let sources: Vec<NodeId> =
            g.inverse_edges_of(2).iter().map(|e| e.destination).collect();
        assert_eq!(sources, vec![0, 1]);
    }

    #[test]
    fn weighted_cascade_assigns_inverse_in_degree() {
        let g = diamondless();
        // node 1 has in-degree 1, node 2 has in-degree 2
        assert_eq!(g.edges_of(0)[0].weight, 1.0);
        assert_eq!(g.edges_of(0)[1].weight, 0.5);
        assert_eq!(g.edges_of(1)[0].weight, 0.5);
        // backward edges carry the matching forward weight
        for e in g.inverse_edges_of(2) {
            assert_eq!(e.weight, 0.5);
        }
    }

    #[test]
    fn random_weights_come_from_the_fixed_set() {
        let mut b = GraphStore::builder("rnd");
        b.push_node((0..32).map(|_| Edge::new(1)));
        b.push_node([]);
        let g = b.build(WeightModel::Random { seed: 99 }).unwrap();
        for e in g.edges_of(0) {
            assert!(RANDOM_WEIGHTS.contains(&e.weight), "weight {}", e.weight);
        }
        // reproducible under the same seed
        let mut b = GraphStore::builder("rnd");
        b.push_node((0..32).map(|_| Edge::new(1)));
        b.push_node([]);
        let h = b.build(WeightModel::Random { seed: 99 }).unwrap();
        assert_eq!(g, h);
    }

    #[test]
    fn inverse_twice_is_identity() {
        let original = diamondless();
        let mut g = original.clone();
        g.inverse();
        assert_eq!(g.edges_of(2).len(), 2);
        assert_eq!(g.in_degree(0), 2);
        g.inverse();
        assert_eq!(g, original);
    }

    #[test]
    fn out_of_range_destination_is_rejected() {
        let mut b = GraphStore::builder("bad");
        b.push_node([Edge::new(5)]);
        let err = b.build(WeightModel::WeightedCascade).unwrap_err();
        assert!(matches!(err, CoreError::GraphConstruction(_)));
    }

    #[test]
    fn empty_graph() {
        let b = GraphStore::builder("empty");
        let g = b.build(WeightModel::WeightedCascade).unwrap();
        assert_eq!(g.number_of_nodes(), 0);
        assert_eq!(g.number_of_edges(), 0);
    }

    proptest! {
        #[test]
        fn offset_invariants_hold_for_arbitrary_graphs(
            adjacency in prop::collection::vec(
                prop::collection::vec(0u32..12, 0..6), 1..12,
            )
        ) {
            let n = adjacency.len() as u32;
            let mut b = GraphStore::builder("prop");
            for edges in &adjacency {
                b.push_node(edges.iter().map(|&d| Edge::new(d % n)));
            }
            let edge_count: usize = adjacency.iter().map(Vec::len).sum();
            let g = b.build(WeightModel::WeightedCascade).unwrap();

            assert_offsets_valid(&g.forward_offsets, n as usize, edge_count);
            assert_offsets_valid(&g.backward_offsets, n as usize, edge_count);

            // forward and backward describe the same edge multiset
            let mut forward: Vec<(NodeId, NodeId)> = g
                .nodes()
                .flat_map(|v| g.edges_of(v).iter().map(move |e| (v, e.destination)))
                .collect();
            let mut backward: Vec<(NodeId, NodeId)> = g
                .nodes()
                .flat_map(|v| {
                    g.inverse_edges_of(v).iter().map(move |e| (e.destination, v))
                })
                .collect();
            forward.sort_unstable();
            backward.sort_unstable();
            prop_assert_eq!(forward, backward);

            let mut h = g.clone();
            h.inverse();
            h.inverse();
            prop_assert_eq!(g, h);
        }
    }
}
