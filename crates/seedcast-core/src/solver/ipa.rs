//! IPA solver: seed selection over influence path trees.
//!
//! Instead of Monte-Carlo sampling, IPA scores a node by enumerating
//! the probable influence paths leaving it. Paths are grown forward
//! edge by edge, carrying the product of edge weights, and pruned once
//! that product drops below `1/divider`. A node reached along several
//! paths is counted once with the noisy-OR of the path probabilities.
//! Already-selected seeds block every path through them, which is what
//! makes repeated selection diminish.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::Solver;
use crate::graph::{GraphStore, NodeId};

/// Path-probability cutoff denominator when no parameter is given.
pub const DEFAULT_DIVIDER: u32 = 320;

/// One node on an influence path. Links are arena indices into the
/// owning [`PathTree`], so growing the arena never invalidates them.
struct PathNode {
    node: NodeId,
    probability: f64,
    parent: Option<u32>,
    children: SmallVec<[u32; 4]>,
}

/// Influence path tree rooted at a candidate seed, stored as a flat
/// index arena with the root at slot 0.
struct PathTree {
    nodes: Vec<PathNode>,
}

impl PathTree {
    fn new(root: NodeId) -> Self {
        PathTree {
            nodes: vec![PathNode {
                node: root,
                probability: 1.0,
                parent: None,
                children: SmallVec::new(),
            }],
        }
    }

    fn push_child(&mut self, parent: u32, node: NodeId, probability: f64) -> u32 {
        let idx = self.nodes.len() as u32;
        self.nodes.push(PathNode {
            node,
            probability,
            parent: Some(parent),
            children: SmallVec::new(),
        });
        self.nodes[parent as usize].children.push(idx);
        idx
    }

    /// True when `node` already lies on the path from the root down to
    /// slot `idx` inclusive. Keeps every path simple.
    fn on_path(&self, mut idx: u32, node: NodeId) -> bool {
        loop {
            let entry = &self.nodes[idx as usize];
            if entry.node == node {
                return true;
            }
            match entry.parent {
                Some(parent) => idx = parent,
                None => return false,
            }
        }
    }

    /// Noisy-OR influence of the whole tree: for each distinct node,
    /// 1 − Π(1 − p) over the paths reaching it, summed. The root's
    /// certain activation contributes exactly 1.
    fn influence(&self) -> f64 {
        let mut miss_product: FxHashMap<NodeId, f64> = FxHashMap::default();
        for entry in &self.nodes {
            *miss_product.entry(entry.node).or_insert(1.0) *= 1.0 - entry.probability;
        }
        miss_product.values().map(|miss| 1.0 - miss).sum()
    }
}

/// Heap entry stamped with the selection round its gain was computed
/// in; a stamp equal to the current round means the gain accounts for
/// every seed picked so far.
struct Scored {
    gain: f64,
    round: u64,
    node: NodeId,
}

impl PartialEq for Scored {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scored {}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain
            .total_cmp(&other.gain)
            .then(self.round.cmp(&other.round))
            .then(self.node.cmp(&other.node))
    }
}

pub struct IpaSolver<'g> {
    graph: &'g GraphStore,
    divider: u32,
}

impl<'g> IpaSolver<'g> {
    pub fn new(graph: &'g GraphStore, divider: u32) -> Self {
        IpaSolver { graph, divider }
    }

    fn threshold(&self) -> f64 {
        1.0 / f64::from(self.divider.max(1))
    }

    /// Grows the influence path tree below arena slot `idx`.
    fn expand(&self, tree: &mut PathTree, idx: u32, blockers: &FxHashSet<NodeId>) {
        let threshold = self.threshold();
        let (from, base) = {
            let entry = &tree.nodes[idx as usize];
            (entry.node, entry.probability)
        };
        for e in self.graph.edges_of(from) {
            let probability = base * f64::from(e.weight);
            if probability < threshold
                || blockers.contains(&e.destination)
                || tree.on_path(idx, e.destination)
            {
                continue;
            }
            let child = tree.push_child(idx, e.destination, probability);
            self.expand(tree, child, blockers);
        }
    }

    fn build_tree(&self, root: NodeId, blockers: &FxHashSet<NodeId>) -> PathTree {
        let mut tree = PathTree::new(root);
        self.expand(&mut tree, 0, blockers);
        tree
    }

    /// Estimated spread of `seeds`, optionally with one more candidate
    /// root. Every tree treats all other roots as blockers.
    fn forest_influence(&self, seeds: &[NodeId], additional: Option<NodeId>) -> f64 {
        let mut blockers: FxHashSet<NodeId> = seeds.iter().copied().collect();
        if let Some(extra) = additional {
            blockers.insert(extra);
        }
        seeds
            .iter()
            .copied()
            .chain(additional)
            .map(|root| {
                let mut others = blockers.clone();
                others.remove(&root);
                self.build_tree(root, &others).influence()
            })
            .sum()
    }
}

impl Solver for IpaSolver<'_> {
    fn solve(&mut self, k: usize) -> Vec<NodeId> {
        let n = self.graph.number_of_nodes();
        let k = k.min(n);
        let mut seeds = Vec::with_capacity(k);
        if k == 0 {
            return seeds;
        }

        let this = &*self;
        let initial: Vec<(NodeId, f64)> = (0..n as NodeId)
            .into_par_iter()
            .map(|v| (v, this.forest_influence(&[], Some(v))))
            .collect();
        let mut heap: BinaryHeap<Scored> = initial
            .into_iter()
            .map(|(node, gain)| Scored {
                gain,
                round: 0,
                node,
            })
            .collect();

        let top = heap.pop().expect("graph has at least one node");
        seeds.push(top.node);

        let mut round = 1u64;
        let mut base = self.forest_influence(&seeds, None);

        while seeds.len() < k {
            let top = heap.pop().expect("heap holds all unselected nodes");
            if top.round == round {
                seeds.push(top.node);
                round += 1;
                base = self.forest_influence(&seeds, None);
                continue;
            }
            let gain = (self.forest_influence(&seeds, Some(top.node)) - base).max(0.0);
            if heap.peek().map_or(true, |next| gain >= next.gain) {
                seeds.push(top.node);
                round += 1;
                base = self.forest_influence(&seeds, None);
            } else {
                heap.push(Scored {
                    gain,
                    round,
                    node: top.node,
                });
            }
        }

        seeds
    }

    fn name(&self) -> String {
        format!("IPA,{}", self.divider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, WeightModel};
    use proptest::prelude::*;

    /// 0 → 1 → 3 and a helper source 2 → {1, 3}; both real targets get
    /// in-degree 2, so every edge carries weight 0.5.
    fn halved() -> GraphStore {
        let mut b = GraphStore::builder("halved");
        b.push_node([Edge::new(1)]);
        b.push_node([Edge::new(3)]);
        b.push_node([Edge::new(1), Edge::new(3)]);
        b.push_node([]);
        b.build(WeightModel::WeightedCascade).unwrap()
    }

    #[test]
    fn path_probabilities_multiply_along_the_tree() {
        let g = halved();
        let solver = IpaSolver::new(&g, DEFAULT_DIVIDER);
        // root 1.0, child 1 at 0.5, grandchild 3 at 0.25
        let influence = solver.forest_influence(&[], Some(0));
        assert!((influence - 1.75).abs() < 1e-12, "influence {influence}");
    }

    #[test]
    fn cycles_never_extend_a_path() {
        // 0 → 1 → 2 → 0, all weight 1.0; the walk must stop after one
        // full lap instead of recursing forever
        let mut b = GraphStore::builder("triangle");
        b.push_node([Edge::new(1)]);
        b.push_node([Edge::new(2)]);
        b.push_node([Edge::new(0)]);
        let g = b.build(WeightModel::WeightedCascade).unwrap();
        let solver = IpaSolver::new(&g, DEFAULT_DIVIDER);
        assert_eq!(solver.forest_influence(&[], Some(0)), 3.0);
    }

    #[test]
    fn blockers_truncate_paths() {
        let g = halved();
        let solver = IpaSolver::new(&g, DEFAULT_DIVIDER);
        let blocked: FxHashSet<NodeId> = [1].into_iter().collect();
        let tree = solver.build_tree(0, &blocked);
        assert_eq!(tree.influence(), 1.0, "only the root survives");
    }

    #[test]
    fn low_divider_prunes_improbable_paths() {
        let g = halved();
        // threshold 1/3: the 0.25 path to node 3 is dropped
        let solver = IpaSolver::new(&g, 3);
        let influence = solver.forest_influence(&[], Some(0));
        assert!((influence - 1.5).abs() < 1e-12, "influence {influence}");
    }

    #[test]
    fn solve_returns_seeds_in_selection_order() {
        let g = halved();
        let mut solver = IpaSolver::new(&g, DEFAULT_DIVIDER);
        let seeds = solver.solve(2);
        assert_eq!(seeds.len(), 2);
        // node 2 reaches both targets at 0.5 each: 1 + 0.5 + 0.5 + a
        // 0.25 continuation, beating node 0's 1.75
        assert_eq!(seeds[0], 2);
        assert_ne!(seeds[0], seeds[1]);
    }

    #[test]
    fn k_zero_yields_no_seeds() {
        let g = halved();
        let mut solver = IpaSolver::new(&g, DEFAULT_DIVIDER);
        assert!(solver.solve(0).is_empty());
    }

    proptest! {
        #[test]
        fn no_tree_node_repeats_an_ancestor(
            adjacency in prop::collection::vec(
                prop::collection::vec(0u32..10, 0..4), 1..10,
            )
        ) {
            let n = adjacency.len() as u32;
            let mut b = GraphStore::builder("prop");
            for edges in &adjacency {
                b.push_node(edges.iter().map(|&d| Edge::new(d % n)));
            }
            let g = b.build(WeightModel::WeightedCascade).unwrap();
            // a coarse cutoff keeps the trees small without ruling
            // out full-weight cycles, the case under test
            let solver = IpaSolver::new(&g, 4);
            for root in g.nodes() {
                let tree = solver.build_tree(root, &FxHashSet::default());
                for entry in &tree.nodes {
                    let mut cursor = entry.parent;
                    while let Some(up) = cursor {
                        let ancestor = &tree.nodes[up as usize];
                        prop_assert_ne!(ancestor.node, entry.node);
                        cursor = ancestor.parent;
                    }
                }
            }
        }
    }
}
