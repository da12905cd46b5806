//! Cross-solver behavior on graphs with an unambiguous best seed.

use proptest::prelude::*;
use seedcast_core::{
    Diffusion, DiffusionModel, Direction, Edge, GraphStore, SolverRequest, WeightModel,
};

fn full_weight_chain() -> GraphStore {
    let mut b = GraphStore::builder("chain");
    for i in 0..4u32 {
        b.push_node([Edge::new(i + 1)]);
    }
    b.push_node([]);
    b.build(WeightModel::WeightedCascade).unwrap()
}

fn request(selector: &str) -> SolverRequest {
    SolverRequest {
        selector: selector.to_string(),
        parameter: None,
    }
}

#[test]
fn every_ranking_solver_starts_at_the_chain_head() {
    // the head of a full-weight chain dominates every score these
    // solvers compute, so it must come out first regardless of
    // algorithm
    let g = full_weight_chain();
    for selector in ["celf", "imm", "ipa", "pr", "degree", "highdegree", "wd"] {
        let mut solver = request(selector)
            .build(&g, DiffusionModel::IndependentCascade, 23)
            .unwrap();
        let seeds = solver.solve(2);
        assert_eq!(seeds[0], 0, "{selector} first pick");
        assert_eq!(seeds.len(), 2, "{selector} seed count");
        assert_ne!(seeds[0], seeds[1], "{selector} duplicates");
    }
}

#[test]
fn degenerate_seed_counts_hold_for_every_solver() {
    let g = full_weight_chain();
    for selector in [
        "celf",
        "imm",
        "ipa",
        "pr",
        "degree",
        "highdegree",
        "random",
        "wd",
    ] {
        let mut solver = request(selector)
            .build(&g, DiffusionModel::IndependentCascade, 23)
            .unwrap();
        assert!(solver.solve(0).is_empty(), "{selector} with k = 0");
        let mut all = solver.solve(100);
        assert_eq!(all.len(), 5, "{selector} with k > N");
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 5, "{selector} returned duplicates");
    }
}

#[test]
fn marginal_gains_diminish_on_the_chain() {
    // spread is submodular: the gain of node 2 on top of {0} can never
    // exceed its gain on top of the empty set
    let g = full_weight_chain();
    let engine = DiffusionModel::IndependentCascade.build(&g);
    let alone = engine.spread(&[2], 100, Direction::Forward, 4);
    let base = engine.spread(&[0], 100, Direction::Forward, 4);
    let joined = engine.spread(&[0, 2], 100, Direction::Forward, 4);
    assert!(joined - base <= alone, "gain grew when seeds were added");
    // on this chain the gain collapses to zero exactly
    assert_eq!(joined, base);
}

proptest! {
    #[test]
    fn marginal_gains_diminish_on_random_forests(
        parents in prop::collection::vec(prop::option::of(0usize..64), 1..12),
        s_pick in 0usize..64,
        v_pick in 0usize..64,
    ) {
        // node 0 is a root; node i + 1 optionally hangs under one
        // earlier node, so every in-degree is at most 1, every weight
        // is exactly 1.0 and a single trial is the exact spread
        let n = parents.len() + 1;
        let mut children: Vec<Vec<u32>> = vec![Vec::new(); n];
        for (i, parent) in parents.iter().enumerate() {
            if let Some(p) = parent {
                children[p % (i + 1)].push((i + 1) as u32);
            }
        }
        let mut b = GraphStore::builder("forest");
        for kids in &children {
            b.push_node(kids.iter().map(|&d| Edge::new(d)));
        }
        let g = b.build(WeightModel::WeightedCascade).unwrap();
        let engine = DiffusionModel::IndependentCascade.build(&g);

        let s = (s_pick % n) as u32;
        let v = (v_pick % n) as u32;
        prop_assume!(s != v);

        let alone = engine.spread(&[v], 1, Direction::Forward, 1);
        let base = engine.spread(&[s], 1, Direction::Forward, 1);
        let joined = engine.spread(&[s, v], 1, Direction::Forward, 1);
        prop_assert!(
            joined - base <= alone,
            "gain of {v} on top of {{{s}}} grew: {} > {}",
            joined - base,
            alone,
        );
    }
}

#[test]
fn solver_names_are_stable_identifiers() {
    let g = full_weight_chain();
    let cases = [
        ("celf", "CELF-Greedy,10000"),
        ("imm", "IMM"),
        ("ipa", "IPA,320"),
        ("pr", "PageRank,10"),
        ("degree", "DegreeDiscount"),
        ("highdegree", "HighDegree"),
        ("random", "Random"),
        ("wd", "WD"),
    ];
    for (selector, expected) in cases {
        let solver = request(selector)
            .build(&g, DiffusionModel::IndependentCascade, 1)
            .unwrap();
        assert_eq!(solver.name(), expected);
    }
}
