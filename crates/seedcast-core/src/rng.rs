//! Per-unit random generator derivation.
//!
//! Every parallel unit of work (a Monte-Carlo trial, an RR sample, a
//! solver's estimation pass) owns its own generator, derived from a
//! run-level seed and the unit's stream index. Generator state is
//! never shared between threads, and a fixed run seed reproduces the
//! full run regardless of scheduling order.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// splitmix64 finalizer. Decorrelates consecutive stream indices
/// before they are used as generator seeds.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Returns the generator for stream `index` of the run identified by
/// `run_seed`.
pub fn stream_rng(run_seed: u64, index: u64) -> SmallRng {
    SmallRng::seed_from_u64(mix(run_seed.wrapping_add(mix(index))))
}
