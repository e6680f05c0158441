//! Deterministic random number generation for particle layouts.
//!
//! RULE: Layout generation never calls any platform RNG.
//! Each body gets its own stream, seeded from (master_seed XOR body_index),
//! so adding a body never changes the layout of existing ones.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct LayoutRng {
    inner: Pcg64Mcg,
}

impl LayoutRng {
    /// The body index must never change once assigned.
    pub fn new(master_seed: u64, body_index: u64) -> Self {
        let derived_seed = master_seed ^ (body_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}
