//! Deterministic seed derivation and pseudo-random helpers for connector shapes.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::LocationId;

/// Seed for an unordered location pair. Symmetric, so draw order never changes the shape.
pub fn edge_seed(a: &LocationId, b: &LocationId) -> u64 {
    xxh3_64(a.as_str().as_bytes()) ^ xxh3_64(b.as_str().as_bytes())
}

pub(crate) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

/// Per-edge random stream used for curve wobble.
pub(crate) struct ShapeStream {
    rng: ChaCha8Rng,
}

impl ShapeStream {
    pub(crate) fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform draw in `[0, 1)` built from the top 53 bits.
    pub(crate) fn unit(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    /// Uniform draw in `[-1, 1)`.
    pub(crate) fn signed_unit(&mut self) -> f64 {
        self.unit() * 2.0 - 1.0
    }
}
