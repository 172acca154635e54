//! Labeled deterministic sub-stream derivation for generation stages.
//!
//! Every stage draws exclusively from a `SubStream` derived via a string
//! label (`"overworld"`, `"interior:3,-1:0"`, ...). Two derivations with the
//! same parent seed and label always yield identical streams, so stages may
//! be reordered or parallelized without changing any output.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Root of all randomness for one generation run.
#[derive(Clone, Copy, Debug)]
pub struct RngContext {
    seed: u64,
}

impl RngContext {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent, reproducible stream keyed by `label`.
    pub fn derive(&self, label: &str) -> SubStream {
        let mixed = finalize_mix(xxh3_64_with_seed(label.as_bytes(), self.seed));
        SubStream { rng: ChaCha8Rng::seed_from_u64(mixed) }
    }
}

fn finalize_mix(value: u64) -> u64 {
    let mut mixed = value ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

/// One labeled pseudo-random stream. Draw helpers use inclusive bounds to
/// match how tuning tables are written.
pub struct SubStream {
    rng: ChaCha8Rng,
}

impl SubStream {
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    pub fn range_usize(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        let range_size = (max_value - min_value + 1) as u64;
        min_value + (self.rng.next_u64() % range_size) as usize
    }

    pub fn range_u32(&mut self, min_value: u32, max_value: u32) -> u32 {
        debug_assert!(min_value <= max_value);
        let range_size = u64::from(max_value - min_value) + 1;
        min_value + (self.rng.next_u64() % range_size) as u32
    }

    /// Uniform roll in `0..100`, for percent-threshold tables.
    pub fn roll_percent(&mut self) -> u32 {
        (self.rng.next_u64() % 100) as u32
    }

    pub fn chance_percent(&mut self, percent: u32) -> bool {
        self.roll_percent() < percent
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        debug_assert!(!items.is_empty());
        &items[self.range_usize(0, items.len() - 1)]
    }

    /// Weighted index selection. Returns `None` when every weight is zero,
    /// which callers treat as "no candidate" rather than a defect.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }
        let mut remaining = self.rng.next_u64() % total;
        for (index, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if remaining < weight {
                return Some(index);
            }
            remaining -= weight;
        }
        None
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for upper in (1..items.len()).rev() {
            let chosen = self.range_usize(0, upper);
            items.swap(upper, chosen);
        }
    }
}
