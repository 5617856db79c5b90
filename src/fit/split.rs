//! Seeded train / validation / test partitioning.

use rand::prelude::*;
use rand::rngs::StdRng;

/// Index sets for one partition. Every input index lands in exactly one set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with `seed`, hold out `ceil(test_fraction * n)` rows for
/// test, then `ceil(validation_fraction * rest)` of the remainder for
/// validation. With 0.15 / 0.176 this gives roughly 70 / 15 / 15.
pub fn split_indices(n: usize, test_fraction: f64, validation_fraction: f64, seed: u64) -> SplitIndices {
    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let n_test = holdout(n, test_fraction);
    let n_val = holdout(n - n_test, validation_fraction);

    let test = idx[..n_test].to_vec();
    let validation = idx[n_test..n_test + n_val].to_vec();
    let train = idx[n_test + n_val..].to_vec();

    SplitIndices { train, validation, test }
}

fn holdout(n: usize, fraction: f64) -> usize {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    ((n as f64 * fraction).ceil() as usize).min(n)
}
