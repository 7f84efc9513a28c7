//! Random permutation by sort key.

use rand::Rng;
use std::cmp::Ordering;
use tracing::instrument;

/// Returns `items` in a uniformly random order.
///
/// Each element gets an independent random `f64` key, the elements are
/// sorted by key and the keys are dropped. Key collisions are not broken
/// deliberately; with continuous keys they do not matter in practice.
#[instrument(skip_all, fields(len = items.len()))]
pub fn shuffle<T, R>(items: Vec<T>, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let mut keyed: Vec<(f64, T)> = items
        .into_iter()
        .map(|item| (rng.random::<f64>(), item))
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    keyed.into_iter().map(|(_, item)| item).collect()
}
