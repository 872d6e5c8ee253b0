use super::{InvalidKSnafu, KMeansError};
use rand::RngExt;
use rand::seq::index;
use snafu::prelude::*;

/// Picks `k` distinct pixel indices uniformly at random.
///
/// Sampling is without replacement, so `k` can't exceed `n`. Identical
/// colors at different indices can still be picked together.
pub fn find_initial(rng: &mut impl RngExt, n: usize, k: usize) -> Result<Vec<usize>, KMeansError> {
    ensure!(k >= 1 && k <= n, InvalidKSnafu { k, available: n });

    Ok(index::sample(rng, n, k).into_vec())
}
