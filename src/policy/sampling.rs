//! Categorical sampling over validated probability rows

use rand::Rng;

/// Draw an index from a categorical distribution
///
/// `probabilities` must be non-negative and sum to 1 (within tolerance); the
/// policy table guarantees this at construction. Walks the cumulative sum
/// against one uniform draw in `[0, 1)`. Rounding slack at the top end falls
/// to the last index with nonzero probability, never to a zero-probability
/// entry.
pub fn sample_index<R: Rng + ?Sized>(rng: &mut R, probabilities: &[f64]) -> Option<usize> {
    let last_nonzero = probabilities.iter().rposition(|&p| p > 0.0)?;
    let mut threshold: f64 = rng.gen();

    for (i, &p) in probabilities.iter().enumerate() {
        if p > 0.0 && threshold < p {
            return Some(i);
        }
        threshold -= p;
    }

    Some(last_nonzero)
}
