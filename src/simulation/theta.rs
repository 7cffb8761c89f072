//! Preference vector sampling

use rand::Rng;

use crate::core::error::Result;
use crate::core::types::PreferenceVector;

/// Inclusive range of the raw integer weight given to each object type
pub const THETA_WEIGHT_MIN: u32 = 1;
pub const THETA_WEIGHT_MAX: u32 = 10;

/// Draw theta: a uniform integer weight in `[1, 10]` per type, normalised to sum to 1
pub fn draw_theta<R: Rng + ?Sized>(num_objects: usize, rng: &mut R) -> Result<PreferenceVector> {
    let raw: Vec<u32> = (0..num_objects)
        .map(|_| rng.gen_range(THETA_WEIGHT_MIN..=THETA_WEIGHT_MAX))
        .collect();
    PreferenceVector::from_weights(&raw)
}
