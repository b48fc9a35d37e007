//! Uniform random selection over a counted collection.

use rand::Rng;

/// Pick a 0-based offset into a collection of `count` rows.
///
/// Returns `None` for an empty collection.
pub fn random_offset<R: Rng>(count: i64, rng: &mut R) -> Option<i64> {
    (count > 0).then(|| rng.random_range(0..count))
}
