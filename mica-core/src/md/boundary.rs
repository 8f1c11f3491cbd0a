//! Periodic boundary handling.

use crate::types::Vec3;

/// Map a raw displacement vector to its minimum-image equivalent.
///
/// Each component is folded into [−L/2, L/2] by subtracting the nearest
/// integer multiple of the box length. Rounding is ties-to-even so a
/// component sitting exactly on ±L/2 maps to itself rather than flipping
/// sign on repeated application.
pub fn minimum_image(mut delta: Vec3, box_length: f64) -> Vec3 {
    for k in 0..3 {
        delta[k] -= box_length * (delta[k] / box_length).round_ties_even();
    }
    delta
}
