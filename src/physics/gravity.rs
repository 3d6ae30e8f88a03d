use nalgebra::Vector3;

use crate::constants::{BIG_G, EARTH_MASS, EARTH_RADIUS};
use crate::math;

/// Inverse-square gravitational acceleration magnitude at a given altitude.
/// Negative altitudes clamp to the surface value.
pub fn gravity(altitude: f64) -> f64 {
    let r = EARTH_RADIUS + altitude.max(0.0);
    BIG_G * EARTH_MASS / (r * r)
}

/// Gravitational force on a body, directed toward the planet center.
pub fn gravity_force(position: &Vector3<f64>, mass: f64) -> Vector3<f64> {
    let altitude = (position.norm() - EARTH_RADIUS).max(0.0);
    math::normalized_or_zero(position) * (-gravity(altitude) * mass)
}
