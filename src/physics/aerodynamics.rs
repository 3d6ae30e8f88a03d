use nalgebra::Vector3;

use crate::constants::EARTH_RADIUS;
use crate::physics::atmosphere;

/// Quadratic aerodynamic drag opposing velocity.
/// Returns the zero vector below a small speed epsilon.
pub fn drag_force(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    drag_coefficient: f64,
    area: f64,
) -> Vector3<f64> {
    let altitude = (position.norm() - EARTH_RADIUS).max(0.0);
    let speed = velocity.norm();
    if speed < 1e-10 {
        return Vector3::zeros();
    }

    let rho = atmosphere::density(altitude);
    let drag = 0.5 * drag_coefficient * rho * speed * speed * area;
    -(velocity / speed) * drag
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn surface() -> Vector3<f64> {
        Vector3::new(0.0, EARTH_RADIUS, 0.0)
    }

    #[test]
    fn no_drag_at_rest() {
        let f = drag_force(&surface(), &Vector3::zeros(), 0.3, 10.0);
        assert_eq!(f, Vector3::zeros());
    }

    #[test]
    fn drag_opposes_velocity() {
        let vel = Vector3::new(0.0, 300.0, 0.0);
        let f = drag_force(&surface(), &vel, 0.3, 10.0);
        assert!(f.y < 0.0, "Drag should oppose upward velocity");
        assert_relative_eq!(f.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn drag_scales_with_speed_squared() {
        let f1 = drag_force(&surface(), &Vector3::new(100.0, 0.0, 0.0), 0.3, 10.0).norm();
        let f2 = drag_force(&surface(), &Vector3::new(200.0, 0.0, 0.0), 0.3, 10.0).norm();
        assert_relative_eq!(f2, 4.0 * f1, epsilon = 1e-9);
    }

    #[test]
    fn drag_fades_with_altitude() {
        let vel = Vector3::new(500.0, 0.0, 0.0);
        let low = drag_force(&surface(), &vel, 0.3, 10.0).norm();
        let high_pos = Vector3::new(0.0, EARTH_RADIUS + 60_000.0, 0.0);
        let high = drag_force(&high_pos, &vel, 0.3, 10.0).norm();
        assert!(high < low * 1e-2, "Drag at 60 km should be far below sea level");
    }
}
