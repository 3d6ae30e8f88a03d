use nalgebra::Vector3;

use crate::vehicle::Rocket;

/// Capability to steer a rocket: observe the state and the current total
/// force each tick and update the commanded thrust direction and throttle.
///
/// Implement this to plug alternative steering laws into a `Trial`.
pub trait Guidance {
    /// Observe `(rocket, total_force, time, dt)` and mutate the rocket's
    /// thrust command. Called once per tick before integration.
    fn update(&mut self, rocket: &mut Rocket, total_force: &Vector3<f64>, time: f64, dt: f64);

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
