use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::constants::ARRIVAL_TOLERANCE;
use crate::error::SimError;
use crate::math;
use crate::physics::Environment;
use crate::vehicle::Rocket;

use super::controller::Guidance;

// Approach-phase throttle policy.
const CRUISE_THROTTLE: f64 = 0.9;
const MIN_BRAKE_THROTTLE: f64 = 0.2;
const MIN_DECELERATION: f64 = 0.1; // m/s^2 floor for the braking estimate

// ---------------------------------------------------------------------------
// Ascent phases
// ---------------------------------------------------------------------------

/// Guidance phases, strictly forward. Fuel exhaustion jumps straight to
/// `TargetApproach` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    VerticalAscent,
    GravityTurn,
    TargetApproach,
}

// ---------------------------------------------------------------------------
// Gravity-turn guidance
// ---------------------------------------------------------------------------

/// Three-phase closed-loop steering toward a rendezvous point: vertical
/// ascent off the pad, an altitude-scheduled gravity turn toward the target
/// bearing, then a braking approach that throttles down inside the estimated
/// stopping distance.
///
/// All angles and angular rates are in degrees.
pub struct GravityTurnGuidance {
    destination: Vector3<f64>,
    target_altitude: f64,
    turn_start_altitude: f64,
    turn_rate: f64,            // deg/s, carried in the searched configuration
    max_angular_velocity: f64, // deg/s thrust-vector slew limit
    environment: Environment,
    phase: Phase,
}

impl GravityTurnGuidance {
    pub fn new(
        target_altitude: f64,
        destination: Vector3<f64>,
        environment: Environment,
        turn_start_altitude: f64,
        turn_rate: f64,
        max_angular_velocity: f64,
    ) -> Result<Self, SimError> {
        if target_altitude <= 0.0 {
            return Err(SimError::InvalidGuidance(format!(
                "target altitude must be positive, got {target_altitude}"
            )));
        }
        if turn_start_altitude < 0.0 || turn_start_altitude >= target_altitude {
            return Err(SimError::InvalidGuidance(format!(
                "turn start altitude {turn_start_altitude} must lie below target altitude {target_altitude}"
            )));
        }
        if max_angular_velocity <= 0.0 {
            return Err(SimError::InvalidGuidance(format!(
                "max angular velocity must be positive, got {max_angular_velocity}"
            )));
        }

        Ok(Self {
            destination,
            target_altitude,
            turn_start_altitude,
            turn_rate,
            max_angular_velocity,
            environment,
            phase: Phase::VerticalAscent,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target_altitude(&self) -> f64 {
        self.target_altitude
    }

    pub fn turn_start_altitude(&self) -> f64 {
        self.turn_start_altitude
    }

    pub fn turn_rate(&self) -> f64 {
        self.turn_rate
    }

    pub fn max_angular_velocity(&self) -> f64 {
        self.max_angular_velocity
    }

    #[cfg(test)]
    pub(crate) fn force_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Steering direction during the gravity turn: spherical interpolation
    /// from radial-outward to the horizontal bearing, scheduled by altitude,
    /// with a gravity-compensation bias that tapers off as the turn completes.
    fn turn_direction(&self, rocket: &Rocket) -> Vector3<f64> {
        let to_target = math::normalized_or_zero(&(self.destination - rocket.position()));
        let velocity_dir = math::normalized_or_zero(&rocket.velocity());
        let radial = math::normalized_or_zero(&rocket.position());

        // Bearing projected onto the local horizontal plane; when the target
        // sits directly overhead the projection vanishes, so follow the
        // velocity instead.
        let mut horizontal = to_target - radial * to_target.dot(&radial);
        if horizontal.norm() < 1e-5 {
            horizontal = velocity_dir;
        }
        let horizontal = math::normalized_or_zero(&horizontal);

        let turn_progress = ((rocket.altitude() - self.turn_start_altitude)
            / (self.target_altitude - self.turn_start_altitude))
            .clamp(0.0, 1.0);

        let desired = math::slerp(&radial, &horizontal, turn_progress);

        let gravity_dir = math::normalized_or_zero(&self.environment.gravity_force_on(rocket));
        let compensation = 1.0 - turn_progress;
        math::normalized_or_zero(&(desired - gravity_dir * compensation))
    }

    /// Final-approach steering: slew onto the direct bearing and throttle
    /// down proportionally inside the estimated stopping distance.
    fn approach(&self, rocket: &mut Rocket, time: f64, dt: f64) {
        let to_target = self.destination - rocket.position();
        let distance = to_target.norm();

        if distance < ARRIVAL_TOLERANCE {
            // Steering ends here; the trial's own distance tracking decides
            // when the closest approach has actually been passed.
            debug!(time, distance, "within arrival tolerance, steering released");
            return;
        }

        let bearing = to_target / distance;
        let closing_speed = rocket.velocity().dot(&bearing);

        let throttle = if closing_speed > 0.0 {
            let mass = rocket.total_mass();
            let drag_assist = self.environment.drag_force_on(rocket).norm() / mass;
            // Gravity pulling along the bearing eats into the deceleration
            // budget; gravity opposing the approach helps and is left out of
            // the estimate.
            let gravity_along =
                (self.environment.gravity_force_on(rocket).dot(&bearing) / mass).max(0.0);
            let deceleration =
                (rocket.max_thrust() / mass + drag_assist - gravity_along).max(MIN_DECELERATION);
            let stop_distance = closing_speed * closing_speed / (2.0 * deceleration);

            if distance < stop_distance {
                (distance / stop_distance).clamp(MIN_BRAKE_THROTTLE, 1.0)
            } else {
                CRUISE_THROTTLE
            }
        } else {
            // Receding or tangential: hold cruise and let the slew bring the
            // nose back onto the bearing.
            CRUISE_THROTTLE
        };

        rocket.set_thrust(&bearing, self.max_angular_velocity * dt);
        rocket.set_thrust_level(throttle);
    }
}

impl Guidance for GravityTurnGuidance {
    fn update(&mut self, rocket: &mut Rocket, _total_force: &Vector3<f64>, time: f64, dt: f64) {
        if rocket.is_out_of_fuel() {
            if self.phase != Phase::TargetApproach {
                warn!(time, "fuel exhausted, coasting toward target");
            }
            rocket.set_thrust_level(0.0);
            self.phase = Phase::TargetApproach;
            return;
        }

        let altitude = rocket.altitude().max(0.0);

        if self.phase == Phase::VerticalAscent {
            if altitude >= 0.5 * self.target_altitude {
                self.phase = Phase::GravityTurn;
                info!(altitude, "gravity turn initiated");
            } else {
                let radial = math::normalized_or_zero(&rocket.position());
                rocket.set_thrust(&radial, self.max_angular_velocity * dt);
                rocket.set_thrust_level(1.0);
                return;
            }
        }

        if self.phase == Phase::GravityTurn {
            let desired = self.turn_direction(rocket);
            let current = math::normalized_or_zero(&rocket.thrust());
            let error_deg = math::angle_deg(&current, &desired);

            rocket.set_thrust(&desired, self.max_angular_velocity * dt);
            rocket.set_thrust_level(1.0);

            // Both conditions required: pointing error settled AND most of
            // the climb done. Either alone transitions too early.
            if error_deg < 0.5 && altitude > 0.7 * self.target_altitude {
                self.phase = Phase::TargetApproach;
                info!(altitude, "target acquired, final approach");
            }
            return;
        }

        self.approach(rocket, time, dt);
    }

    fn name(&self) -> &str {
        "gravity-turn"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
