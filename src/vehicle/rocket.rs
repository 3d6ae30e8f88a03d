use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::constants::{EARTH_RADIUS, G0};
use crate::error::SimError;
use crate::math;

// ---------------------------------------------------------------------------
// Point-mass rocket with propellant bookkeeping
// ---------------------------------------------------------------------------

/// Flight-dynamics state of a single-stage point-mass rocket.
///
/// Thrust direction is a rate-limited unit vector, not a rigid-body attitude:
/// `set_thrust` slews it by at most a caller-supplied angle per step. The
/// integrator is semi-implicit Euler, which holds up fine at dt ~ 0.01 s for
/// these trajectories.
#[derive(Debug, Clone)]
pub struct Rocket {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    thrust_direction: Vector3<f64>,
    dry_mass: f64,            // kg
    fuel_mass: f64,           // kg
    burn_rate: f64,           // kg/s at full throttle
    specific_impulse: f64,    // s
    cross_section_area: f64,  // m^2
    drag_coefficient: f64,
    current_thrust: f64,      // N
    thrust_level: f64,        // 0..1
}

/// Read-only telemetry snapshot for rendering and logging consumers.
#[derive(Debug, Clone, Copy)]
pub struct RocketSnapshot {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub thrust_direction: Vector3<f64>,
    pub fuel_mass: f64,
    pub thrust_level: f64,
    pub total_mass: f64,
}

impl Rocket {
    /// Build a rocket on the pad: surface position along +Y, at rest,
    /// engine off, thrust vector pointing radially out.
    pub fn new(
        dry_mass: f64,
        fuel_mass: f64,
        burn_rate: f64,
        specific_impulse: f64,
        cross_section_area: f64,
        drag_coefficient: f64,
    ) -> Result<Self, SimError> {
        if dry_mass <= 0.0 {
            return Err(SimError::InvalidRocket(format!("dry mass must be positive, got {dry_mass}")));
        }
        if fuel_mass < 0.0 {
            return Err(SimError::InvalidRocket(format!("fuel mass must be non-negative, got {fuel_mass}")));
        }
        if burn_rate <= 0.0 {
            return Err(SimError::InvalidRocket(format!("burn rate must be positive, got {burn_rate}")));
        }
        if specific_impulse <= 0.0 {
            return Err(SimError::InvalidRocket(format!(
                "specific impulse must be positive, got {specific_impulse}"
            )));
        }
        if cross_section_area <= 0.0 {
            return Err(SimError::InvalidRocket(format!(
                "cross-section area must be positive, got {cross_section_area}"
            )));
        }
        if drag_coefficient < 0.0 {
            return Err(SimError::InvalidRocket(format!(
                "drag coefficient must be non-negative, got {drag_coefficient}"
            )));
        }

        Ok(Self {
            position: Vector3::new(0.0, EARTH_RADIUS, 0.0),
            velocity: Vector3::zeros(),
            thrust_direction: Vector3::new(0.0, 1.0, 0.0),
            dry_mass,
            fuel_mass,
            burn_rate,
            specific_impulse,
            cross_section_area,
            drag_coefficient,
            current_thrust: 0.0,
            thrust_level: 0.0,
        })
    }

    /// Advance the state by one timestep under an externally computed total
    /// force. Burns propellant first, then integrates, then clamps against
    /// the planet surface.
    pub fn update(&mut self, dt: f64, total_force: &Vector3<f64>) {
        if self.fuel_mass > 0.0 && self.current_thrust > 0.0 {
            let exhaust_velocity = self.specific_impulse * G0;
            let actual_burn_rate = self.current_thrust / exhaust_velocity;
            self.fuel_mass = (self.fuel_mass - actual_burn_rate * dt).max(0.0);

            if self.fuel_mass <= 0.0 {
                self.current_thrust = 0.0;
                self.thrust_level = 0.0;
                warn!("fuel exhausted");
            }
        }

        let acceleration = *total_force / self.total_mass();
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        // Ground contact: project back onto the surface and drop the inward
        // radial velocity component. No restitution.
        if self.position.norm() < EARTH_RADIUS {
            self.position = math::normalized_or_zero(&self.position) * EARTH_RADIUS;
            let radial = math::normalized_or_zero(&self.position);
            let radial_speed = self.velocity.dot(&radial);
            if radial_speed < 0.0 {
                self.velocity -= radial * radial_speed;
            }
        }
    }

    /// Slew the thrust vector toward `desired_direction`, advancing by at
    /// most `max_angle_per_step` degrees. Snaps directly when the remaining
    /// angle is negligible.
    pub fn set_thrust(&mut self, desired_direction: &Vector3<f64>, max_angle_per_step: f64) {
        let desired = math::normalized_or_zero(desired_direction);
        let angle = math::angle_deg(&self.thrust_direction, &desired);

        if angle < 1e-5 {
            self.thrust_direction = desired;
            return;
        }

        let t = (max_angle_per_step / angle).min(1.0);
        let blended = self.thrust_direction + (desired - self.thrust_direction) * t;
        self.thrust_direction = math::normalized_or_zero(&blended);
    }

    /// Command a throttle setting in [0, 1]. Forced to zero with the engine
    /// cut once propellant is exhausted.
    pub fn set_thrust_level(&mut self, level: f64) {
        if self.is_out_of_fuel() {
            self.current_thrust = 0.0;
            self.thrust_level = 0.0;
            debug!("throttle command ignored, no fuel remaining");
            return;
        }
        self.thrust_level = level.clamp(0.0, 1.0);
        self.current_thrust = self.thrust_level * self.specific_impulse * G0 * self.burn_rate;
    }

    pub fn is_out_of_fuel(&self) -> bool {
        self.fuel_mass <= 0.0
    }

    /// Thrust force vector at the current throttle setting.
    pub fn thrust(&self) -> Vector3<f64> {
        self.thrust_direction * self.current_thrust
    }

    /// Thrust magnitude at full throttle: Isp * g0 * burn rate.
    pub fn max_thrust(&self) -> f64 {
        self.specific_impulse * G0 * self.burn_rate
    }

    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.fuel_mass
    }

    /// Thrust-to-weight ratio at full throttle and current mass.
    pub fn twr(&self) -> f64 {
        self.max_thrust() / (self.total_mass() * G0)
    }

    /// Ideal delta-v remaining (Tsiolkovsky rocket equation).
    pub fn ideal_delta_v(&self) -> f64 {
        self.specific_impulse * G0 * (self.total_mass() / self.dry_mass).ln()
    }

    pub fn dry_mass(&self) -> f64 {
        self.dry_mass
    }

    pub fn fuel_mass(&self) -> f64 {
        self.fuel_mass
    }

    pub fn burn_rate(&self) -> f64 {
        self.burn_rate
    }

    pub fn specific_impulse(&self) -> f64 {
        self.specific_impulse
    }

    pub fn cross_section_area(&self) -> f64 {
        self.cross_section_area
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn thrust_level(&self) -> f64 {
        self.thrust_level
    }

    pub fn current_thrust(&self) -> f64 {
        self.current_thrust
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3<f64>) {
        self.position = position;
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    /// Altitude above the planet surface.
    pub fn altitude(&self) -> f64 {
        self.position.norm() - EARTH_RADIUS
    }

    pub fn snapshot(&self) -> RocketSnapshot {
        RocketSnapshot {
            position: self.position,
            velocity: self.velocity,
            thrust_direction: self.thrust_direction,
            fuel_mass: self.fuel_mass,
            thrust_level: self.thrust_level,
            total_mass: self.total_mass(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
