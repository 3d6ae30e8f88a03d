use nalgebra::Vector3;

use crate::physics::{aerodynamics, gravity};
use crate::vehicle::Rocket;

/// Stateless force model. Pure functions of position/velocity, so a single
/// value is safely shared read-only across any number of trials.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl Environment {
    pub fn new() -> Self {
        Self
    }

    /// Gravitational acceleration magnitude at `altitude`.
    pub fn gravity(&self, altitude: f64) -> f64 {
        gravity::gravity(altitude)
    }

    /// Atmospheric density at `altitude`.
    pub fn atmospheric_density(&self, altitude: f64) -> f64 {
        crate::physics::atmosphere::density(altitude)
    }

    /// Gravitational force on an arbitrary body.
    pub fn gravity_force(&self, position: &Vector3<f64>, mass: f64) -> Vector3<f64> {
        gravity::gravity_force(position, mass)
    }

    /// Drag force on an arbitrary body.
    pub fn drag_force(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        drag_coefficient: f64,
        area: f64,
    ) -> Vector3<f64> {
        aerodynamics::drag_force(position, velocity, drag_coefficient, area)
    }

    /// Gravitational force on a rocket in its current state.
    pub fn gravity_force_on(&self, rocket: &Rocket) -> Vector3<f64> {
        gravity::gravity_force(&rocket.position(), rocket.total_mass())
    }

    /// Drag force on a rocket in its current state.
    pub fn drag_force_on(&self, rocket: &Rocket) -> Vector3<f64> {
        aerodynamics::drag_force(
            &rocket.position(),
            &rocket.velocity(),
            rocket.drag_coefficient(),
            rocket.cross_section_area(),
        )
    }
}
