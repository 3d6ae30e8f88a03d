use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::constants::{ARRIVAL_TOLERANCE, EARTH_RADIUS, MAX_SIM_TIME};
use crate::gnc::Guidance;
use crate::physics::Environment;
use crate::vehicle::{Rocket, RocketSnapshot};

// ---------------------------------------------------------------------------
// Run termination
// ---------------------------------------------------------------------------

/// Why a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Closest approach passed within tolerance.
    Arrived,
    /// Propellant exhausted before reaching the target.
    OutOfFuel,
    /// Simulated-time ceiling hit.
    TimeLimit,
}

/// One recorded telemetry sample.
#[derive(Debug, Clone, Copy)]
pub struct TelemetrySample {
    pub time: f64,
    pub state: RocketSnapshot,
}

// ---------------------------------------------------------------------------
// Trial driver
// ---------------------------------------------------------------------------

/// Drives one simulation run: force -> guidance -> force -> integrate, every
/// tick, with closest-approach arrival detection. A trial without a guidance
/// controller flies ballistic.
pub struct Trial<'a> {
    rocket: Rocket,
    environment: &'a Environment,
    guidance: Option<Box<dyn Guidance>>,
    destination: Vector3<f64>,
    time: f64,
    min_distance: f64,
    was_close: bool,
    tolerance: f64,
}

impl<'a> Trial<'a> {
    /// Place the rocket on the pad and take ownership of it for this run.
    pub fn new(
        mut rocket: Rocket,
        environment: &'a Environment,
        destination: Vector3<f64>,
        guidance: Option<Box<dyn Guidance>>,
    ) -> Self {
        rocket.set_position(Vector3::new(0.0, EARTH_RADIUS + 1.0, 0.0));
        Self {
            rocket,
            environment,
            guidance,
            destination,
            time: 0.0,
            min_distance: f64::INFINITY,
            was_close: false,
            tolerance: ARRIVAL_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sum of gravity, drag, and thrust on the rocket right now.
    pub fn total_force(&self) -> Vector3<f64> {
        self.environment.gravity_force_on(&self.rocket)
            + self.environment.drag_force_on(&self.rocket)
            + self.rocket.thrust()
    }

    /// One tick: let the guidance observe the current forces and steer, then
    /// integrate under the updated thrust command.
    pub fn step(&mut self, dt: f64) {
        let current_force = self.total_force();
        if let Some(guidance) = self.guidance.as_mut() {
            guidance.update(&mut self.rocket, &current_force, self.time, dt);
        }

        let new_force = self.total_force();
        self.rocket.update(dt, &new_force);
        self.time += dt;

        debug!(
            time = self.time,
            altitude = self.rocket.altitude(),
            speed = self.rocket.velocity().norm(),
            fuel = self.rocket.fuel_mass(),
            "tick"
        );
    }

    /// Closest-approach arrival test. Tracks the minimum distance seen and a
    /// hysteresis flag set once within twice the tolerance; declares arrival
    /// only after the distance starts increasing again past a minimum that
    /// was within tolerance. A fast flyby that never turns around does not
    /// count as arrived.
    pub fn is_arrived(&mut self) -> bool {
        let distance = (self.rocket.position() - self.destination).norm();

        if distance < self.min_distance {
            self.min_distance = distance;
        }
        if distance < 2.0 * self.tolerance {
            self.was_close = true;
        }

        self.was_close && distance > self.min_distance && self.min_distance <= self.tolerance
    }

    /// Loop `step` until the time ceiling, fuel exhaustion, or arrival.
    pub fn run(&mut self, dt: f64) -> StopReason {
        while self.should_continue() {
            self.step(dt);
        }
        let reason = self.stop_reason();
        self.log_stop(reason);
        reason
    }

    /// Like `run`, but records a telemetry sample every `stride` ticks
    /// (plus the initial and final states).
    pub fn run_recorded(&mut self, dt: f64, stride: usize) -> (StopReason, Vec<TelemetrySample>) {
        let stride = stride.max(1);
        let capacity = ((MAX_SIM_TIME / dt) as usize / stride + 2).min(400_000);
        let mut trajectory = Vec::with_capacity(capacity);
        trajectory.push(self.sample());

        let mut ticks = 0usize;
        while self.should_continue() {
            self.step(dt);
            ticks += 1;
            if ticks % stride == 0 {
                trajectory.push(self.sample());
            }
        }
        if ticks % stride != 0 {
            trajectory.push(self.sample());
        }

        let reason = self.stop_reason();
        self.log_stop(reason);
        (reason, trajectory)
    }

    fn should_continue(&mut self) -> bool {
        self.time < MAX_SIM_TIME && !self.rocket.is_out_of_fuel() && !self.is_arrived()
    }

    fn stop_reason(&self) -> StopReason {
        if self.min_distance <= self.tolerance {
            StopReason::Arrived
        } else if self.rocket.is_out_of_fuel() {
            StopReason::OutOfFuel
        } else {
            StopReason::TimeLimit
        }
    }

    fn log_stop(&self, reason: StopReason) {
        match reason {
            StopReason::Arrived => info!(
                time = self.time,
                min_distance = self.min_distance,
                "run stopped: closest approach within tolerance"
            ),
            StopReason::OutOfFuel => warn!(
                min_distance = self.min_distance,
                "run stopped: out of fuel"
            ),
            StopReason::TimeLimit => info!(
                min_distance = self.min_distance,
                "run stopped: time ceiling reached"
            ),
        }
    }

    /// Rewind the clock and put the rocket back on the pad. Consumed
    /// propellant is not restored.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.min_distance = f64::INFINITY;
        self.was_close = false;
        self.rocket.set_position(Vector3::new(0.0, EARTH_RADIUS + 1.0, 0.0));
        self.rocket.set_velocity(Vector3::zeros());
        self.rocket.set_thrust_level(0.0);
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn rocket(&self) -> &Rocket {
        &self.rocket
    }

    pub fn rocket_mut(&mut self) -> &mut Rocket {
        &mut self.rocket
    }

    pub fn destination(&self) -> Vector3<f64> {
        self.destination
    }

    /// Best distance to the destination observed so far.
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Straight-line distance between the rocket and the destination now.
    pub fn miss_distance(&self) -> f64 {
        (self.rocket.position() - self.destination).norm()
    }

    pub fn sample(&self) -> TelemetrySample {
        TelemetrySample {
            time: self.time,
            state: self.rocket.snapshot(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TIME_STEP;
    use crate::gnc::GravityTurnGuidance;

    fn environment() -> Environment {
        Environment::new()
    }

    fn test_rocket() -> Rocket {
        Rocket::new(5_000.0, 50_000.0, 200.0, 300.0, 10.0, 0.2).unwrap()
    }

    fn near_destination() -> Vector3<f64> {
        Vector3::new(0.0, EARTH_RADIUS + 10_000.0, 0.0)
    }

    #[test]
    fn arrival_requires_passing_the_closest_approach() {
        let env = environment();
        let mut trial = Trial::new(test_rocket(), &env, near_destination(), None);

        // Monotonically decreasing distance, ending inside tolerance:
        // never arrived, the inflection has not been seen.
        for dy in [8_000.0, 5_000.0, 2_500.0, 1_200.0, 600.0] {
            trial
                .rocket_mut()
                .set_position(near_destination() - Vector3::new(0.0, dy, 0.0));
            assert!(!trial.is_arrived(), "No arrival while still closing ({dy} m out)");
        }

        // Distance starts growing past a sub-tolerance minimum: arrived.
        trial
            .rocket_mut()
            .set_position(near_destination() - Vector3::new(0.0, 900.0, 0.0));
        assert!(trial.is_arrived(), "Closest approach passed within tolerance");
    }

    #[test]
    fn flyby_outside_tolerance_is_not_arrival() {
        let env = environment();
        let mut trial = Trial::new(test_rocket(), &env, near_destination(), None);

        // Sweeps past at 3.5 km: was_close never set, min above tolerance.
        for dy in [8_000.0, 3_500.0, 4_000.0, 9_000.0] {
            trial
                .rocket_mut()
                .set_position(near_destination() - Vector3::new(dy, 0.0, 0.0));
            assert!(!trial.is_arrived(), "Flyby at {dy} m must not count as arrival");
        }
    }

    #[test]
    fn ballistic_trial_hits_time_ceiling() {
        let env = environment();
        // No guidance, engine off: the rocket sits on the pad until the clock
        // runs out. A coarse timestep keeps the test fast.
        let mut trial = Trial::new(test_rocket(), &env, near_destination(), None);
        let reason = trial.run(1.0);
        assert_eq!(reason, StopReason::TimeLimit);
        assert!(trial.time() >= MAX_SIM_TIME);
    }

    #[test]
    fn full_throttle_without_guidance_stops_on_fuel_exhaustion() {
        let env = environment();
        let mut rocket = test_rocket();
        rocket.set_thrust_level(1.0);
        // Destination far off to the side so the vertical burn cannot arrive.
        let destination = Vector3::new(2.0e6, EARTH_RADIUS, 2.0e6);
        let mut trial = Trial::new(rocket, &env, destination, None);

        let reason = trial.run(0.05);
        assert_eq!(reason, StopReason::OutOfFuel);
        assert!(trial.rocket().is_out_of_fuel());
        // 50 t of fuel at 200 kg/s burns out in 250 s.
        assert!(trial.time() < 300.0, "Burnout expected by t=250s, got {}", trial.time());
    }

    #[test]
    fn reset_rewinds_clock_and_pad_state() {
        let env = environment();
        let mut rocket = test_rocket();
        rocket.set_thrust_level(1.0);
        let mut trial = Trial::new(rocket, &env, near_destination(), None);
        for _ in 0..100 {
            trial.step(0.01);
        }
        assert!(trial.time() > 0.0);

        trial.reset();
        assert_eq!(trial.time(), 0.0);
        assert_eq!(trial.min_distance(), f64::INFINITY);
        assert_eq!(trial.rocket().velocity(), Vector3::zeros());
        assert_eq!(trial.rocket().thrust_level(), 0.0);
        assert!((trial.rocket().position().norm() - (EARTH_RADIUS + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn recorded_run_strides_and_keeps_final_state() {
        let env = environment();
        let mut rocket = test_rocket();
        rocket.set_thrust_level(1.0);
        let destination = Vector3::new(2.0e6, EARTH_RADIUS, 2.0e6);
        let mut trial = Trial::new(rocket, &env, destination, None);

        let (reason, trajectory) = trial.run_recorded(0.05, 100);
        assert_eq!(reason, StopReason::OutOfFuel);
        assert!(trajectory.len() > 2);
        assert_eq!(trajectory[0].time, 0.0);
        let last = trajectory.last().unwrap();
        assert!((last.time - trial.time()).abs() < 1e-9, "Final sample must be the final state");
    }

    // -----------------------------------------------------------------------
    // End-to-end guided ascent
    // -----------------------------------------------------------------------

    #[test]
    fn guided_ascent_terminates_with_a_single_classified_reason() {
        let env = environment();
        let destination = Vector3::new(10_000.0, EARTH_RADIUS + 30_000.0, 5_000.0);
        let rocket = test_rocket();
        let guidance =
            GravityTurnGuidance::new(30_000.0, destination, env, 2_000.0, 0.5, 8.0).unwrap();
        let mut trial = Trial::new(rocket, &env, destination, Some(Box::new(guidance)));

        let (reason, trajectory) = trial.run_recorded(TIME_STEP, 100);

        assert!(trial.time() <= MAX_SIM_TIME + TIME_STEP);

        // Fuel is non-increasing at every sampled time.
        for pair in trajectory.windows(2) {
            assert!(
                pair[1].state.fuel_mass <= pair[0].state.fuel_mass + 1e-9,
                "Fuel increased between t={} and t={}",
                pair[0].time,
                pair[1].time
            );
            assert!(pair[1].state.thrust_level >= 0.0 && pair[1].state.thrust_level <= 1.0);
        }

        // Orbital radius never dips below the surface.
        for s in &trajectory {
            assert!(
                s.state.position.norm() >= EARTH_RADIUS - 1e-6,
                "Radius below surface at t={}",
                s.time
            );
        }

        match reason {
            StopReason::Arrived => {
                assert!(
                    trial.min_distance() <= ARRIVAL_TOLERANCE,
                    "Arrival declared with miss {}",
                    trial.min_distance()
                );
            }
            StopReason::OutOfFuel => assert!(trial.rocket().is_out_of_fuel()),
            StopReason::TimeLimit => assert!(trial.time() >= MAX_SIM_TIME),
        }
    }
}
