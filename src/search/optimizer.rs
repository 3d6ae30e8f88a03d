use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{EARTH_RADIUS, TIME_STEP};
use crate::error::SimError;
use crate::gnc::GravityTurnGuidance;
use crate::physics::Environment;
use crate::sim::Trial;
use crate::vehicle::Rocket;

/// Weight converting leftover propellant mass into score penalty.
const FUEL_WEIGHT: f64 = 0.01;

// Fixed across all candidates; only the parameters below are searched.
const CROSS_SECTION_AREA: f64 = 10.0;
const DRAG_COEFFICIENT: f64 = 0.2;
const MAX_ANGULAR_VELOCITY: f64 = 8.0;

// ---------------------------------------------------------------------------
// Sampled parameter sets
// ---------------------------------------------------------------------------

/// Rocket design parameters drawn by the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocketParams {
    pub dry_mass: f64,
    pub fuel_mass: f64,
    pub burn_rate: f64,
    pub specific_impulse: f64,
    pub cross_section_area: f64,
    pub drag_coefficient: f64,
}

/// Guidance parameters drawn by the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidanceParams {
    pub target_altitude: f64,
    pub turn_start_altitude: f64,
    pub turn_rate: f64,
    pub max_angular_velocity: f64,
}

/// Uniform sampling intervals, `[low, high]` per parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRanges {
    pub dry_mass: [f64; 2],
    pub fuel_mass: [f64; 2],
    pub burn_rate: [f64; 2],
    pub specific_impulse: [f64; 2],
    pub turn_start_altitude: [f64; 2],
    pub turn_rate: [f64; 2],
}

impl Default for SearchRanges {
    fn default() -> Self {
        Self {
            dry_mass: [16_000.0, 24_000.0],
            fuel_mass: [160_000.0, 240_000.0],
            burn_rate: [400.0, 600.0],
            specific_impulse: [320.0, 480.0],
            turn_start_altitude: [14_000.0, 16_000.0],
            turn_rate: [0.55, 0.75],
        }
    }
}

impl SearchRanges {
    fn draw<R: Rng + ?Sized>(range: [f64; 2], rng: &mut R) -> f64 {
        if range[0] >= range[1] {
            return range[0];
        }
        rng.gen_range(range[0]..range[1])
    }
}

/// Best configuration retained by the search.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BestConfig {
    pub rocket: RocketParams,
    pub guidance: GuidanceParams,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Random hill-climbing search
// ---------------------------------------------------------------------------

/// Searches rocket-design and guidance parameters by pure random
/// hill-climbing: sample, run one trial to completion, keep the candidate
/// only if it strictly improves the best score. Score rewards both accuracy
/// and propellant efficiency: miss distance plus weighted unused fuel.
pub struct ParameterSearch<'a> {
    environment: &'a Environment,
    destination: Vector3<f64>,
    ranges: SearchRanges,
    dt: f64,
    best: Option<BestConfig>,
}

impl<'a> ParameterSearch<'a> {
    pub fn new(environment: &'a Environment, destination: Vector3<f64>) -> Self {
        Self {
            environment,
            destination,
            ranges: SearchRanges::default(),
            dt: TIME_STEP,
            best: None,
        }
    }

    pub fn with_ranges(mut self, ranges: SearchRanges) -> Self {
        self.ranges = ranges;
        self
    }

    /// Timestep used when evaluating candidates.
    pub fn with_timestep(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Run `iterations` candidates with a non-deterministic generator.
    pub fn optimize(&mut self, iterations: usize) {
        self.optimize_with(iterations, &mut rand::thread_rng());
    }

    /// Run `iterations` candidates against an injected random source, so
    /// seeded runs reproduce exactly.
    pub fn optimize_with<R: Rng + ?Sized>(&mut self, iterations: usize, rng: &mut R) {
        for iteration in 0..iterations {
            let (rocket, guidance) = self.sample(rng);

            match self.evaluate(&rocket, &guidance) {
                Ok(score) => {
                    if self.best.map_or(true, |b| score < b.score) {
                        info!(iteration, score, "new best configuration");
                        self.best = Some(BestConfig { rocket, guidance, score });
                    } else {
                        debug!(iteration, score, "candidate discarded");
                    }
                }
                // Structurally invalid candidate (e.g. turn start at or
                // above target altitude with tight ranges): skip it.
                Err(err) => debug!(iteration, %err, "candidate rejected"),
            }
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (RocketParams, GuidanceParams) {
        let rocket = RocketParams {
            dry_mass: SearchRanges::draw(self.ranges.dry_mass, rng),
            fuel_mass: SearchRanges::draw(self.ranges.fuel_mass, rng),
            burn_rate: SearchRanges::draw(self.ranges.burn_rate, rng),
            specific_impulse: SearchRanges::draw(self.ranges.specific_impulse, rng),
            cross_section_area: CROSS_SECTION_AREA,
            drag_coefficient: DRAG_COEFFICIENT,
        };
        let guidance = GuidanceParams {
            target_altitude: 0.6 * (self.destination.norm() - EARTH_RADIUS),
            turn_start_altitude: SearchRanges::draw(self.ranges.turn_start_altitude, rng),
            turn_rate: SearchRanges::draw(self.ranges.turn_rate, rng),
            max_angular_velocity: MAX_ANGULAR_VELOCITY,
        };
        (rocket, guidance)
    }

    /// Run one candidate to completion and score it.
    fn evaluate(&self, rocket: &RocketParams, guidance: &GuidanceParams) -> Result<f64, SimError> {
        let mut trial = self.build(rocket, guidance)?;
        trial.run(self.dt);

        let miss = trial.miss_distance();
        let fuel_left = trial.rocket().fuel_mass();
        Ok(miss + FUEL_WEIGHT * fuel_left)
    }

    fn build(&self, rocket: &RocketParams, guidance: &GuidanceParams) -> Result<Trial<'a>, SimError> {
        let rocket = Rocket::new(
            rocket.dry_mass,
            rocket.fuel_mass,
            rocket.burn_rate,
            rocket.specific_impulse,
            rocket.cross_section_area,
            rocket.drag_coefficient,
        )?;
        let controller = GravityTurnGuidance::new(
            guidance.target_altitude,
            self.destination,
            *self.environment,
            guidance.turn_start_altitude,
            guidance.turn_rate,
            guidance.max_angular_velocity,
        )?;
        Ok(Trial::new(
            rocket,
            self.environment,
            self.destination,
            Some(Box::new(controller)),
        ))
    }

    pub fn best(&self) -> Option<&BestConfig> {
        self.best.as_ref()
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best.map(|b| b.score)
    }

    pub fn destination(&self) -> Vector3<f64> {
        self.destination
    }

    /// Construct a fresh runnable trial from the best-known configuration.
    /// The parameters were validated when the candidate was accepted.
    pub fn build_best(&self) -> Option<Trial<'a>> {
        let best = self.best?;
        self.build(&best.rocket, &best.guidance).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
