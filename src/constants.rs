// ---------------------------------------------------------------------------
// Physical constants (SI units)
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.81; // standard gravity, m/s^2 (exhaust-velocity constant)
pub const BIG_G: f64 = 6.674_30e-11; // gravitational constant, m^3/(kg*s^2)
pub const EARTH_RADIUS: f64 = 6.371e6; // mean radius, m
pub const EARTH_MASS: f64 = 5.972e24; // kg

pub const SEA_LEVEL_AIR_DENSITY: f64 = 1.225; // kg/m^3
pub const SCALE_HEIGHT: f64 = 8.5e3; // exponential atmosphere scale height, m

// ---------------------------------------------------------------------------
// Simulation defaults
// ---------------------------------------------------------------------------

pub const TIME_STEP: f64 = 0.01; // integration timestep, s (100 Hz)
pub const MAX_SIM_TIME: f64 = 3600.0; // hard stop, s
pub const ARRIVAL_TOLERANCE: f64 = 1500.0; // rendezvous tolerance, m

// ---------------------------------------------------------------------------
// Display scaling
// ---------------------------------------------------------------------------
// Visualization consumers render the planet as a sphere of
// VISUAL_EARTH_RADIUS scene units; physical positions multiply by
// PHYSICS_TO_VISUAL_SCALE on the way out and by the inverse on the way in.

pub const VISUAL_EARTH_RADIUS: f64 = 7.0;
pub const PHYSICS_TO_VISUAL_SCALE: f64 = VISUAL_EARTH_RADIUS / EARTH_RADIUS;
pub const VISUAL_TO_PHYSICS_SCALE: f64 = EARTH_RADIUS / VISUAL_EARTH_RADIUS;
