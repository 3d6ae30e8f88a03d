use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{ARRIVAL_TOLERANCE, EARTH_RADIUS, TIME_STEP};
use crate::error::SimError;
use crate::search::SearchRanges;

/// Run configuration, loadable from a YAML file. Every field has a default,
/// so a scenario file only needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    /// Rendezvous point in planet-centered coordinates, m.
    pub destination: [f64; 3],
    /// Integration timestep, s.
    pub dt: f64,
    /// Arrival tolerance, m.
    pub tolerance: f64,
    /// Parameter-search iterations.
    pub iterations: usize,
    /// Seed for the search; random when absent.
    pub seed: Option<u64>,
    pub ranges: SearchRanges,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "rendezvous".into(),
            destination: [90_000.0, EARTH_RADIUS + 100_000.0, 40_000.0],
            dt: TIME_STEP,
            tolerance: ARRIVAL_TOLERANCE,
            iterations: 100,
            seed: None,
            ranges: SearchRanges::default(),
        }
    }
}

impl Scenario {
    /// Load and validate a scenario from a YAML file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::ScenarioIo {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario: Scenario =
            serde_yaml::from_str(&text).map_err(|source| SimError::ScenarioParse {
                path: path.to_path_buf(),
                source,
            })?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.dt <= 0.0 {
            return Err(SimError::InvalidScenario(format!(
                "timestep must be positive, got {}",
                self.dt
            )));
        }
        if self.tolerance <= 0.0 {
            return Err(SimError::InvalidScenario(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.iterations == 0 {
            return Err(SimError::InvalidScenario("iterations must be at least 1".into()));
        }
        let altitude = self.destination_vector().norm() - EARTH_RADIUS;
        if altitude <= 0.0 {
            return Err(SimError::InvalidScenario(format!(
                "destination must lie above the surface, altitude {altitude}"
            )));
        }
        Ok(())
    }

    pub fn destination_vector(&self) -> Vector3<f64> {
        Vector3::new(self.destination[0], self.destination[1], self.destination[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_is_valid() {
        assert!(Scenario::default().validate().is_ok());
    }

    #[test]
    fn rejects_destination_below_surface() {
        let scenario = Scenario {
            destination: [0.0, EARTH_RADIUS - 100.0, 0.0],
            ..Scenario::default()
        };
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn rejects_zero_iterations() {
        let scenario = Scenario {
            iterations: 0,
            ..Scenario::default()
        };
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let scenario: Scenario = serde_yaml::from_str("iterations: 25\n").unwrap();
        assert_eq!(scenario.iterations, 25);
        assert_eq!(scenario.dt, TIME_STEP);
        assert_eq!(scenario.tolerance, ARRIVAL_TOLERANCE);
        assert_eq!(scenario.destination[0], 90_000.0);
    }

    #[test]
    fn ranges_override_from_yaml() {
        let yaml = "ranges:\n  burn_rate: [100.0, 200.0]\n";
        let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.ranges.burn_rate, [100.0, 200.0]);
        // Untouched ranges keep their defaults.
        assert_eq!(scenario.ranges.dry_mass, SearchRanges::default().dry_mass);
    }
}
