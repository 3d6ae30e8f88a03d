use nalgebra::Vector3;

use crate::constants::EARTH_RADIUS;
use crate::sim::TelemetrySample;

/// Summary statistics computed from recorded flight telemetry.
#[derive(Debug, Clone)]
pub struct FlightSummary {
    pub peak_altitude: f64,
    pub max_speed: f64,
    pub flight_time: f64,
    pub fuel_consumed: f64,
    pub final_miss_distance: f64,
}

impl FlightSummary {
    /// Compute a summary from telemetry. Returns `None` for an empty record.
    pub fn from_trajectory(
        trajectory: &[TelemetrySample],
        destination: &Vector3<f64>,
    ) -> Option<Self> {
        let first = trajectory.first()?;
        let last = trajectory.last()?;

        let peak_altitude = trajectory
            .iter()
            .map(|s| s.state.position.norm() - EARTH_RADIUS)
            .fold(f64::NEG_INFINITY, f64::max);

        let max_speed = trajectory
            .iter()
            .map(|s| s.state.velocity.norm())
            .fold(0.0_f64, f64::max);

        Some(Self {
            peak_altitude,
            max_speed,
            flight_time: last.time,
            fuel_consumed: first.state.fuel_mass - last.state.fuel_mass,
            final_miss_distance: (last.state.position - destination).norm(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::RocketSnapshot;
    use approx::assert_relative_eq;

    fn sample(time: f64, altitude: f64, speed: f64, fuel: f64) -> TelemetrySample {
        TelemetrySample {
            time,
            state: RocketSnapshot {
                position: Vector3::new(0.0, EARTH_RADIUS + altitude, 0.0),
                velocity: Vector3::new(0.0, speed, 0.0),
                thrust_direction: Vector3::new(0.0, 1.0, 0.0),
                fuel_mass: fuel,
                thrust_level: 1.0,
                total_mass: 5_000.0 + fuel,
            },
        }
    }

    #[test]
    fn empty_trajectory_has_no_summary() {
        let dest = Vector3::new(0.0, EARTH_RADIUS, 0.0);
        assert!(FlightSummary::from_trajectory(&[], &dest).is_none());
    }

    #[test]
    fn summary_reports_peaks_and_consumption() {
        let traj = vec![
            sample(0.0, 0.0, 0.0, 50_000.0),
            sample(10.0, 12_000.0, 800.0, 48_000.0),
            sample(20.0, 9_000.0, 400.0, 47_500.0),
        ];
        let dest = Vector3::new(0.0, EARTH_RADIUS + 10_000.0, 0.0);
        let summary = FlightSummary::from_trajectory(&traj, &dest).unwrap();

        assert_relative_eq!(summary.peak_altitude, 12_000.0, epsilon = 1e-9);
        assert_relative_eq!(summary.max_speed, 800.0, epsilon = 1e-9);
        assert_relative_eq!(summary.flight_time, 20.0, epsilon = 1e-9);
        assert_relative_eq!(summary.fuel_consumed, 2_500.0, epsilon = 1e-9);
        assert_relative_eq!(summary.final_miss_distance, 1_000.0, epsilon = 1e-9);
    }
}
