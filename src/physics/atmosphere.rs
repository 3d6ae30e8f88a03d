use crate::constants::{SCALE_HEIGHT, SEA_LEVEL_AIR_DENSITY};

/// Exponential atmosphere: rho = rho0 * exp(-h / H).
/// Negative altitudes clamp to sea level.
pub fn density(altitude: f64) -> f64 {
    SEA_LEVEL_AIR_DENSITY * (-altitude.max(0.0) / SCALE_HEIGHT).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sea_level_density() {
        assert_relative_eq!(density(0.0), 1.225, epsilon = 1e-9);
    }

    #[test]
    fn density_decays_with_altitude() {
        let rho_0 = density(0.0);
        let rho_10k = density(10_000.0);
        let rho_50k = density(50_000.0);
        assert!(rho_0 > rho_10k && rho_10k > rho_50k);
        assert!(rho_50k > 0.0, "Density never reaches exact zero");
    }

    #[test]
    fn one_scale_height_drops_to_1_over_e() {
        assert_relative_eq!(
            density(SCALE_HEIGHT),
            SEA_LEVEL_AIR_DENSITY / std::f64::consts::E,
            epsilon = 1e-9
        );
    }

    #[test]
    fn negative_altitude_clamps_to_sea_level() {
        assert_relative_eq!(density(-300.0), density(0.0), epsilon = 1e-12);
    }
}
