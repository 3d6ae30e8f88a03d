use std::io::{self, Write};
use std::path::Path;

use crate::sim::TelemetrySample;

/// Write trajectory telemetry to CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          thrust_x, thrust_y, thrust_z, fuel_mass, thrust_level, total_mass
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[TelemetrySample]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         thrust_x,thrust_y,thrust_z,fuel_mass,thrust_level,total_mass"
    )?;

    for s in trajectory {
        let st = &s.state;
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},\
             {:.6},{:.6},{:.6},{:.4},{:.4},{:.4}",
            s.time,
            st.position.x,
            st.position.y,
            st.position.z,
            st.velocity.x,
            st.velocity.y,
            st.velocity.z,
            st.thrust_direction.x,
            st.thrust_direction.y,
            st.thrust_direction.z,
            st.fuel_mass,
            st.thrust_level,
            st.total_mass,
        )?;
    }

    Ok(())
}

/// Write trajectory telemetry to a CSV file at the given path.
pub fn write_trajectory_file(path: &Path, trajectory: &[TelemetrySample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}
