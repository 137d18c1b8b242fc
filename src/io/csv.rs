use std::io::{self, Write};
use std::path::Path;

use crate::sim::event::FlightLog;

/// Write the per-tick flight log in CSV format.
///
/// Columns: time, phase, altitude, apoapsis_altitude, dynamic_pressure,
///          throttle, pitch_deg (empty when no pitch was commanded)
pub fn write_flight_log<W: Write>(writer: &mut W, log: &FlightLog) -> io::Result<()> {
    writeln!(
        writer,
        "time,phase,altitude,apoapsis_altitude,dynamic_pressure,throttle,pitch_deg"
    )?;

    for s in &log.samples {
        let pitch = s.pitch.map(|p| format!("{p:.2}")).unwrap_or_default();
        writeln!(
            writer,
            "{:.2},{},{:.1},{:.1},{:.1},{:.4},{}",
            s.time,
            s.phase.label(),
            s.altitude,
            s.apoapsis_altitude,
            s.dynamic_pressure,
            s.throttle,
            pitch,
        )?;
    }

    Ok(())
}

/// Write the flight log to a CSV file at the given path.
pub fn write_flight_log_file(path: impl AsRef<Path>, log: &FlightLog) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_flight_log(&mut file, log)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::event::{AscentPhase, FlightSample};

    #[test]
    fn csv_output_has_header_and_rows() {
        let sample = |time, phase, pitch| FlightSample {
            time,
            phase,
            altitude: 1_000.0,
            apoapsis_altitude: 1_200.0,
            dynamic_pressure: 8_000.0,
            throttle: 0.75,
            pitch,
        };
        let log = FlightLog {
            samples: vec![
                sample(10.0, AscentPhase::GravityTurn, Some(88.5)),
                sample(80.0, AscentPhase::Coasting, None),
            ],
        };

        let mut buf = Vec::new();
        write_flight_log(&mut buf, &log).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,phase,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert_eq!(lines[1], "10.00,gravity turn,1000.0,1200.0,8000.0,0.7500,88.50");
        assert!(lines[2].ends_with(",0.7500,"));
    }
}
