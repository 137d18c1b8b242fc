use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::sim::event::{AscentReport, PhaseRecord};
use crate::vehicle::Launcher;

#[derive(Debug, Clone, Serialize)]
pub struct LauncherInfo {
    pub name: String,
    pub stages: usize,
    pub wet_mass_kg: f64,
}

/// Orbit at the end of the flight, altitudes above the surface.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FinalOrbit {
    pub apoapsis_m: f64,
    pub periapsis_m: f64,
}

/// Flight outcome written alongside the CSV log.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    pub launcher: LauncherInfo,
    pub phases: Vec<PhaseRecord>,
    pub stage_separations: usize,
    pub planned_delta_v_ms: f64,
    pub burn_time_s: f64,
    pub max_dynamic_pressure_pa: f64,
    pub flight_time_s: f64,
    pub final_orbit: FinalOrbit,
}

impl FlightSummary {
    pub fn new(launcher: &Launcher, report: &AscentReport, final_orbit: FinalOrbit) -> Self {
        let start = report.transitions.first().map_or(0.0, |t| t.time);
        let end = report.transitions.last().map_or(start, |t| t.time);
        FlightSummary {
            launcher: LauncherInfo {
                name: launcher.name.clone(),
                stages: launcher.stages.len(),
                wet_mass_kg: launcher.total_mass(),
            },
            phases: report.transitions.clone(),
            stage_separations: report.stage_separations,
            planned_delta_v_ms: report.planned_delta_v,
            burn_time_s: report.burn_time,
            max_dynamic_pressure_pa: report.log.max_dynamic_pressure(),
            flight_time_s: end - start,
            final_orbit,
        }
    }
}

/// Write the flight summary as pretty-printed JSON.
pub fn write_summary<W: Write>(writer: W, summary: &FlightSummary) -> Result<()> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

pub fn write_summary_file(path: impl AsRef<Path>, summary: &FlightSummary) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_summary(file, summary)
}
