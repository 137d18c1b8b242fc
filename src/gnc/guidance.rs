use crate::config::LaunchParameters;
use crate::error::Result;
use crate::vehicle::{AttitudeTarget, VehicleActuation};

// ---------------------------------------------------------------------------
// Gravity turn: pitch program over an altitude band
// ---------------------------------------------------------------------------

/// Linear pitch-over from vertical at `start` to horizontal at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityTurn {
    pub start: f64,   // m
    pub end: f64,     // m
    pub heading: f64, // deg
}

impl GravityTurn {
    pub fn new(params: &LaunchParameters, heading: f64) -> Self {
        Self {
            start: params.turn_start_altitude,
            end: params.turn_end_altitude,
            heading,
        }
    }

    /// Fraction of the band covered at `altitude`, clamped to [0, 1].
    pub fn progress(&self, altitude: f64) -> f64 {
        ((altitude - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }

    /// Desired pitch above the horizon (deg): 90 at the band start, 0 at its end.
    pub fn target_pitch(&self, altitude: f64) -> f64 {
        90.0 - self.progress(altitude) * 90.0
    }

    /// Command the autopilot for the current altitude. Does not wait for
    /// the vehicle to converge. Returns the commanded pitch.
    pub fn steer<V: VehicleActuation + ?Sized>(&self, vessel: &mut V, altitude: f64) -> Result<f64> {
        let pitch = self.target_pitch(altitude);
        vessel.set_attitude_target(AttitudeTarget::PitchHeading {
            pitch,
            heading: self.heading,
        })?;
        Ok(pitch)
    }
}
