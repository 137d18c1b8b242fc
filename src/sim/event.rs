use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::vehicle::TelemetrySource;

// ---------------------------------------------------------------------------
// Ascent phases
// ---------------------------------------------------------------------------

/// Phases of the ascent, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AscentPhase {
    Countdown,
    Liftoff,
    GravityTurn,
    ApoapsisReached,
    Coasting,
    Circularizing,
    Executing,
    Complete,
}

impl AscentPhase {
    pub const ALL: [AscentPhase; 8] = [
        Self::Countdown,
        Self::Liftoff,
        Self::GravityTurn,
        Self::ApoapsisReached,
        Self::Coasting,
        Self::Circularizing,
        Self::Executing,
        Self::Complete,
    ];

    /// Successor phase; `Complete` is terminal.
    pub fn next(self) -> Option<AscentPhase> {
        match self {
            Self::Countdown => Some(Self::Liftoff),
            Self::Liftoff => Some(Self::GravityTurn),
            Self::GravityTurn => Some(Self::ApoapsisReached),
            Self::ApoapsisReached => Some(Self::Coasting),
            Self::Coasting => Some(Self::Circularizing),
            Self::Circularizing => Some(Self::Executing),
            Self::Executing => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Countdown => "countdown",
            Self::Liftoff => "liftoff",
            Self::GravityTurn => "gravity turn",
            Self::ApoapsisReached => "apoapsis reached",
            Self::Coasting => "coasting",
            Self::Circularizing => "circularizing",
            Self::Executing => "executing",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for AscentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Entry into a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseRecord {
    pub phase: AscentPhase,
    pub time: f64, // universal time, s
    pub altitude: f64,
}

// ---------------------------------------------------------------------------
// Per-tick flight log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightSample {
    pub time: f64,
    pub phase: AscentPhase,
    pub altitude: f64,
    pub apoapsis_altitude: f64,
    pub dynamic_pressure: f64,
    pub throttle: f64,      // commanded
    pub pitch: Option<f64>, // commanded, deg
}

#[derive(Debug, Clone, Default)]
pub struct FlightLog {
    pub samples: Vec<FlightSample>,
}

impl FlightLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the vehicle alongside the commands issued this tick.
    pub fn record<T: TelemetrySource + ?Sized>(
        &mut self,
        vessel: &T,
        phase: AscentPhase,
        throttle: f64,
        pitch: Option<f64>,
    ) -> Result<()> {
        self.samples.push(FlightSample {
            time: vessel.universal_time()?,
            phase,
            altitude: vessel.altitude()?,
            apoapsis_altitude: vessel.apoapsis_altitude()?,
            dynamic_pressure: vessel.dynamic_pressure()?,
            throttle,
            pitch,
        });
        Ok(())
    }

    pub fn in_phase(&self, phase: AscentPhase) -> impl Iterator<Item = &FlightSample> {
        self.samples.iter().filter(move |s| s.phase == phase)
    }

    pub fn max_dynamic_pressure(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.dynamic_pressure)
            .fold(0.0_f64, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Ascent outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct AscentReport {
    pub transitions: Vec<PhaseRecord>,
    pub stage_separations: usize,
    pub planned_delta_v: f64,
    pub burn_time: f64,
    #[serde(skip)]
    pub log: FlightLog,
}

impl AscentReport {
    pub fn phases(&self) -> Vec<AscentPhase> {
        self.transitions.iter().map(|t| t.phase).collect()
    }
}
