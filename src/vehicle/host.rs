use std::time::{Duration, Instant};

use super::actuation::VehicleActuation;
use super::telemetry::TelemetrySource;
use crate::error::Result;

/// Time reference and pacing for control loops.
pub trait Clock {
    /// Seconds since an arbitrary, fixed epoch.
    fn now(&self) -> f64;

    /// Suspend for one polling period. Simulated hosts advance their
    /// physics here and may fail.
    fn sleep(&mut self, period: Duration) -> Result<()>;
}

/// Wall-clock pacing for a host that advances on its own.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn sleep(&mut self, period: Duration) -> Result<()> {
        std::thread::sleep(period);
        Ok(())
    }
}

/// Everything the ascent orchestrator needs from the simulation host.
pub trait FlightHost: TelemetrySource + VehicleActuation + Clock {}

impl<T: TelemetrySource + VehicleActuation + Clock> FlightHost for T {}
