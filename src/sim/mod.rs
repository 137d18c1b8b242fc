pub mod event;
pub mod runner;
pub mod vessel;

#[cfg(test)]
pub(crate) mod scripted;

pub use event::{AscentPhase, AscentReport, FlightLog, FlightSample, PhaseRecord};
pub use runner::{fly, AscentGuidance};
pub use vessel::SimulatedVessel;
