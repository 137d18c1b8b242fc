//! Error types for ascent guidance

use thiserror::Error;

use crate::sim::event::AscentPhase;

/// Result type for guidance operations
pub type Result<T> = std::result::Result<T, GuidanceError>;

/// Errors that can stop or prevent an ascent
#[derive(Error, Debug)]
pub enum GuidanceError {
    #[error("invalid launch parameters: {0}")]
    InvalidConfig(String),

    #[error("no thrust available for burn")]
    NoThrust,

    #[error("invalid propulsion state: {0}")]
    InvalidPropulsion(String),

    #[error("degenerate orbit: {0}")]
    DegenerateOrbit(String),

    #[error("telemetry source failure: {0}")]
    Telemetry(String),

    #[error("vehicle actuation failure: {0}")]
    Actuation(String),

    #[error("ascent aborted during {phase}: {source}")]
    Aborted {
        phase: AscentPhase,
        #[source]
        source: Box<GuidanceError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
