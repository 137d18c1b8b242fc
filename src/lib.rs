pub mod config;
pub mod error;
pub mod gnc;
pub mod io;
pub mod orbital;
pub mod physics;
pub mod sim;
pub mod vehicle;

pub use config::GuidanceConfig;
pub use error::{GuidanceError, Result};
pub use sim::{fly, AscentGuidance, AscentPhase, AscentReport};
