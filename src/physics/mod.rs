pub mod aerodynamics;
pub mod atmosphere;
pub mod gravity;

pub use atmosphere::{Atmo, Atmosphere};
pub use gravity::{Body, G0};
