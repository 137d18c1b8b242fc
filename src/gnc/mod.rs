pub mod guidance;
pub mod pid;
pub mod staging;

pub use guidance::GravityTurn;
pub use pid::Pid;
pub use staging::{maybe_stage, should_stage};
