pub mod burn;
pub mod elements;
pub mod maneuvers;

pub use burn::{burn_time, BurnExecutor, BurnSummary};
pub use elements::KeplerianElements;
pub use maneuvers::{circularization_delta_v, plan_circularization, ManeuverPlan};
