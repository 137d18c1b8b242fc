pub mod actuation;
pub mod host;
pub mod launcher;
pub mod stage;
pub mod status;
pub mod telemetry;

pub use actuation::{AttitudeTarget, NodeHandle, ReferenceFrame, VehicleActuation};
pub use host::{Clock, FlightHost, SystemClock};
pub use launcher::{presets, Launcher, LauncherBuilder};
pub use stage::{Stage, StageBuilder};
pub use status::{StatusSink, TracingStatus};
pub use telemetry::{ResourceAmount, ResourceKind, StageResources, TelemetrySource};
