use nalgebra::Vector3;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Attitude commands
// ---------------------------------------------------------------------------

/// Frame a direction target is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFrame {
    /// Maneuver frame of a node: +Y along the node's burn vector.
    Maneuver(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttitudeTarget {
    /// Pitch above the horizon and compass heading, both in degrees.
    PitchHeading { pitch: f64, heading: f64 },
    Direction { frame: ReferenceFrame, direction: Vector3<f64> },
}

impl AttitudeTarget {
    /// Point along the burn vector of `node`.
    pub fn along_node(node: &NodeHandle) -> Self {
        AttitudeTarget::Direction {
            frame: node.reference_frame(),
            direction: Vector3::y(),
        }
    }
}

// ---------------------------------------------------------------------------
// Maneuver node handle
// ---------------------------------------------------------------------------

/// A planned maneuver living on the host.
///
/// Deliberately neither `Clone` nor `Copy`:
/// [`VehicleActuation::remove_maneuver_node`] consumes the handle, so a node
/// can be removed at most once.
#[derive(Debug, PartialEq)]
pub struct NodeHandle {
    id: u32,
    ut: f64,
    delta_v: f64,
}

impl NodeHandle {
    pub fn new(id: u32, ut: f64, delta_v: f64) -> Self {
        Self { id, ut, delta_v }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Universal time of execution, s.
    pub fn ut(&self) -> f64 {
        self.ut
    }

    /// Planned prograde delta-v, m/s.
    pub fn delta_v(&self) -> f64 {
        self.delta_v
    }

    pub fn reference_frame(&self) -> ReferenceFrame {
        ReferenceFrame::Maneuver(self.id)
    }
}

// ---------------------------------------------------------------------------
// Vehicle actuation
// ---------------------------------------------------------------------------

/// Commands sent to the vehicle. Failures are reported as
/// [`GuidanceError::Actuation`](crate::error::GuidanceError::Actuation).
pub trait VehicleActuation {
    /// Throttle in [0, 1]. Callers clamp before commanding.
    fn set_throttle(&mut self, throttle: f64) -> Result<()>;

    fn engage_autopilot(&mut self) -> Result<()>;

    fn disengage_autopilot(&mut self) -> Result<()>;

    fn set_attitude_target(&mut self, target: AttitudeTarget) -> Result<()>;

    fn activate_next_stage(&mut self) -> Result<()>;

    fn set_reaction_control(&mut self, enabled: bool) -> Result<()>;

    fn add_maneuver_node(&mut self, ut: f64, prograde: f64) -> Result<NodeHandle>;

    /// Delta-v still to be delivered for `node`, m/s.
    fn remaining_delta_v(&self, node: &NodeHandle) -> Result<f64>;

    fn remove_maneuver_node(&mut self, node: NodeHandle) -> Result<()>;
}
