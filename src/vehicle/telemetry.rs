use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Stage resource inventory
// ---------------------------------------------------------------------------

/// Propellant and consumable kinds a stage can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    LiquidFuel,
    Oxidizer,
    SolidFuel,
    MonoPropellant,
    ElectricCharge,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LiquidFuel => "LiquidFuel",
            Self::Oxidizer => "Oxidizer",
            Self::SolidFuel => "SolidFuel",
            Self::MonoPropellant => "MonoPropellant",
            Self::ElectricCharge => "ElectricCharge",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceAmount {
    pub amount: f64,
    pub capacity: f64,
}

impl ResourceAmount {
    pub fn new(amount: f64, capacity: f64) -> Self {
        Self { amount, capacity }
    }
}

/// Resources held by the parts that one separation event drops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageResources {
    resources: HashMap<ResourceKind, ResourceAmount>,
}

impl StageResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ResourceKind, amount: f64, capacity: f64) -> Self {
        self.insert(kind, ResourceAmount::new(amount, capacity));
        self
    }

    pub fn insert(&mut self, kind: ResourceKind, value: ResourceAmount) {
        self.resources.insert(kind, value);
    }

    pub fn has_resource(&self, kind: ResourceKind) -> bool {
        self.resources.contains_key(&kind)
    }

    pub fn amount(&self, kind: ResourceKind) -> f64 {
        self.resources.get(&kind).map_or(0.0, |r| r.amount)
    }

    pub fn capacity(&self, kind: ResourceKind) -> f64 {
        self.resources.get(&kind).map_or(0.0, |r| r.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Telemetry source
// ---------------------------------------------------------------------------

/// Live readings from the simulation host.
///
/// Every call reads the current value; callers must not cache results
/// across control ticks. Implementations report host failures as
/// [`GuidanceError::Telemetry`](crate::error::GuidanceError::Telemetry).
pub trait TelemetrySource {
    /// Universal time, s.
    fn universal_time(&self) -> Result<f64>;

    /// Mean altitude above the reference body's surface, m.
    fn altitude(&self) -> Result<f64>;

    fn apoapsis_altitude(&self) -> Result<f64>;

    /// Speed relative to the body's surface, m/s.
    fn surface_speed(&self) -> Result<f64>;

    /// Dynamic pressure, Pa.
    fn dynamic_pressure(&self) -> Result<f64>;

    fn time_to_apoapsis(&self) -> Result<f64>;

    /// Non-cumulative inventory of the parts decoupled by stage `stage`.
    fn stage_resources(&self, stage: usize) -> Result<StageResources>;

    /// Index of the current stage; 0 is the final stage.
    fn current_stage(&self) -> Result<usize>;

    fn vehicle_mass(&self) -> Result<f64>;

    /// Thrust of the active engines at full throttle, N.
    fn available_thrust(&self) -> Result<f64>;

    /// Vacuum specific impulse of the active engines, s.
    fn specific_impulse(&self) -> Result<f64>;

    /// Gravitational parameter of the orbited body, m^3/s^2.
    fn gravitational_parameter(&self) -> Result<f64>;

    fn semi_major_axis(&self) -> Result<f64>;

    /// Apoapsis measured from the body's center, m.
    fn apoapsis_radius(&self) -> Result<f64>;

    /// Angle between the vehicle's pointing and the autopilot target, deg.
    fn attitude_error(&self) -> Result<f64>;
}
