use tracing::info;

use crate::error::Result;
use crate::vehicle::{ResourceKind, StageResources, StatusSink, TelemetrySource, VehicleActuation};

/// Fuel kinds whose exhaustion triggers separation.
pub const TRACKED_FUELS: [ResourceKind; 2] = [ResourceKind::LiquidFuel, ResourceKind::SolidFuel];

/// Whether the stage holding `resources` should be dropped now.
///
/// True when a tracked fuel has capacity but nothing left, or when the
/// stage carries no tracked fuel at all (decoupler or interstage).
pub fn should_stage(resources: &StageResources) -> bool {
    let mut carries_fuel = false;
    for fuel in TRACKED_FUELS {
        if resources.capacity(fuel) > 0.0 && resources.amount(fuel) == 0.0 {
            return true;
        }
        if resources.has_resource(fuel) {
            carries_fuel = true;
        }
    }
    !carries_fuel
}

/// Inspect the stage the next separation would drop and fire it if spent.
///
/// No-op on the final stage. Returns whether a separation was triggered.
pub fn maybe_stage<V, S>(vessel: &mut V, status: &mut S) -> Result<bool>
where
    V: TelemetrySource + VehicleActuation + ?Sized,
    S: StatusSink + ?Sized,
{
    let stage = vessel.current_stage()?;
    if stage == 0 {
        return Ok(false);
    }
    let resources = vessel.stage_resources(stage - 1)?;
    if !should_stage(&resources) {
        return Ok(false);
    }
    vessel.activate_next_stage()?;
    info!(from = stage, "stage separation");
    status.write("Stage separation");
    Ok(true)
}
