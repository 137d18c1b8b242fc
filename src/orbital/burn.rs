use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::BurnTuning;
use crate::error::{GuidanceError, Result};
use crate::gnc::staging::maybe_stage;
use crate::physics::G0;
use crate::sim::event::{AscentPhase, FlightLog};
use crate::vehicle::{AttitudeTarget, FlightHost, NodeHandle, StatusSink};

// ---------------------------------------------------------------------------
// Burn time: Tsiolkovsky rocket equation at constant thrust and Isp
// ---------------------------------------------------------------------------

/// Seconds at full thrust needed to deliver `delta_v` (m/s).
///
/// `isp` in seconds, `thrust` in N, `mass` the initial mass in kg.
pub fn burn_time(delta_v: f64, isp: f64, thrust: f64, mass: f64) -> Result<f64> {
    if !(thrust > 0.0 && thrust.is_finite()) {
        return Err(GuidanceError::NoThrust);
    }
    if !(isp > 0.0 && isp.is_finite()) {
        return Err(GuidanceError::InvalidPropulsion(format!("specific impulse {isp} s")));
    }
    if !(mass > 0.0 && mass.is_finite()) {
        return Err(GuidanceError::InvalidPropulsion(format!("vehicle mass {mass} kg")));
    }
    if !(delta_v >= 0.0 && delta_v.is_finite()) {
        return Err(GuidanceError::InvalidPropulsion(format!("delta-v {delta_v} m/s")));
    }

    let exhaust_velocity = isp * G0;
    let final_mass = mass * (-delta_v / exhaust_velocity).exp();
    let flow_rate = thrust / exhaust_velocity;
    Ok((mass - final_mass) / flow_rate)
}

// ---------------------------------------------------------------------------
// Burn executor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnSummary {
    pub burn_time: f64,
    pub stage_separations: usize,
    /// The node was within the fine threshold and removed unburned.
    pub skipped: bool,
}

/// Flies a maneuver node: orient, wait for the burn window, burn with a
/// two-step throttle taper, then clean up.
#[derive(Debug, Clone)]
pub struct BurnExecutor {
    pub tuning: BurnTuning,
    pub tick: Duration,
}

impl BurnExecutor {
    pub fn new(tuning: BurnTuning, tick: Duration) -> Self {
        Self { tuning, tick }
    }

    /// Execute `node` and remove it.
    ///
    /// The node is removed and throttle cut even when the burn fails; the
    /// burn's error is returned in that case.
    pub fn execute<H, S>(
        &self,
        vessel: &mut H,
        node: NodeHandle,
        log: &mut FlightLog,
        status: &mut S,
    ) -> Result<BurnSummary>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        let outcome = self.fly(vessel, &node, log, status);
        let cleanup = finish(vessel, node);
        match (outcome, cleanup) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Err(cleanup_err)) => {
                warn!(%cleanup_err, "node cleanup failed after burn error");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
        }
    }

    fn fly<H, S>(
        &self,
        vessel: &mut H,
        node: &NodeHandle,
        log: &mut FlightLog,
        status: &mut S,
    ) -> Result<BurnSummary>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        let mut summary = BurnSummary { burn_time: 0.0, stage_separations: 0, skipped: false };

        if node.delta_v() <= self.tuning.fine_threshold {
            info!(delta_v = node.delta_v(), "node below cutoff, nothing to burn");
            status.write("Orbit already circular");
            summary.skipped = true;
            return Ok(summary);
        }

        summary.burn_time = burn_time(
            node.delta_v(),
            vessel.specific_impulse()?,
            vessel.available_thrust()?,
            vessel.vehicle_mass()?,
        )?;
        info!(burn_time = summary.burn_time, delta_v = node.delta_v(), "burn planned");

        // Orient
        vessel.set_reaction_control(true)?;
        vessel.set_attitude_target(AttitudeTarget::along_node(node))?;
        while vessel.attitude_error()? > self.tuning.pointing_tolerance_deg {
            log.record(vessel, AscentPhase::Executing, 0.0, None)?;
            vessel.sleep(self.tick)?;
        }

        // Center the burn on the node
        status.write("Waiting until circularization burn");
        let half_burn = 0.5 * summary.burn_time;
        while vessel.time_to_apoapsis()? - half_burn > 0.0 {
            if maybe_stage(vessel, status)? {
                summary.stage_separations += 1;
            }
            log.record(vessel, AscentPhase::Executing, 0.0, None)?;
            vessel.sleep(self.tick)?;
        }

        status.write("Executing node");
        vessel.set_throttle(1.0)?;
        self.burn_down_to(vessel, node, self.tuning.coarse_threshold, 1.0, log, status, &mut summary)?;

        vessel.set_throttle(self.tuning.trim_throttle)?;
        self.burn_down_to(
            vessel,
            node,
            self.tuning.fine_threshold,
            self.tuning.trim_throttle,
            log,
            status,
            &mut summary,
        )?;

        Ok(summary)
    }

    /// Hold `throttle` until the node's remaining delta-v drops to `threshold`.
    #[allow(clippy::too_many_arguments)]
    fn burn_down_to<H, S>(
        &self,
        vessel: &mut H,
        node: &NodeHandle,
        threshold: f64,
        throttle: f64,
        log: &mut FlightLog,
        status: &mut S,
        summary: &mut BurnSummary,
    ) -> Result<()>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        loop {
            let remaining = vessel.remaining_delta_v(node)?;
            if remaining <= threshold {
                return Ok(());
            }
            debug!(remaining, throttle, "burning");
            if maybe_stage(vessel, status)? {
                summary.stage_separations += 1;
            }
            log.record(vessel, AscentPhase::Executing, throttle, None)?;
            vessel.sleep(self.tick)?;
        }
    }
}

/// Cut throttle, remove the node and release RCS, attempting every step.
fn finish<H: FlightHost + ?Sized>(vessel: &mut H, node: NodeHandle) -> Result<()> {
    let throttle = vessel.set_throttle(0.0);
    let removed = vessel.remove_maneuver_node(node);
    let rcs = vessel.set_reaction_control(false);
    throttle.and(removed).and(rcs)
}
