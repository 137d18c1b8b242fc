//! Deterministic host whose readings are closed-form functions of time.

use std::f64::consts::PI;
use std::time::Duration;

use crate::error::{GuidanceError, Result};
use crate::vehicle::{
    AttitudeTarget, Clock, NodeHandle, ResourceKind, StageResources, TelemetrySource,
    VehicleActuation,
};

/// Climbs at a constant rate after the first stage activation, with a
/// dynamic-pressure hump peaking mid-atmosphere.
pub struct ScriptedVessel {
    pub t: f64,
    pub launch_time: Option<f64>,
    pub climb_rate: f64,   // m/s
    pub ceiling: f64,      // m
    pub q_peak: f64,       // Pa
    pub apoapsis_ut: f64,  // s
    pub current_stage: usize,
    pub booster_burnout: Option<f64>, // altitude where stage 0 runs dry
    pub fail_above: Option<f64>,      // altitude where telemetry is lost
    pub fail_with_node: bool,         // clock reads fail while a node is planned
    pub throttle: f64,
    throttle_log: Vec<f64>,
    pub autopilot: bool,
    pub rcs: bool,
    pub attitude: Option<AttitudeTarget>,
    pub activations: usize,
    node: Option<(u32, f64)>,
    next_node_id: u32,
    pub nodes_removed: usize,
    pub last_remaining: f64,
    pub ignition_time: Option<f64>,
    pub thrust: f64, // N
    pub isp: f64,    // s
    pub mass: f64,   // kg
}

impl ScriptedVessel {
    /// On the pad of a two-stage vehicle.
    pub fn on_pad() -> Self {
        Self {
            t: 0.0,
            launch_time: None,
            climb_rate: 1_000.0,
            ceiling: 100_000.0,
            q_peak: 20_000.0,
            apoapsis_ut: 400.0,
            current_stage: 2,
            booster_burnout: None,
            fail_above: None,
            fail_with_node: false,
            throttle: 0.0,
            throttle_log: Vec::new(),
            autopilot: false,
            rcs: false,
            attitude: None,
            activations: 0,
            node: None,
            next_node_id: 1,
            nodes_removed: 0,
            last_remaining: f64::NAN,
            ignition_time: None,
            thrust: 200_000.0,
            isp: 300.0,
            mass: 10_000.0,
        }
    }

    /// Coasting above the atmosphere, `time_to_apoapsis` seconds out.
    pub fn in_orbit(time_to_apoapsis: f64) -> Self {
        Self {
            launch_time: Some(-1_000.0),
            apoapsis_ut: time_to_apoapsis,
            current_stage: 0,
            ..Self::on_pad()
        }
    }

    pub fn throttle_commands(&self) -> Vec<f64> {
        self.throttle_log.clone()
    }

    pub fn node_remaining(&self) -> Option<f64> {
        self.node.map(|(_, remaining)| remaining)
    }

    fn raw_altitude(&self) -> f64 {
        match self.launch_time {
            Some(t0) => (self.climb_rate * (self.t - t0)).min(self.ceiling),
            None => 0.0,
        }
    }
}

impl TelemetrySource for ScriptedVessel {
    fn universal_time(&self) -> Result<f64> {
        if self.fail_with_node && self.node.is_some() {
            return Err(GuidanceError::Telemetry("clock stream dropped".into()));
        }
        Ok(self.t)
    }

    fn altitude(&self) -> Result<f64> {
        let alt = self.raw_altitude();
        match self.fail_above {
            Some(limit) if alt > limit => Err(GuidanceError::Telemetry("connection lost".into())),
            _ => Ok(alt),
        }
    }

    fn apoapsis_altitude(&self) -> Result<f64> {
        Ok((self.raw_altitude() * 1.2).min(self.ceiling))
    }

    fn surface_speed(&self) -> Result<f64> {
        Ok(self.climb_rate)
    }

    fn dynamic_pressure(&self) -> Result<f64> {
        let alt = self.raw_altitude();
        if alt < 70_000.0 {
            Ok(self.q_peak * (PI * alt / 70_000.0).sin())
        } else {
            Ok(0.0)
        }
    }

    fn time_to_apoapsis(&self) -> Result<f64> {
        Ok((self.apoapsis_ut - self.t).max(0.0))
    }

    fn stage_resources(&self, stage: usize) -> Result<StageResources> {
        let spent = stage == 0
            && self.booster_burnout.is_some_and(|alt| self.raw_altitude() >= alt);
        let amount = if spent { 0.0 } else { 100.0 };
        Ok(StageResources::new().with(ResourceKind::LiquidFuel, amount, 100.0))
    }

    fn current_stage(&self) -> Result<usize> {
        Ok(self.current_stage)
    }

    fn vehicle_mass(&self) -> Result<f64> {
        Ok(self.mass)
    }

    fn available_thrust(&self) -> Result<f64> {
        Ok(self.thrust)
    }

    fn specific_impulse(&self) -> Result<f64> {
        Ok(self.isp)
    }

    fn gravitational_parameter(&self) -> Result<f64> {
        Ok(3.5316e12)
    }

    fn semi_major_axis(&self) -> Result<f64> {
        Ok(6.5e5)
    }

    fn apoapsis_radius(&self) -> Result<f64> {
        Ok(7.0e5)
    }

    fn attitude_error(&self) -> Result<f64> {
        Ok(0.0)
    }
}

impl VehicleActuation for ScriptedVessel {
    fn set_throttle(&mut self, throttle: f64) -> Result<()> {
        if throttle >= 1.0 && self.node.is_some() && self.ignition_time.is_none() {
            self.ignition_time = Some(self.t);
        }
        self.throttle = throttle;
        self.throttle_log.push(throttle);
        Ok(())
    }

    fn engage_autopilot(&mut self) -> Result<()> {
        self.autopilot = true;
        Ok(())
    }

    fn disengage_autopilot(&mut self) -> Result<()> {
        self.autopilot = false;
        Ok(())
    }

    fn set_attitude_target(&mut self, target: AttitudeTarget) -> Result<()> {
        self.attitude = Some(target);
        Ok(())
    }

    fn activate_next_stage(&mut self) -> Result<()> {
        if self.current_stage == 0 {
            return Err(GuidanceError::Actuation("no stages left".into()));
        }
        self.current_stage -= 1;
        self.activations += 1;
        if self.launch_time.is_none() {
            self.launch_time = Some(self.t);
        }
        Ok(())
    }

    fn set_reaction_control(&mut self, enabled: bool) -> Result<()> {
        self.rcs = enabled;
        Ok(())
    }

    fn add_maneuver_node(&mut self, ut: f64, prograde: f64) -> Result<NodeHandle> {
        if self.node.is_some() {
            return Err(GuidanceError::Actuation("node already planned".into()));
        }
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.node = Some((id, prograde));
        Ok(NodeHandle::new(id, ut, prograde))
    }

    fn remaining_delta_v(&self, node: &NodeHandle) -> Result<f64> {
        match self.node {
            Some((id, remaining)) if id == node.id() => Ok(remaining),
            _ => Err(GuidanceError::Actuation(format!("stale node {}", node.id()))),
        }
    }

    fn remove_maneuver_node(&mut self, node: NodeHandle) -> Result<()> {
        match self.node.take() {
            Some((id, remaining)) if id == node.id() => {
                self.nodes_removed += 1;
                self.last_remaining = remaining;
                Ok(())
            }
            other => {
                self.node = other;
                Err(GuidanceError::Actuation(format!("stale node {}", node.id())))
            }
        }
    }
}

impl Clock for ScriptedVessel {
    fn now(&self) -> f64 {
        self.t
    }

    fn sleep(&mut self, period: Duration) -> Result<()> {
        let dt = period.as_secs_f64();
        if let Some((_, remaining)) = self.node.as_mut() {
            *remaining -= self.throttle * self.thrust / self.mass * dt;
        }
        self.t += dt;
        Ok(())
    }
}
