use std::f64::consts::{PI, TAU};
use std::time::Duration;

use nalgebra::Vector3;
use tracing::{debug, info};

use crate::error::{GuidanceError, Result};
use crate::orbital::elements::KeplerianElements;
use crate::physics::{aerodynamics, Body, G0};
use crate::vehicle::{
    presets, AttitudeTarget, Clock, Launcher, NodeHandle, ReferenceFrame, StageResources,
    TelemetrySource, VehicleActuation,
};

// ---------------------------------------------------------------------------
// Simulated vessel: planar point mass around a non-rotating body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct PlannedNode {
    id: u32,
    delta_v: f64,
    delivered: f64, // prograde delta-v delivered since the node was created
}

/// Self-contained flight host. Physics advance only inside [`Clock::sleep`],
/// in fixed substeps.
///
/// Stage numbering follows the usual launcher convention: with `k` stages
/// the vehicle sits on the pad at stage `k`, and each activation counts down,
/// dropping the spent stage and igniting the next one.
#[derive(Debug, Clone)]
pub struct SimulatedVessel {
    body: Body,
    launcher: Launcher,
    propellant: Vec<f64>, // kg remaining, per stage
    current_stage: usize,
    time: f64,
    pos: Vector3<f64>,
    vel: Vector3<f64>,
    pointing: Vector3<f64>, // unit thrust axis
    throttle: f64,
    autopilot: bool,
    target: Option<AttitudeTarget>,
    rcs: bool,
    node: Option<PlannedNode>,
    next_node_id: u32,
    launched: bool,
    /// Integration substep, s.
    pub substep: f64,
    /// Autopilot turn rate, rad/s.
    pub slew_rate: f64,
    /// Simulated seconds after which every `sleep` fails.
    pub time_limit: f64,
}

impl SimulatedVessel {
    pub fn new(body: Body, launcher: Launcher) -> Self {
        let propellant = launcher.stages.iter().map(|s| s.propellant_mass).collect();
        let current_stage = launcher.stages.len();
        Self {
            pos: Vector3::new(body.radius, 0.0, 0.0),
            body,
            launcher,
            propellant,
            current_stage,
            time: 0.0,
            vel: Vector3::zeros(),
            pointing: Vector3::x(),
            throttle: 0.0,
            autopilot: false,
            target: None,
            rcs: false,
            node: None,
            next_node_id: 1,
            launched: false,
            substep: 0.02,
            slew_rate: 10f64.to_radians(),
            time_limit: 2_000.0,
        }
    }

    /// Preset two-stage launcher on a Kerbin pad.
    pub fn two_stage() -> Self {
        Self::new(Body::kerbin(), presets::two_stage_orbital())
    }

    /// Teleport to an inertial state, e.g. to start in orbit.
    pub fn place(&mut self, pos: Vector3<f64>, vel: Vector3<f64>) {
        self.pos = pos;
        self.vel = vel;
        self.launched = true;
    }

    /// Teleport onto `orbit`. Only equatorial orbits (`inc == 0`) stay in
    /// the simulated plane.
    pub fn place_on_orbit(&mut self, orbit: &KeplerianElements) {
        let (pos, vel) = orbit.to_state_vector(self.body.mu);
        self.place(pos, vel);
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    pub fn has_node(&self) -> bool {
        self.node.is_some()
    }

    pub fn position(&self) -> Vector3<f64> {
        self.pos
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.vel
    }

    /// Propellant left in stage `index` of the launcher's stage list, kg.
    pub fn propellant(&self, index: usize) -> Option<f64> {
        self.propellant.get(index).copied()
    }

    pub fn periapsis_altitude(&self) -> f64 {
        self.elements().periapsis_radius() - self.body.radius
    }

    fn elements(&self) -> KeplerianElements {
        KeplerianElements::from_state_vector(&self.pos, &self.vel, self.body.mu)
    }

    /// Index into the stage list of the stage whose engines are lit.
    fn active_index(&self) -> Option<usize> {
        let k = self.launcher.stages.len();
        (self.current_stage < k).then(|| k - self.current_stage - 1)
    }

    fn attached(&self) -> std::ops::Range<usize> {
        self.active_index().unwrap_or(0)..self.launcher.stages.len()
    }

    fn mass(&self) -> f64 {
        self.attached()
            .map(|i| self.launcher.stages[i].dry_mass + self.propellant[i])
            .sum()
    }

    fn drag_area(&self) -> f64 {
        self.attached()
            .map(|i| self.launcher.stages[i].drag_area())
            .fold(0.0, f64::max)
    }

    fn thrust_available(&self) -> f64 {
        match self.active_index() {
            Some(i) if self.propellant[i] > 0.0 => self.launcher.stages[i].thrust,
            _ => 0.0,
        }
    }

    fn up(&self) -> Vector3<f64> {
        self.pos.normalize()
    }

    fn east(&self) -> Vector3<f64> {
        Vector3::z().cross(&self.up())
    }

    /// Inertial unit vector the autopilot is steering toward.
    fn target_direction(&self) -> Option<Vector3<f64>> {
        let up = self.up();
        let east = self.east();
        let raw = match self.target? {
            AttitudeTarget::PitchHeading { pitch, heading } => {
                let (p, h) = (pitch.to_radians(), heading.to_radians());
                up * p.sin() + east * (p.cos() * h.sin())
            }
            // Maneuver frame: y along the burn (prograde), x radial.
            AttitudeTarget::Direction { frame: ReferenceFrame::Maneuver(_), direction } => {
                let prograde = self.vel.try_normalize(1e-6).unwrap_or(up);
                let radial = (up - prograde * up.dot(&prograde))
                    .try_normalize(1e-9)
                    .unwrap_or_else(Vector3::zeros);
                prograde * direction.y + radial * direction.x
            }
        };
        raw.try_normalize(1e-9)
    }

    fn slew(&mut self, dt: f64) {
        if !self.autopilot {
            return;
        }
        let Some(target) = self.target_direction() else {
            return;
        };
        let current = self.pointing.y.atan2(self.pointing.x);
        let wanted = target.y.atan2(target.x);
        let max_turn = self.slew_rate * dt;
        let turn = ((wanted - current + PI).rem_euclid(TAU) - PI).clamp(-max_turn, max_turn);
        let angle = current + turn;
        self.pointing = Vector3::new(angle.cos(), angle.sin(), 0.0);
    }

    /// Advance one substep: semi-implicit Euler.
    fn step(&mut self, dt: f64) -> Result<()> {
        self.slew(dt);

        let mass = self.mass();
        let thrust = self.throttle * self.thrust_available();
        let mut accel = self.body.gravity_accel(&self.pos);

        if thrust > 0.0 {
            if let Some(i) = self.active_index() {
                let flow = thrust / (self.launcher.stages[i].isp * G0);
                self.propellant[i] = (self.propellant[i] - flow * dt).max(0.0);
            }
            let thrust_accel = thrust / mass;
            accel += self.pointing * thrust_accel;

            let speed = self.vel.norm();
            if let Some(node) = self.node.as_mut() {
                if speed > 1e-6 {
                    node.delivered += thrust_accel * self.pointing.dot(&self.vel) / speed * dt;
                }
            }
        }

        let atm = self.body.atmosphere.at(self.body.altitude(&self.pos));
        accel += aerodynamics::drag_force(&self.vel, &atm, self.drag_area()) / mass;

        self.vel += accel * dt;
        self.pos += self.vel * dt;
        self.time += dt;

        let altitude = self.body.altitude(&self.pos);
        if altitude > 10.0 {
            self.launched = true;
        }
        if altitude < 0.0 {
            if self.launched {
                return Err(GuidanceError::Telemetry(format!(
                    "vehicle impacted the surface at t={:.1} s",
                    self.time
                )));
            }
            // Held down on the pad
            self.pos = self.up() * self.body.radius;
            self.vel = Vector3::zeros();
        }
        Ok(())
    }
}

impl TelemetrySource for SimulatedVessel {
    fn universal_time(&self) -> Result<f64> {
        Ok(self.time)
    }

    fn altitude(&self) -> Result<f64> {
        Ok(self.body.altitude(&self.pos))
    }

    fn apoapsis_altitude(&self) -> Result<f64> {
        Ok(self.elements().apoapsis_radius() - self.body.radius)
    }

    fn surface_speed(&self) -> Result<f64> {
        Ok(self.vel.norm())
    }

    fn dynamic_pressure(&self) -> Result<f64> {
        let atm = self.body.atmosphere.at(self.body.altitude(&self.pos));
        Ok(aerodynamics::dynamic_pressure(&atm, self.vel.norm()))
    }

    fn time_to_apoapsis(&self) -> Result<f64> {
        let tta = self.elements().time_to_apoapsis(self.body.mu);
        if tta.is_finite() {
            Ok(tta)
        } else {
            Err(GuidanceError::DegenerateOrbit("trajectory has no apoapsis".into()))
        }
    }

    fn stage_resources(&self, stage: usize) -> Result<StageResources> {
        let k = self.launcher.stages.len();
        // Stage `s` separates the stage-list entry k - 2 - s.
        let Some(index) = k.checked_sub(stage + 2) else {
            return Ok(StageResources::new());
        };
        let spec = &self.launcher.stages[index];
        Ok(StageResources::new().with(spec.propellant, self.propellant[index], spec.propellant_mass))
    }

    fn current_stage(&self) -> Result<usize> {
        Ok(self.current_stage)
    }

    fn vehicle_mass(&self) -> Result<f64> {
        Ok(self.mass())
    }

    fn available_thrust(&self) -> Result<f64> {
        Ok(self.thrust_available())
    }

    fn specific_impulse(&self) -> Result<f64> {
        Ok(self.active_index().map_or(0.0, |i| self.launcher.stages[i].isp))
    }

    fn gravitational_parameter(&self) -> Result<f64> {
        Ok(self.body.mu)
    }

    fn semi_major_axis(&self) -> Result<f64> {
        Ok(self.elements().sma)
    }

    fn apoapsis_radius(&self) -> Result<f64> {
        let elements = self.elements();
        if elements.is_bound() {
            Ok(elements.apoapsis_radius())
        } else {
            Err(GuidanceError::DegenerateOrbit(format!(
                "escape trajectory (a={:.0} m, e={:.3})",
                elements.sma, elements.ecc
            )))
        }
    }

    fn attitude_error(&self) -> Result<f64> {
        Ok(self.target_direction().map_or(0.0, |target| {
            self.pointing.dot(&target).clamp(-1.0, 1.0).acos().to_degrees()
        }))
    }
}

impl VehicleActuation for SimulatedVessel {
    fn set_throttle(&mut self, throttle: f64) -> Result<()> {
        if !throttle.is_finite() {
            return Err(GuidanceError::Actuation(format!("throttle {throttle}")));
        }
        self.throttle = throttle.clamp(0.0, 1.0);
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
        self.target = Some(target);
        Ok(())
    }

    fn activate_next_stage(&mut self) -> Result<()> {
        if self.current_stage == 0 {
            return Err(GuidanceError::Actuation("no stages left to activate".into()));
        }
        self.current_stage -= 1;
        if let Some(i) = self.active_index() {
            info!(
                stage = self.current_stage,
                engine = %self.launcher.stages[i].name,
                t = self.time,
                "stage activated"
            );
        }
        Ok(())
    }

    fn set_reaction_control(&mut self, enabled: bool) -> Result<()> {
        self.rcs = enabled;
        Ok(())
    }

    fn add_maneuver_node(&mut self, ut: f64, prograde: f64) -> Result<NodeHandle> {
        if self.node.is_some() {
            return Err(GuidanceError::Actuation("a maneuver node is already planned".into()));
        }
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.node = Some(PlannedNode { id, delta_v: prograde, delivered: 0.0 });
        debug!(id, ut, prograde, "maneuver node added");
        Ok(NodeHandle::new(id, ut, prograde))
    }

    fn remaining_delta_v(&self, node: &NodeHandle) -> Result<f64> {
        match self.node {
            Some(planned) if planned.id == node.id() => {
                Ok((planned.delta_v - planned.delivered).max(0.0))
            }
            _ => Err(GuidanceError::Actuation(format!("maneuver node {} does not exist", node.id()))),
        }
    }

    fn remove_maneuver_node(&mut self, node: NodeHandle) -> Result<()> {
        match self.node {
            Some(planned) if planned.id == node.id() => {
                self.node = None;
                debug!(id = planned.id, delivered = planned.delivered, "maneuver node removed");
                Ok(())
            }
            _ => Err(GuidanceError::Actuation(format!("maneuver node {} does not exist", node.id()))),
        }
    }
}

impl Clock for SimulatedVessel {
    fn now(&self) -> f64 {
        self.time
    }

    fn sleep(&mut self, period: Duration) -> Result<()> {
        let total = period.as_secs_f64();
        let steps = (total / self.substep).round().max(1.0) as usize;
        let dt = total / steps as f64;
        for _ in 0..steps {
            self.step(dt)?;
        }
        if self.time > self.time_limit {
            return Err(GuidanceError::Telemetry(format!(
                "simulation exceeded its {:.0} s time limit",
                self.time_limit
            )));
        }
        Ok(())
    }
}
