use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::event::{AscentPhase, AscentReport, FlightLog, PhaseRecord};
use crate::config::GuidanceConfig;
use crate::error::{GuidanceError, Result};
use crate::gnc::{maybe_stage, GravityTurn, Pid};
use crate::orbital::burn::BurnExecutor;
use crate::orbital::maneuvers::{plan_circularization, ManeuverPlan};
use crate::vehicle::{AttitudeTarget, FlightHost, StatusSink};

// ---------------------------------------------------------------------------
// Ascent orchestrator
// ---------------------------------------------------------------------------

/// Forward-only state machine flying a vehicle from the pad to a circular orbit.
pub struct AscentGuidance {
    config: GuidanceConfig,
    tick: Duration,
    liftoff_settle: Duration,
    phase: AscentPhase,
    throttle_pid: Pid,
    turn: GravityTurn,
    plan: Option<ManeuverPlan>,
    report: AscentReport,
}

impl AscentGuidance {
    /// Validates `config` before anything is commanded.
    pub fn new(config: GuidanceConfig) -> Result<Self> {
        config.validate()?;
        let tick = config.tick()?;
        let liftoff_settle = config.liftoff_settle()?;
        let mut throttle_pid = Pid::from_gains(&config.throttle_pid);
        throttle_pid.set_clamp(config.launch.q_allow);
        throttle_pid.set_target(config.launch.q_allow);
        let turn = GravityTurn::new(&config.launch, config.heading_deg);
        Ok(Self {
            config,
            tick,
            liftoff_settle,
            phase: AscentPhase::Countdown,
            throttle_pid,
            turn,
            plan: None,
            report: AscentReport::default(),
        })
    }

    /// Fly the whole ascent.
    ///
    /// Any collaborator failure aborts the run: it is reported on `status`
    /// and returned as [`GuidanceError::Aborted`] naming the phase it hit.
    pub fn run<H, S>(mut self, vessel: &mut H, status: &mut S) -> Result<AscentReport>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        let mut next = Some(AscentPhase::Countdown);
        while let Some(phase) = next {
            let outcome = match self.enter(vessel, phase) {
                Ok(()) => self.step(vessel, status),
                Err(err) => Err(err),
            };
            if let Err(err) = outcome {
                error!(%phase, %err, "ascent aborted");
                // A planned node that never reached the executor still has to go
                if let Some(plan) = self.plan.take() {
                    if let Err(cleanup_err) = vessel.remove_maneuver_node(plan.node) {
                        warn!(%cleanup_err, "could not remove circularization node");
                    }
                }
                status.write(&format!("Ascent aborted: {err}"));
                return Err(GuidanceError::Aborted { phase, source: Box::new(err) });
            }
            next = phase.next();
        }
        Ok(self.report)
    }

    fn enter<H: FlightHost + ?Sized>(&mut self, vessel: &H, phase: AscentPhase) -> Result<()> {
        self.phase = phase;
        let record = PhaseRecord {
            phase,
            time: vessel.universal_time()?,
            altitude: vessel.altitude()?,
        };
        info!(%phase, t = record.time, alt = record.altitude, "phase");
        self.report.transitions.push(record);
        Ok(())
    }

    /// Run the current phase to its exit condition.
    fn step<H, S>(&mut self, vessel: &mut H, status: &mut S) -> Result<()>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        match self.phase {
            AscentPhase::Countdown => self.countdown(vessel, status),
            AscentPhase::Liftoff => self.liftoff(vessel, status),
            AscentPhase::GravityTurn => self.gravity_turn(vessel, status),
            AscentPhase::ApoapsisReached => {
                status.write("Target apoapsis reached");
                vessel.set_throttle(0.0)
            }
            AscentPhase::Coasting => self.coast(vessel, status),
            AscentPhase::Circularizing => {
                let plan = plan_circularization(vessel, status)?;
                self.report.planned_delta_v = plan.delta_v;
                self.plan = Some(plan);
                Ok(())
            }
            AscentPhase::Executing => self.execute(vessel, status),
            AscentPhase::Complete => {
                vessel.disengage_autopilot()?;
                status.write("Target orbit reached");
                Ok(())
            }
        }
    }

    fn countdown<H, S>(&mut self, vessel: &mut H, status: &mut S) -> Result<()>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        let second = Duration::from_secs(1);
        status.write("Countdown");
        vessel.sleep(second)?;
        for count in (1..=self.config.countdown_s).rev() {
            status.write(&count.to_string());
            vessel.sleep(second)?;
        }
        Ok(())
    }

    fn liftoff<H, S>(&mut self, vessel: &mut H, status: &mut S) -> Result<()>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        status.write("Lift off!");
        vessel.set_throttle(1.0)?;
        vessel.sleep(self.liftoff_settle)?;
        vessel.engage_autopilot()?;
        vessel.set_attitude_target(AttitudeTarget::PitchHeading {
            pitch: 90.0,
            heading: self.config.heading_deg,
        })?;
        vessel.activate_next_stage()?;

        // Climb vertically at full throttle to the start of the turn
        while vessel.altitude()? <= self.config.launch.turn_start_altitude {
            vessel.set_throttle(1.0)?;
            self.report.log.record(vessel, AscentPhase::Liftoff, 1.0, Some(90.0))?;
            vessel.sleep(self.tick)?;
        }
        Ok(())
    }

    fn gravity_turn<H, S>(&mut self, vessel: &mut H, status: &mut S) -> Result<()>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        status.write("Executing gravity turn");
        let launch = self.config.launch;
        // Fresh time reference: the first sample only seeds the loop.
        self.throttle_pid.reset();

        loop {
            let altitude = vessel.altitude()?;
            if !(launch.turn_start_altitude < altitude && altitude < launch.turn_end_altitude) {
                break;
            }

            let pitch = self.turn.steer(vessel, altitude)?;
            if maybe_stage(vessel, status)? {
                self.report.stage_separations += 1;
            }

            let q = vessel.dynamic_pressure()?;
            let mut throttle = self.throttle_pid.update(q, vessel.now()).clamp(0.0, 1.0);
            if vessel.apoapsis_altitude()? >= launch.target_altitude {
                throttle = 0.0;
            }
            vessel.set_throttle(throttle)?;
            debug!(altitude, q, throttle, pitch, "gravity turn");

            self.report.log.record(vessel, AscentPhase::GravityTurn, throttle, Some(pitch))?;
            vessel.sleep(self.tick)?;
        }
        Ok(())
    }

    fn coast<H, S>(&mut self, vessel: &mut H, status: &mut S) -> Result<()>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        status.write("Coasting out of the atmosphere");
        while vessel.altitude()? < self.config.atmosphere_altitude {
            self.report.log.record(vessel, AscentPhase::Coasting, 0.0, None)?;
            vessel.sleep(self.tick)?;
        }
        Ok(())
    }

    fn execute<H, S>(&mut self, vessel: &mut H, status: &mut S) -> Result<()>
    where
        H: FlightHost + ?Sized,
        S: StatusSink + ?Sized,
    {
        let Some(plan) = self.plan.take() else {
            return Err(GuidanceError::DegenerateOrbit("no circularization node planned".into()));
        };
        let executor = BurnExecutor::new(self.config.burn, self.tick);
        let summary = executor.execute(vessel, plan.node, &mut self.report.log, status)?;
        self.report.burn_time = summary.burn_time;
        self.report.stage_separations += summary.stage_separations;
        Ok(())
    }
}

/// Validate `config` and fly `vessel` to orbit.
pub fn fly<H, S>(config: GuidanceConfig, vessel: &mut H, status: &mut S) -> Result<AscentReport>
where
    H: FlightHost + ?Sized,
    S: StatusSink + ?Sized,
{
    AscentGuidance::new(config)?.run(vessel, status)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
