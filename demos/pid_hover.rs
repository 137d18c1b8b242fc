use std::time::Duration;

use anyhow::Result;

use ascent_guidance::gnc::Pid;
use ascent_guidance::physics::Body;
use ascent_guidance::sim::SimulatedVessel;
use ascent_guidance::vehicle::{
    AttitudeTarget, Clock, LauncherBuilder, StageBuilder, TelemetrySource, VehicleActuation,
};

const TARGET_ALTITUDE: f64 = 250.0; // m
const TICK: Duration = Duration::from_millis(100);

/// Hold a single-stage hopper at a fixed altitude, with throttle driven by
/// the PID controller straight from the altitude reading.
fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let hopper = LauncherBuilder::new("Hopper")
        .stage(
            StageBuilder::new("Hopper")
                .dry_mass(500.0)
                .propellant_mass(1_500.0)
                .thrust(40_000.0)
                .isp(280.0)
                .cd(0.4)
                .area(1.0)
                .build(),
        )
        .build();
    let mut vessel = SimulatedVessel::new(Body::kerbin(), hopper);

    let mut pid = Pid::new(0.125, 0.0025, 0.125);
    pid.set_clamp(20.0);
    pid.set_target(TARGET_ALTITUDE);

    vessel.engage_autopilot()?;
    vessel.set_attitude_target(AttitudeTarget::PitchHeading { pitch: 90.0, heading: 90.0 })?;
    vessel.set_throttle(1.0)?;
    vessel.activate_next_stage()?;

    println!("Hovering at {TARGET_ALTITUDE:.0} m...");
    for tick in 0..600 {
        let altitude = vessel.altitude()?;
        let throttle = pid.update(altitude, vessel.now()).clamp(0.0, 1.0);
        vessel.set_throttle(throttle)?;

        if tick % 10 == 0 {
            let up = vessel.position().normalize();
            let climb = vessel.velocity().dot(&up);
            println!(
                "t={:>5.1}s  altitude: {:>7.2} m  climb: {:>6.2} m/s  throttle: {:>5.1}%",
                vessel.now(),
                altitude,
                climb,
                throttle * 100.0
            );
        }
        vessel.sleep(TICK)?;
    }

    println!(
        "Final altitude: {:.2} m (target {TARGET_ALTITUDE:.0} m), integral {:.2}",
        vessel.altitude()?,
        pid.integral()
    );
    Ok(())
}
