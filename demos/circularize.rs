use std::time::Duration;

use anyhow::Result;

use ascent_guidance::config::BurnTuning;
use ascent_guidance::orbital::{plan_circularization, BurnExecutor, KeplerianElements};
use ascent_guidance::physics::Body;
use ascent_guidance::sim::{FlightLog, SimulatedVessel};
use ascent_guidance::vehicle::{
    LauncherBuilder, StageBuilder, TelemetrySource, TracingStatus, VehicleActuation,
};

/// Start an upper stage coasting toward apoapsis on a 40 x 90 km orbit and
/// let the burn executor raise the periapsis.
fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let body = Body::kerbin();
    let mu = body.mu;
    let (rp, ra) = (body.radius + 40_000.0, body.radius + 90_000.0);

    let transfer = KeplerianElements {
        sma: 0.5 * (rp + ra),
        ecc: (ra - rp) / (ra + rp),
        inc: 0.0,
        raan: 0.0,
        argp: 0.0,
        true_anom: 2.4, // rad, above the atmosphere and climbing
    };
    let target = KeplerianElements::circular(ra, 0.0);

    let upper = LauncherBuilder::new("Upper stage")
        .stage(
            StageBuilder::new("S2-Upper")
                .dry_mass(1_500.0)
                .propellant_mass(6_000.0)
                .thrust(120_000.0)
                .isp(340.0)
                .build(),
        )
        .build();
    let mut vessel = SimulatedVessel::new(body, upper);
    vessel.place_on_orbit(&transfer);
    vessel.activate_next_stage()?;
    vessel.engage_autopilot()?;

    let mut status = TracingStatus;
    let plan = plan_circularization(&mut vessel, &mut status)?;
    let delta_v = plan.delta_v;

    let executor = BurnExecutor::new(BurnTuning::default(), Duration::from_millis(100));
    let mut log = FlightLog::default();
    let summary = executor.execute(&mut vessel, plan.node, &mut log, &mut status)?;

    println!("Transfer orbit period: {:.0} s", transfer.period(mu));
    println!("Target orbit period:   {:.0} s", target.period(mu));
    println!("Planned delta-v:       {:.1} m/s", delta_v);
    println!("Estimated burn time:   {:.1} s", summary.burn_time);
    println!(
        "Final orbit:           {:.1} km x {:.1} km",
        vessel.apoapsis_altitude()? / 1000.0,
        vessel.periapsis_altitude() / 1000.0
    );
    Ok(())
}
