use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ascent_guidance::io::{self, FinalOrbit, FlightSummary};
use ascent_guidance::physics::Body;
use ascent_guidance::sim::{fly, AscentPhase, SimulatedVessel};
use ascent_guidance::vehicle::{presets, Launcher, TelemetrySource, TracingStatus};
use ascent_guidance::GuidanceConfig;

#[derive(Parser)]
#[command(name = "ascent-guidance")]
#[command(about = "Fly a simulated launcher from the pad to a circular orbit")]
struct Cli {
    /// Guidance configuration (JSON). Missing fields take defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Launcher definition (JSON). Defaults to the two-stage preset.
    #[arg(short, long)]
    launcher: Option<PathBuf>,

    /// Target apoapsis altitude, m. Overrides the configuration.
    #[arg(long)]
    target_altitude: Option<f64>,

    /// Write the per-tick flight log here as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON flight summary here.
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GuidanceConfig::load(path)
            .with_context(|| format!("loading guidance config {}", path.display()))?,
        None => GuidanceConfig::default(),
    };
    if let Some(target) = cli.target_altitude {
        config.launch.target_altitude = target;
    }

    let launcher = match &cli.launcher {
        Some(path) => Launcher::load(path)
            .with_context(|| format!("loading launcher {}", path.display()))?,
        None => presets::two_stage_orbital(),
    };

    let q_allow = config.launch.q_allow;
    let mut vessel = SimulatedVessel::new(Body::kerbin(), launcher);
    let report = fly(config, &mut vessel, &mut TracingStatus).context("ascent failed")?;

    let final_orbit = FinalOrbit {
        apoapsis_m: vessel.apoapsis_altitude()?,
        periapsis_m: vessel.periapsis_altitude(),
    };
    let summary = FlightSummary::new(vessel.launcher(), &report, final_orbit);

    if let Some(path) = &cli.csv {
        io::write_flight_log_file(path, &report.log)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &cli.summary {
        io::write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  ASCENT GUIDANCE: {}", summary.launcher.name);
    println!("====================================================================");
    println!();
    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for record in &report.transitions {
        println!(
            "  {:<18} t={:>7.1}s   alt={:>9.0}m",
            record.phase.label().to_uppercase(),
            record.time,
            record.altitude
        );
    }
    println!();

    let turn = report.log.in_phase(AscentPhase::GravityTurn);
    let throttled = turn.filter(|s| s.throttle < 1.0).count();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Max Q:         {:>8.0} Pa   (limit {:.0} Pa, {} throttled ticks)",
        summary.max_dynamic_pressure_pa,
        q_allow,
        throttled
    );
    println!("  Separations:   {:>8}", summary.stage_separations);
    println!(
        "  Circularize:   {:>8.1} m/s over {:.1} s",
        summary.planned_delta_v_ms, summary.burn_time_s
    );
    println!(
        "  Final orbit:   {:>8.1} km x {:.1} km",
        final_orbit.apoapsis_m / 1000.0,
        final_orbit.periapsis_m / 1000.0
    );
    println!("  Flight time:   {:>8.1} s", summary.flight_time_s);
    println!("====================================================================");
    println!();

    Ok(())
}
