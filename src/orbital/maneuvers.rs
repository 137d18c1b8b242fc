use tracing::info;

use crate::error::{GuidanceError, Result};
use crate::vehicle::{NodeHandle, StatusSink, TelemetrySource, VehicleActuation};

/// Orbital speed at radius `r` on an orbit of semi-major axis `sma` (vis-viva).
pub fn vis_viva_speed(mu: f64, r: f64, sma: f64) -> Result<f64> {
    let v_sq = mu * (2.0 / r - 1.0 / sma);
    if !(v_sq >= 0.0 && v_sq.is_finite()) {
        return Err(GuidanceError::DegenerateOrbit(format!(
            "vis-viva undefined for mu={mu}, r={r}, a={sma}"
        )));
    }
    Ok(v_sq.sqrt())
}

/// Circular orbit speed at radius `r`.
pub fn circular_velocity(mu: f64, r: f64) -> Result<f64> {
    vis_viva_speed(mu, r, r)
}

/// Prograde delta-v at apoapsis radius `ap` that circularizes an orbit of
/// semi-major axis `sma`. Zero when the orbit is already circular.
pub fn circularization_delta_v(mu: f64, ap: f64, sma: f64) -> Result<f64> {
    if !(mu > 0.0 && ap > 0.0) {
        return Err(GuidanceError::DegenerateOrbit(format!(
            "circularization needs positive mu and apoapsis (mu={mu}, ap={ap})"
        )));
    }
    let v_circular = circular_velocity(mu, ap)?;
    let v_apoapsis = vis_viva_speed(mu, ap, sma)?;
    Ok(v_circular - v_apoapsis)
}

/// A maneuver produced by the planner.
#[derive(Debug, PartialEq)]
pub struct ManeuverPlan {
    pub node: NodeHandle,
    pub delta_v: f64,
}

/// Plan the circularization burn and place its node at the next apoapsis.
pub fn plan_circularization<V, S>(vessel: &mut V, status: &mut S) -> Result<ManeuverPlan>
where
    V: TelemetrySource + VehicleActuation + ?Sized,
    S: StatusSink + ?Sized,
{
    status.write("Planning circularization burn");

    let mu = vessel.gravitational_parameter()?;
    let ap = vessel.apoapsis_radius()?;
    let sma = vessel.semi_major_axis()?;
    let delta_v = circularization_delta_v(mu, ap, sma)?;

    let ut = vessel.universal_time()? + vessel.time_to_apoapsis()?;
    let node = vessel.add_maneuver_node(ut, delta_v)?;
    info!(delta_v, ut, "circularization node created");
    Ok(ManeuverPlan { node, delta_v })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MU_KERBIN: f64 = 3.5316e12;

    #[test]
    fn already_circular_needs_no_burn() {
        let dv = circularization_delta_v(MU_KERBIN, 700_000.0, 700_000.0).unwrap();
        assert_relative_eq!(dv, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn elliptical_orbit_matches_closed_form() {
        let (mu, ap, a1): (f64, f64, f64) = (3.5316e12, 7.0e5, 6.5e5);
        let expected = (mu / ap).sqrt() - (mu * (2.0 / ap - 1.0 / a1)).sqrt();
        let dv = circularization_delta_v(mu, ap, a1).unwrap();
        assert_relative_eq!(dv, expected, max_relative = 1e-12);
        // ~88 m/s for this suborbital ellipse
        assert!(dv > 87.0 && dv < 89.0, "got {dv}");
    }

    #[test]
    fn suborbital_delta_v_is_positive() {
        for a1 in [3.6e5, 4.5e5, 6.0e5, 6.9e5] {
            assert!(circularization_delta_v(MU_KERBIN, 7.0e5, a1).unwrap() > 0.0);
        }
    }

    #[test]
    fn degenerate_inputs_rejected() {
        assert!(circularization_delta_v(MU_KERBIN, 0.0, 6.5e5).is_err());
        // apoapsis beyond 2a: no real speed there
        assert!(circularization_delta_v(MU_KERBIN, 7.0e5, 3.0e5).is_err());
    }

    #[test]
    fn circular_velocity_leo() {
        let v = circular_velocity(3.986_004_418e14, 6_778_137.0).unwrap();
        assert!((v - 7668.6).abs() < 1.0);
    }
}
