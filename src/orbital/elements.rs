use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;

/// Classical Keplerian orbital elements.
#[derive(Debug, Clone, Copy)]
pub struct KeplerianElements {
    pub sma: f64,       // semi-major axis, m (negative when hyperbolic)
    pub ecc: f64,       // eccentricity (0 = circular)
    pub inc: f64,       // inclination, rad
    pub raan: f64,      // right ascension of ascending node, rad
    pub argp: f64,      // argument of periapsis, rad
    pub true_anom: f64, // true anomaly, rad
}

impl KeplerianElements {
    /// Convert to an inertial state vector (position, velocity).
    pub fn to_state_vector(&self, mu: f64) -> (Vector3<f64>, Vector3<f64>) {
        let p = self.sma * (1.0 - self.ecc * self.ecc); // semi-latus rectum
        let r_pqw = p / (1.0 + self.ecc * self.true_anom.cos());

        // Position in perifocal frame (PQW)
        let r_pqw_vec = Vector3::new(
            r_pqw * self.true_anom.cos(),
            r_pqw * self.true_anom.sin(),
            0.0,
        );

        // Velocity in perifocal frame
        let sqrt_mu_p = (mu / p).sqrt();
        let v_pqw_vec = Vector3::new(
            -sqrt_mu_p * self.true_anom.sin(),
            sqrt_mu_p * (self.ecc + self.true_anom.cos()),
            0.0,
        );

        // Rotation matrix from PQW to inertial
        let cos_raan = self.raan.cos();
        let sin_raan = self.raan.sin();
        let cos_argp = self.argp.cos();
        let sin_argp = self.argp.sin();
        let cos_inc = self.inc.cos();
        let sin_inc = self.inc.sin();

        let rot = |v: &Vector3<f64>| -> Vector3<f64> {
            Vector3::new(
                (cos_raan * cos_argp - sin_raan * sin_argp * cos_inc) * v.x
                    + (-cos_raan * sin_argp - sin_raan * cos_argp * cos_inc) * v.y,
                (sin_raan * cos_argp + cos_raan * sin_argp * cos_inc) * v.x
                    + (-sin_raan * sin_argp + cos_raan * cos_argp * cos_inc) * v.y,
                (sin_argp * sin_inc) * v.x + (cos_argp * sin_inc) * v.y,
            )
        };

        (rot(&r_pqw_vec), rot(&v_pqw_vec))
    }

    /// Elements of the osculating orbit through an inertial state vector.
    ///
    /// Purely radial trajectories (zero angular momentum) come out as
    /// degenerate ellipses with `ecc == 1`, whose apoapsis is still the
    /// height where the vehicle would stop climbing.
    pub fn from_state_vector(pos: &Vector3<f64>, vel: &Vector3<f64>, mu: f64) -> Self {
        let r = pos.norm();
        let v = vel.norm();

        // Angular momentum
        let h = pos.cross(vel);
        let h_mag = h.norm();

        // Node vector
        let n = Vector3::new(-h.y, h.x, 0.0);
        let n_mag = n.norm();

        // Eccentricity vector
        let e_vec = ((v * v - mu / r) * pos - pos.dot(vel) * vel) / mu;
        let ecc = e_vec.norm();

        // Semi-major axis from vis-viva energy
        let energy = 0.5 * v * v - mu / r;
        let sma = -mu / (2.0 * energy);

        let inc = if h_mag > 1e-10 {
            (h.z / h_mag).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let raan = if n_mag > 1e-10 {
            let r = (n.x / n_mag).clamp(-1.0, 1.0).acos();
            if n.y < 0.0 { TAU - r } else { r }
        } else {
            0.0
        };

        let argp = if n_mag > 1e-10 && ecc > 1e-10 {
            let cos_argp = (n.dot(&e_vec) / (n_mag * ecc)).clamp(-1.0, 1.0);
            let w = cos_argp.acos();
            if e_vec.z < 0.0 { TAU - w } else { w }
        } else {
            0.0
        };

        let true_anom = if ecc > 1e-10 {
            let cos_nu = (e_vec.dot(pos) / (ecc * r)).clamp(-1.0, 1.0);
            let nu = cos_nu.acos();
            if pos.dot(vel) < 0.0 { TAU - nu } else { nu }
        } else {
            0.0
        };

        KeplerianElements {
            sma,
            ecc,
            inc,
            raan,
            argp,
            true_anom,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.sma > 0.0 && self.ecc < 1.0 + 1e-12
    }

    /// Apoapsis distance from the body's center (m); infinite when unbound.
    pub fn apoapsis_radius(&self) -> f64 {
        if self.is_bound() {
            self.sma * (1.0 + self.ecc)
        } else {
            f64::INFINITY
        }
    }

    /// Periapsis distance (m). Also valid for hyperbolic orbits (a < 0, e > 1).
    pub fn periapsis_radius(&self) -> f64 {
        self.sma * (1.0 - self.ecc)
    }

    pub fn period(&self, mu: f64) -> f64 {
        TAU * (self.sma.powi(3) / mu).sqrt()
    }

    /// Time until the next apoapsis passage (s); infinite on escape orbits.
    pub fn time_to_apoapsis(&self, mu: f64) -> f64 {
        if !self.is_bound() || self.ecc >= 1.0 {
            return f64::INFINITY;
        }
        let half = 0.5 * self.true_anom;
        let ecc_anom = 2.0
            * ((1.0 - self.ecc).sqrt() * half.sin()).atan2((1.0 + self.ecc).sqrt() * half.cos());
        let mean_anom = ecc_anom - self.ecc * ecc_anom.sin();
        let mean_motion = (mu / self.sma.powi(3)).sqrt();
        (PI - mean_anom).rem_euclid(TAU) / mean_motion
    }

    /// Circular orbit of radius `radius` (m) at inclination `inc`.
    pub fn circular(radius: f64, inc: f64) -> Self {
        KeplerianElements {
            sma: radius,
            ecc: 0.0,
            inc,
            raan: 0.0,
            argp: 0.0,
            true_anom: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MU_KERBIN: f64 = 3.5316e12;
    const R_KERBIN: f64 = 600_000.0;

    #[test]
    fn circular_roundtrip() {
        let orbit = KeplerianElements::circular(R_KERBIN + 80_000.0, 0.3);
        let (pos, vel) = orbit.to_state_vector(MU_KERBIN);
        let recovered = KeplerianElements::from_state_vector(&pos, &vel, MU_KERBIN);
        assert_relative_eq!(recovered.sma, orbit.sma, max_relative = 1e-9);
        assert!(recovered.ecc < 1e-6, "Should be nearly circular");
        assert_relative_eq!(recovered.inc, orbit.inc, epsilon = 1e-9);
    }

    #[test]
    fn apsides_of_ellipse() {
        let orbit = KeplerianElements {
            sma: 700_000.0,
            ecc: 0.1,
            inc: 0.0,
            raan: 0.0,
            argp: 0.0,
            true_anom: 1.0,
        };
        let (pos, vel) = orbit.to_state_vector(MU_KERBIN);
        let el = KeplerianElements::from_state_vector(&pos, &vel, MU_KERBIN);
        assert_relative_eq!(el.apoapsis_radius(), 770_000.0, max_relative = 1e-9);
        assert_relative_eq!(el.periapsis_radius(), 630_000.0, max_relative = 1e-9);
    }

    #[test]
    fn time_to_apoapsis_from_periapsis_is_half_period() {
        let orbit = KeplerianElements {
            sma: 700_000.0,
            ecc: 0.05,
            inc: 0.0,
            raan: 0.0,
            argp: 0.0,
            true_anom: 0.0,
        };
        assert_relative_eq!(
            orbit.time_to_apoapsis(MU_KERBIN),
            0.5 * orbit.period(MU_KERBIN),
            max_relative = 1e-12
        );
        let past_apo = KeplerianElements { true_anom: PI + 0.01, ..orbit };
        assert!(past_apo.time_to_apoapsis(MU_KERBIN) > 0.9 * orbit.period(MU_KERBIN));
    }

    #[test]
    fn vertical_flight_apoapsis_is_stop_height() {
        let r = R_KERBIN + 1_000.0;
        let v: f64 = 300.0;
        let pos = Vector3::new(r, 0.0, 0.0);
        let vel = Vector3::new(v, 0.0, 0.0);
        let el = KeplerianElements::from_state_vector(&pos, &vel, MU_KERBIN);
        // Energy conservation: v^2/2 - mu/r = -mu/r_stop
        let r_stop = MU_KERBIN / (MU_KERBIN / r - 0.5 * v * v);
        assert_relative_eq!(el.apoapsis_radius(), r_stop, max_relative = 1e-9);
    }

    #[test]
    fn escape_has_no_apoapsis() {
        let r = R_KERBIN + 100_000.0;
        let v = 1.5 * (2.0 * MU_KERBIN / r).sqrt();
        let el = KeplerianElements::from_state_vector(
            &Vector3::new(r, 0.0, 0.0),
            &Vector3::new(0.0, v, 0.0),
            MU_KERBIN,
        );
        assert!(el.apoapsis_radius().is_infinite());
        assert!(el.time_to_apoapsis(MU_KERBIN).is_infinite());
    }
}
