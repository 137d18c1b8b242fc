use nalgebra::Vector3;

use crate::physics::atmosphere::Atmosphere;

/// Standard gravity used to convert specific impulse to exhaust velocity, m/s^2.
pub const G0: f64 = 9.81;

/// A spherical, non-rotating body.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub mu: f64,     // m^3/s^2
    pub radius: f64, // m
    pub atmosphere: Atmosphere,
}

impl Body {
    pub fn kerbin() -> Self {
        Self {
            name: "Kerbin".into(),
            mu: 3.5316e12,
            radius: 600_000.0,
            atmosphere: Atmosphere::kerbin(),
        }
    }

    /// Point-mass gravitational acceleration at `pos` (body-centered inertial).
    pub fn gravity_accel(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        let r = pos.norm();
        if r < 1.0 {
            return Vector3::zeros();
        }
        -self.mu / (r * r * r) * pos
    }

    pub fn altitude(&self, pos: &Vector3<f64>) -> f64 {
        pos.norm() - self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_gravity() {
        let kerbin = Body::kerbin();
        let g = kerbin.gravity_accel(&Vector3::new(kerbin.radius, 0.0, 0.0));
        assert!((g.x + 9.81).abs() < 1e-3);
    }

    #[test]
    fn gravity_decreases_with_altitude() {
        let kerbin = Body::kerbin();
        let g0 = kerbin.gravity_accel(&Vector3::new(kerbin.radius, 0.0, 0.0)).norm();
        let g100k = kerbin.gravity_accel(&Vector3::new(kerbin.radius + 100_000.0, 0.0, 0.0)).norm();
        assert!(g100k < g0);
    }
}
