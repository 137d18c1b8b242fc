use nalgebra::Vector3;

use crate::physics::atmosphere::Atmo;

/// Dynamic pressure q = rho * v^2 / 2 (Pa).
pub fn dynamic_pressure(atm: &Atmo, speed: f64) -> f64 {
    0.5 * atm.density * speed * speed
}

/// Compute aerodynamic drag force (inertial frame, opposing velocity).
pub fn drag_force(vel: &Vector3<f64>, atm: &Atmo, cd_area: f64) -> Vector3<f64> {
    let speed = vel.norm();
    if speed > 1e-6 {
        let drag_mag = dynamic_pressure(atm, speed) * cd_area;
        -vel.normalize() * drag_mag
    } else {
        Vector3::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::atmosphere::Atmosphere;

    #[test]
    fn drag_opposes_velocity() {
        let vel = Vector3::new(0.0, 300.0, 0.0);
        let atm = Atmosphere::kerbin().at(0.0);
        let f = drag_force(&vel, &atm, 1.0);
        assert!(f.y < 0.0, "Drag should oppose velocity");
        assert!((f.norm() - dynamic_pressure(&atm, 300.0)).abs() < 1e-9);
    }

    #[test]
    fn no_drag_at_rest() {
        let atm = Atmosphere::kerbin().at(0.0);
        let f = drag_force(&Vector3::zeros(), &atm, 1.0);
        assert!(f.norm() < 1e-10);
    }
}
