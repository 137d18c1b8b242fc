use serde::{Deserialize, Serialize};

use super::telemetry::ResourceKind;
use crate::physics::G0;

// ---------------------------------------------------------------------------
// Stage definition (one stage of a multi-stage launcher)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub dry_mass: f64,        // kg
    pub propellant_mass: f64, // kg, full tanks
    pub propellant: ResourceKind,
    pub thrust: f64, // N, vacuum
    pub isp: f64,    // s
    pub cd: f64,
    pub area: f64, // m^2, frontal
}

impl Stage {
    pub fn mass_flow(&self) -> f64 {
        self.thrust / (self.isp * G0)
    }

    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.propellant_mass
    }

    /// Seconds of full-thrust burning on full tanks.
    pub fn burn_time(&self) -> f64 {
        if self.thrust > 0.0 {
            self.propellant_mass / self.mass_flow()
        } else {
            0.0
        }
    }

    pub fn delta_v(&self, payload_mass: f64) -> f64 {
        let m0 = self.total_mass() + payload_mass;
        let mf = self.dry_mass + payload_mass;
        self.isp * G0 * (m0 / mf).ln()
    }

    pub fn drag_area(&self) -> f64 {
        self.cd * self.area
    }
}

// ---------------------------------------------------------------------------
// Stage builder
// ---------------------------------------------------------------------------

pub struct StageBuilder {
    name: String,
    dry_mass: f64,
    propellant_mass: f64,
    propellant: ResourceKind,
    thrust: f64,
    isp: f64,
    cd: f64,
    area: f64,
}

impl StageBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dry_mass: 1_000.0,
            propellant_mass: 4_000.0,
            propellant: ResourceKind::LiquidFuel,
            thrust: 100_000.0,
            isp: 300.0,
            cd: 0.5,
            area: 2.0,
        }
    }

    pub fn dry_mass(mut self, v: f64) -> Self { self.dry_mass = v; self }
    pub fn propellant_mass(mut self, v: f64) -> Self { self.propellant_mass = v; self }
    pub fn propellant(mut self, v: ResourceKind) -> Self { self.propellant = v; self }
    pub fn thrust(mut self, v: f64) -> Self { self.thrust = v; self }
    pub fn isp(mut self, v: f64) -> Self { self.isp = v; self }
    pub fn cd(mut self, v: f64) -> Self { self.cd = v; self }
    pub fn area(mut self, v: f64) -> Self { self.area = v; self }

    pub fn build(self) -> Stage {
        Stage {
            name: self.name,
            dry_mass: self.dry_mass,
            propellant_mass: self.propellant_mass,
            propellant: self.propellant,
            thrust: self.thrust,
            isp: self.isp,
            cd: self.cd,
            area: self.area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn burn_time_consistent_with_mass_flow() {
        let s = StageBuilder::new("S").propellant_mass(6_000.0).thrust(120_000.0).isp(340.0).build();
        assert_relative_eq!(s.burn_time() * s.mass_flow(), 6_000.0, max_relative = 1e-12);
    }

    #[test]
    fn engineless_stage_never_burns() {
        let s = StageBuilder::new("Fairing").thrust(0.0).build();
        assert_eq!(s.burn_time(), 0.0);
    }

    #[test]
    fn payload_reduces_delta_v() {
        let s = StageBuilder::new("S").build();
        assert!(s.delta_v(2_000.0) < s.delta_v(0.0));
    }
}
