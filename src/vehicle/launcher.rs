use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::stage::{Stage, StageBuilder};
use crate::error::{GuidanceError, Result};

// ---------------------------------------------------------------------------
// Launcher: stages in firing order, first stage first
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launcher {
    pub name: String,
    pub stages: Vec<Stage>,
}

impl Launcher {
    /// Total wet mass of all stages combined.
    pub fn total_mass(&self) -> f64 {
        self.stages.iter().map(|s| s.total_mass()).sum()
    }

    /// Total ideal delta-v (each stage computed with upper stages as payload).
    pub fn total_delta_v(&self) -> f64 {
        (0..self.stages.len())
            .map(|i| {
                let payload: f64 = self.stages[i + 1..].iter().map(|s| s.total_mass()).sum();
                self.stages[i].delta_v(payload)
            })
            .sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(GuidanceError::InvalidConfig(format!("launcher {} has no stages", self.name)));
        }
        for stage in &self.stages {
            let positive = [stage.dry_mass, stage.isp];
            let non_negative = [stage.propellant_mass, stage.thrust, stage.cd, stage.area];
            if !positive.iter().all(|v| *v > 0.0 && v.is_finite())
                || !non_negative.iter().all(|v| *v >= 0.0 && v.is_finite())
            {
                return Err(GuidanceError::InvalidConfig(format!(
                    "stage {} has a non-physical mass, thrust, Isp or drag figure",
                    stage.name
                )));
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let launcher: Launcher = serde_json::from_str(&fs::read_to_string(path)?)?;
        launcher.validate()?;
        Ok(launcher)
    }
}

// ---------------------------------------------------------------------------
// Launcher builder
// ---------------------------------------------------------------------------

pub struct LauncherBuilder {
    name: String,
    stages: Vec<Stage>,
}

impl LauncherBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), stages: vec![] }
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn build(self) -> Launcher {
        Launcher { name: self.name, stages: self.stages }
    }
}

// ---------------------------------------------------------------------------
// Preset launchers
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Two-stage liquid launcher sized for a ~100 km orbit around Kerbin.
    pub fn two_stage_orbital() -> Launcher {
        LauncherBuilder::new("Two-stage orbital")
            .stage(
                StageBuilder::new("S1-Booster")
                    .dry_mass(4_000.0)
                    .propellant_mass(24_000.0)
                    .thrust(500_000.0)
                    .isp(290.0)
                    .cd(0.5)
                    .area(2.0)
                    .build(),
            )
            .stage(
                StageBuilder::new("S2-Upper")
                    .dry_mass(1_500.0)
                    .propellant_mass(6_000.0)
                    .thrust(120_000.0)
                    .isp(340.0)
                    .cd(0.5)
                    .area(2.0)
                    .build(),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_is_valid_and_orbit_capable() {
        let l = presets::two_stage_orbital();
        assert!(l.validate().is_ok());
        assert_eq!(l.stages.len(), 2);
        assert!((l.total_mass() - 35_500.0).abs() < 1e-9);
        // Low Kerbin orbit needs roughly 3.4 km/s including losses
        assert!(l.total_delta_v() > 3_400.0, "got {}", l.total_delta_v());
    }

    #[test]
    fn empty_launcher_rejected() {
        let l = LauncherBuilder::new("Nothing").build();
        assert!(matches!(l.validate(), Err(GuidanceError::InvalidConfig(_))));
    }

    #[test]
    fn negative_thrust_rejected() {
        let l = LauncherBuilder::new("Bad")
            .stage(StageBuilder::new("S").thrust(-1.0).build())
            .build();
        assert!(l.validate().is_err());
    }

    #[test]
    fn launcher_round_trips_through_json() {
        let l = presets::two_stage_orbital();
        let json = serde_json::to_string(&l).unwrap();
        assert!(json.contains("\"LiquidFuel\""));
        let back: Launcher = serde_json::from_str(&json).unwrap();
        assert_eq!(back, l);
    }
}
