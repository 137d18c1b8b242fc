use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GuidanceError, Result};

// ---------------------------------------------------------------------------
// Launch parameters
// ---------------------------------------------------------------------------

/// Mission-level launch parameters. Read-only once an ascent starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchParameters {
    pub turn_start_altitude: f64, // m
    pub turn_end_altitude: f64,   // m
    pub target_altitude: f64,     // m, apoapsis
    pub q_allow: f64,             // Pa, dynamic pressure setpoint
}

impl Default for LaunchParameters {
    fn default() -> Self {
        Self {
            turn_start_altitude: 250.0,
            turn_end_altitude: 69_000.0,
            target_altitude: 100_000.0,
            // 15 kPa is about half of what most modern launchers tolerate
            q_allow: 15_000.0,
        }
    }
}

impl LaunchParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.turn_end_altitude > self.turn_start_altitude) {
            return Err(GuidanceError::InvalidConfig(format!(
                "turn_end_altitude ({}) must be above turn_start_altitude ({})",
                self.turn_end_altitude, self.turn_start_altitude
            )));
        }
        if !(self.q_allow > 0.0) {
            return Err(GuidanceError::InvalidConfig(format!(
                "q_allow must be positive, got {}",
                self.q_allow
            )));
        }
        if !(self.target_altitude > 0.0) {
            return Err(GuidanceError::InvalidConfig(format!(
                "target_altitude must be positive, got {}",
                self.target_altitude
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Controller tuning
// ---------------------------------------------------------------------------

/// Gains for the dynamic-pressure throttle loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self { kp: 0.001, ki: 0.0001, kd: 0.01 }
    }
}

/// Throttle taper used at the end of a maneuver burn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnTuning {
    pub coarse_threshold: f64,      // m/s, full throttle above this
    pub trim_throttle: f64,         // 0..1, throttle between the thresholds
    pub fine_threshold: f64,        // m/s, cutoff
    pub pointing_tolerance_deg: f64,
}

impl Default for BurnTuning {
    fn default() -> Self {
        Self {
            coarse_threshold: 10.0,
            trim_throttle: 0.25,
            fine_threshold: 1.0,
            pointing_tolerance_deg: 1.0,
        }
    }
}

impl BurnTuning {
    pub fn validate(&self) -> Result<()> {
        if !(self.fine_threshold >= 0.0 && self.fine_threshold < self.coarse_threshold) {
            return Err(GuidanceError::InvalidConfig(format!(
                "burn thresholds must satisfy 0 <= fine ({}) < coarse ({})",
                self.fine_threshold, self.coarse_threshold
            )));
        }
        if !(self.trim_throttle > 0.0 && self.trim_throttle <= 1.0) {
            return Err(GuidanceError::InvalidConfig(format!(
                "trim_throttle must be in (0, 1], got {}",
                self.trim_throttle
            )));
        }
        if !(self.pointing_tolerance_deg > 0.0) {
            return Err(GuidanceError::InvalidConfig(format!(
                "pointing_tolerance_deg must be positive, got {}",
                self.pointing_tolerance_deg
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Full guidance configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub launch: LaunchParameters,
    pub throttle_pid: PidGains,
    pub burn: BurnTuning,
    pub tick_period_s: f64,
    /// Altitude where the atmosphere ends for the orbited body, m.
    pub atmosphere_altitude: f64,
    pub countdown_s: u32,
    pub liftoff_settle_s: f64,
    pub heading_deg: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            launch: LaunchParameters::default(),
            throttle_pid: PidGains::default(),
            burn: BurnTuning::default(),
            tick_period_s: 0.1,
            atmosphere_altitude: 70_000.0, // Kerbin
            countdown_s: 3,
            liftoff_settle_s: 0.5,
            heading_deg: 90.0,
        }
    }
}

impl GuidanceConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GuidanceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.launch.validate()?;
        self.burn.validate()?;
        // The turn only ends once apoapsis can be raised past both of these;
        // a lower target cuts throttle inside the turn band for good.
        let floor = self.launch.turn_end_altitude.max(self.atmosphere_altitude);
        if !(self.launch.target_altitude > floor) {
            return Err(GuidanceError::InvalidConfig(format!(
                "target_altitude ({}) must be above the turn end and the atmosphere ({floor})",
                self.launch.target_altitude
            )));
        }
        if !(self.tick_period_s > 0.0) {
            return Err(GuidanceError::InvalidConfig(format!(
                "tick_period_s must be positive, got {}",
                self.tick_period_s
            )));
        }
        self.tick()?;
        self.liftoff_settle()?;
        Ok(())
    }

    /// Polling period of every control loop.
    pub fn tick(&self) -> Result<Duration> {
        seconds("tick_period_s", self.tick_period_s)
    }

    pub fn liftoff_settle(&self) -> Result<Duration> {
        seconds("liftoff_settle_s", self.liftoff_settle_s)
    }
}

fn seconds(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|err| GuidanceError::InvalidConfig(format!("{name} = {secs}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GuidanceConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_turn_band_rejected() {
        let mut config = GuidanceConfig::default();
        config.launch.turn_end_altitude = config.launch.turn_start_altitude;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GuidanceError::InvalidConfig(_)));
    }

    #[test]
    fn non_positive_q_allow_rejected() {
        let params = LaunchParameters { q_allow: 0.0, ..Default::default() };
        assert!(params.validate().is_err());
        let params = LaunchParameters { q_allow: f64::NAN, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = GuidanceConfig::from_json_str(
            r#"{ "launch": { "q_allow": 20000.0 }, "tick_period_s": 0.05 }"#,
        )
        .unwrap();
        assert_eq!(config.launch.q_allow, 20_000.0);
        assert_eq!(config.launch.turn_start_altitude, 250.0);
        assert_eq!(config.tick_period_s, 0.05);
        assert_eq!(config.burn, BurnTuning::default());
    }

    #[test]
    fn invalid_json_config_rejected() {
        let err = GuidanceConfig::from_json_str(
            r#"{ "launch": { "turn_start_altitude": 5000.0, "turn_end_altitude": 1000.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GuidanceError::InvalidConfig(_)));
    }

    #[test]
    fn burn_taper_must_be_ordered() {
        let tuning = BurnTuning { fine_threshold: 20.0, ..Default::default() };
        assert!(tuning.validate().is_err());
        let tuning = BurnTuning { trim_throttle: 1.5, ..Default::default() };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn target_below_turn_end_or_atmosphere_rejected() {
        let mut config = GuidanceConfig::default();
        config.launch.target_altitude = 60_000.0;
        assert!(matches!(config.validate(), Err(GuidanceError::InvalidConfig(_))));

        // Above the turn end but still inside the atmosphere
        config.launch.turn_end_altitude = 45_000.0;
        config.launch.target_altitude = config.atmosphere_altitude;
        assert!(matches!(config.validate(), Err(GuidanceError::InvalidConfig(_))));

        config.launch.target_altitude = config.atmosphere_altitude + 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn durations_out_of_range_rejected() {
        let config = GuidanceConfig { tick_period_s: 1e20, ..Default::default() };
        assert!(matches!(config.tick(), Err(GuidanceError::InvalidConfig(_))));
        assert!(config.validate().is_err());

        let config = GuidanceConfig { liftoff_settle_s: f64::INFINITY, ..Default::default() };
        assert!(config.validate().is_err());
        let config = GuidanceConfig { liftoff_settle_s: -0.5, ..Default::default() };
        assert!(config.validate().is_err());

        let config = GuidanceConfig { liftoff_settle_s: 0.0, ..Default::default() };
        assert_eq!(config.liftoff_settle().unwrap(), Duration::ZERO);
    }
}
