use tracing::warn;

use crate::config::PidGains;

// ---------------------------------------------------------------------------
// PID Controller (single axis, measurement derivative)
// ---------------------------------------------------------------------------

/// Setpoint-tracking PID with a clamped integral.
///
/// The derivative acts on the measurement rather than the error, so changing
/// the target does not kick the output. Time comes from the caller: each
/// [`update`](Pid::update) passes the sample time in seconds.
#[derive(Debug, Clone)]
pub struct Pid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    target: f64,
    clamp: f64,
    integral: f64,
    prev_value: f64,
    prev_time: Option<f64>,
    output: f64,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            target: 0.0,
            clamp: 1.0,
            integral: 0.0,
            prev_value: 0.0,
            prev_time: None,
            output: 0.0,
        }
    }

    pub fn from_gains(gains: &PidGains) -> Self {
        Self::new(gains.kp, gains.ki, gains.kd)
    }

    pub fn set_kp(&mut self, kp: f64) {
        self.kp = kp;
    }

    pub fn set_ki(&mut self, ki: f64) {
        self.ki = ki;
    }

    pub fn set_kd(&mut self, kd: f64) {
        self.kd = kd;
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Symmetric bound on the integral term. Negative values use their magnitude.
    pub fn set_clamp(&mut self, clamp: f64) {
        self.clamp = clamp.abs();
        self.integral = self.integral.clamp(-self.clamp, self.clamp);
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn clamp(&self) -> f64 {
        self.clamp
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Feed one measurement taken at `now` and return the control output.
    ///
    /// The first sample after construction or [`reset`](Pid::reset) only
    /// establishes the time reference: no derivative, no integration.
    /// A sample with a non-advancing clock leaves the state untouched and
    /// returns the previous output.
    pub fn update(&mut self, value: f64, now: f64) -> f64 {
        let error = self.target - value;

        let Some(prev_time) = self.prev_time else {
            self.prev_time = Some(now);
            self.prev_value = value;
            self.output = self.kp * error + self.ki * self.integral;
            return self.output;
        };

        let dt = now - prev_time;
        if !(dt > 0.0) {
            warn!(dt, "PID sample without elapsed time, holding previous output");
            return self.output;
        }

        self.integral = (self.integral + error * dt).clamp(-self.clamp, self.clamp);
        let derivative = (value - self.prev_value) / dt;

        self.prev_value = value;
        self.prev_time = Some(now);

        self.output = self.kp * error + self.ki * self.integral - self.kd * derivative;
        self.output
    }

    /// Drop accumulated state and the time reference.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_value = 0.0;
        self.prev_time = None;
        self.output = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn pid_proportional() {
        let mut pid = Pid::new(1.0, 0.0, 0.0);
        pid.set_target(1.0);
        pid.update(0.5, 0.0);
        let out = pid.update(0.5, 0.1);
        assert_relative_eq!(out, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn pid_integral_accumulates() {
        let mut pid = Pid::new(0.0, 1.0, 0.0);
        pid.set_target(1.0);
        pid.update(0.0, 0.0);
        pid.update(0.0, 0.1);
        let out = pid.update(0.0, 0.2);
        assert_relative_eq!(out, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn first_sample_has_no_derivative() {
        let mut pid = Pid::new(0.0, 0.0, 1.0);
        let out = pid.update(1_000.0, 5.0);
        assert_eq!(out, 0.0);
        assert!(out.is_finite());
    }

    #[test]
    fn derivative_acts_on_measurement() {
        let mut pid = Pid::new(0.0, 0.0, 2.0);
        pid.update(10.0, 0.0);
        // Rising measurement pushes the output down.
        let out = pid.update(12.0, 0.5);
        assert_relative_eq!(out, -8.0, epsilon = 1e-12);
        // A setpoint change alone produces no derivative kick.
        pid.set_target(100.0);
        let out = pid.update(12.0, 1.0);
        assert_relative_eq!(out, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn stalled_clock_holds_output() {
        let mut pid = Pid::new(1.0, 1.0, 1.0);
        pid.set_target(5.0);
        pid.update(0.0, 1.0);
        let before = pid.update(1.0, 2.0);
        let integral = pid.integral();
        assert_eq!(pid.update(3.0, 2.0), before);
        assert_eq!(pid.update(3.0, 1.5), before);
        assert_eq!(pid.integral(), integral);
    }

    #[test]
    fn at_setpoint_proportional_is_zero_and_integral_settles() {
        let mut pid = Pid::new(1.0, 1.0, 0.0);
        pid.set_clamp(0.5);
        pid.set_target(3.0);
        pid.update(2.0, 0.0);
        for i in 1..=10 {
            pid.update(2.0, i as f64);
        }
        assert_relative_eq!(pid.integral(), 0.5);
        // Holding exactly on target: P is zero, output is the settled integral.
        let out = pid.update(3.0, 11.0);
        assert_relative_eq!(out, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn integral_never_exceeds_clamp() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let clamp = rng.random_range(0.01..100.0);
            let mut pid = Pid::new(1.0, 1.0, 1.0);
            pid.set_clamp(clamp);
            pid.set_target(rng.random_range(-1_000.0..1_000.0));
            let mut t = 0.0;
            for _ in 0..500 {
                t += rng.random_range(-0.05..2.0);
                let out = pid.update(rng.random_range(-1e4..1e4), t);
                assert!(out.is_finite());
                assert!(pid.integral().abs() <= clamp, "integral {} > clamp {}", pid.integral(), clamp);
            }
        }
    }

    #[test]
    fn shrinking_clamp_rebounds_integral() {
        let mut pid = Pid::new(0.0, 1.0, 0.0);
        pid.set_clamp(10.0);
        pid.set_target(1.0);
        pid.update(0.0, 0.0);
        pid.update(0.0, 8.0);
        assert_relative_eq!(pid.integral(), 8.0);
        pid.set_clamp(-2.0);
        assert_relative_eq!(pid.integral(), 2.0);
    }

    #[test]
    fn reset_clears_time_reference() {
        let mut pid = Pid::new(0.0, 0.0, 1.0);
        pid.update(0.0, 0.0);
        pid.reset();
        // Long gap after reset must not produce a stale derivative.
        let out = pid.update(500.0, 1_000.0);
        assert_eq!(out, 0.0);
    }
}
