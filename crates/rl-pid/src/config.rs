//! Controller configuration.
//!
//! A [`PidConfig`] is the immutable half of a controller: gains, filter and
//! timing settings, output limits, and telemetry wiring. Construction merges
//! caller overrides over documented defaults, either through the builder
//! methods or by deserializing a JSON map (missing keys take defaults,
//! unrecognized keys are rejected).

use crate::error::PidResult;
use rl_core::{CoreError, ensure_finite};
use serde::{Deserialize, Serialize};

/// PID controller configuration.
///
/// Output limits are kept normalized (`output_min <= output_max`) by every
/// construction path; supplying them reversed swaps them rather than failing.
/// Gains are not validated: negative or zero gains are legitimate in
/// specialized applications, and callers wanting strict finiteness checks opt
/// in via [`validate`](PidConfig::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PidConfig {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Derivative low-pass filter coefficient in [0, 1].
    /// 1.0 passes the raw derivative through; 0.0 freezes it.
    pub tau: f64,
    /// Nominal time step per call (seconds), used whenever elapsed time is
    /// not measured externally.
    pub t: f64,
    /// Minimum output value.
    pub output_min: f64,
    /// Maximum output value.
    pub output_max: f64,
    /// Measure the time step from the injected monotonic clock instead of
    /// using the configured `t`.
    ///
    /// The first step has no previous reading to measure from and falls back
    /// to the configured `t`; this bootstrap is intentional.
    pub use_external_t: bool,
    /// Suppress the derivative spike on set-point changes by computing that
    /// step's derivative against the current error.
    pub zero_d_on_set_point_change: bool,
    /// Emit a telemetry record after each step (requires a sink).
    pub telemetry_enabled: bool,
    /// Channel identifier passed to the telemetry sink.
    pub telemetry_channel: String,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            tau: 1.0,
            t: 1.0,
            output_min: -1.0,
            output_max: 1.0,
            use_external_t: false,
            zero_d_on_set_point_change: false,
            telemetry_enabled: false,
            telemetry_channel: "pid".to_string(),
        }
    }
}

impl PidConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON map, merging over defaults.
    ///
    /// Missing keys take their documented defaults. Unrecognized keys are
    /// rejected, so a typo can never silently corrupt a recognized setting.
    ///
    /// # Errors
    ///
    /// Returns [`PidError::Config`](crate::PidError::Config) on malformed
    /// JSON or unrecognized keys.
    pub fn from_json(json: &str) -> PidResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Set the proportional gain.
    pub fn with_kp(mut self, kp: f64) -> Self {
        self.kp = kp;
        self
    }

    /// Set the integral gain.
    pub fn with_ki(mut self, ki: f64) -> Self {
        self.ki = ki;
        self
    }

    /// Set the derivative gain.
    pub fn with_kd(mut self, kd: f64) -> Self {
        self.kd = kd;
        self
    }

    /// Set the derivative filter coefficient (1.0 = no filtering).
    pub fn with_tau(mut self, tau: f64) -> Self {
        self.tau = tau;
        self
    }

    /// Set the nominal time step in seconds.
    pub fn with_time_step(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    /// Set the output limits, normalizing order if given reversed.
    pub fn with_output_limits(mut self, min: f64, max: f64) -> Self {
        self.output_min = min;
        self.output_max = max;
        self.normalized()
    }

    /// Measure the time step from the injected clock each step.
    pub fn with_external_time(mut self) -> Self {
        self.use_external_t = true;
        self
    }

    /// Suppress the derivative spike on set-point changes.
    pub fn with_zero_d_on_set_point_change(mut self) -> Self {
        self.zero_d_on_set_point_change = true;
        self
    }

    /// Enable telemetry emission under the given channel identifier.
    pub fn with_telemetry(mut self, channel: impl Into<String>) -> Self {
        self.telemetry_enabled = true;
        self.telemetry_channel = channel.into();
        self
    }

    /// Restore the `output_min <= output_max` invariant by swapping the
    /// limits if needed.
    pub fn normalized(mut self) -> Self {
        if self.output_min > self.output_max {
            std::mem::swap(&mut self.output_min, &mut self.output_max);
        }
        self
    }

    /// Opt-in strict validation: rejects non-finite numeric settings and a
    /// filter coefficient outside [0, 1].
    ///
    /// Never called implicitly; the step computation accepts any reals and
    /// lets non-finite values propagate.
    pub fn validate(&self) -> PidResult<()> {
        ensure_finite(self.kp, "kp")?;
        ensure_finite(self.ki, "ki")?;
        ensure_finite(self.kd, "kd")?;
        ensure_finite(self.tau, "tau")?;
        ensure_finite(self.t, "t")?;
        ensure_finite(self.output_min, "output_min")?;
        ensure_finite(self.output_max, "output_max")?;
        if !(0.0..=1.0).contains(&self.tau) {
            return Err(CoreError::InvalidArg {
                what: "tau must be within [0, 1]",
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documentation() {
        let config = PidConfig::default();
        assert_eq!(config.kp, 0.0);
        assert_eq!(config.ki, 0.0);
        assert_eq!(config.kd, 0.0);
        assert_eq!(config.tau, 1.0);
        assert_eq!(config.t, 1.0);
        assert_eq!(config.output_min, -1.0);
        assert_eq!(config.output_max, 1.0);
        assert!(!config.use_external_t);
        assert!(!config.zero_d_on_set_point_change);
        assert!(!config.telemetry_enabled);
        assert_eq!(config.telemetry_channel, "pid");
    }

    #[test]
    fn builder_merges_over_defaults() {
        let config = PidConfig::new().with_kp(0.25).with_time_step(2.0);
        assert_eq!(config.kp, 0.25);
        assert_eq!(config.t, 2.0);
        // untouched fields keep their defaults
        assert_eq!(config.ki, 0.0);
        assert_eq!(config.output_max, 1.0);
    }

    #[test]
    fn reversed_limits_are_swapped() {
        let config = PidConfig::new().with_output_limits(1.0, -0.5);
        assert_eq!(config.output_min, -0.5);
        assert_eq!(config.output_max, 1.0);
    }

    #[test]
    fn json_partial_map_takes_defaults() {
        let config = PidConfig::from_json(r#"{"kp": 0.25, "output_max": 1.5}"#).unwrap();
        assert_eq!(config.kp, 0.25);
        assert_eq!(config.output_max, 1.5);
        assert_eq!(config.ki, 0.0);
        assert_eq!(config.t, 1.0);
    }

    #[test]
    fn json_unknown_key_is_rejected() {
        let err = PidConfig::from_json(r#"{"kpp": 0.25}"#);
        assert!(err.is_err());
    }

    #[test]
    fn json_reversed_limits_are_normalized() {
        let config = PidConfig::from_json(r#"{"output_min": 2.0, "output_max": -2.0}"#).unwrap();
        assert_eq!(config.output_min, -2.0);
        assert_eq!(config.output_max, 2.0);
    }

    #[test]
    fn validate_accepts_negative_gains() {
        let config = PidConfig::new().with_kp(-5.0).with_ki(-0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_and_bad_tau() {
        assert!(PidConfig::new().with_kp(f64::NAN).validate().is_err());
        assert!(PidConfig::new().with_tau(1.5).validate().is_err());
    }
}
