//! The PID state-update operation.
//!
//! One [`step`] per sensor/actuator cycle:
//! 1. Resolve the effective time step (configured, or measured from the clock)
//! 2. Compute P from the current error
//! 3. Compute D from the error delta, low-pass filtered
//! 4. Accumulate I, clamped to the output limits (anti-windup)
//! 5. Clamp the summed output and commit the new state
//!
//! The computation itself is a pure state transition
//! ([`PidConfig::advance`]); [`PidController`] wraps it with the injected
//! clock and the optional telemetry emission.
//!
//! [`step`]: PidController::step

use crate::config::PidConfig;
use crate::telemetry::{TelemetryRecord, TelemetrySink};
use rl_core::{MonotonicClock, SystemClock, clamp, elapsed_seconds};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::trace;

/// Floor on the derivative divisor, preventing blow-up when the effective
/// time step is extremely small or zero.
pub const MIN_DERIVATIVE_DT: f64 = 0.001;

/// Running controller state, advanced exactly once per step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    /// Last computed proportional term.
    pub p: f64,
    /// Last computed integral term, always within the output limits.
    pub i: f64,
    /// Last computed (filtered) derivative term.
    pub d: f64,
    /// Last effective time step used (seconds).
    pub t: f64,
    /// Error from the previous step; `None` until the first step.
    pub last_error: Option<f64>,
    /// Measurement from the previous step.
    pub last_measurement: f64,
    /// Set-point from the previous step.
    pub last_set_point: f64,
    /// Last clamped output, always within the output limits.
    pub output: f64,
    /// Clock reading from the previous step; only populated when the time
    /// step is measured externally. Not serialized (instants are opaque).
    #[serde(skip)]
    pub last_time: Option<Instant>,
}

impl Default for PidState {
    fn default() -> Self {
        Self {
            p: 0.0,
            i: 0.0,
            d: 0.0,
            t: 0.0,
            last_error: None,
            last_measurement: 0.0,
            last_set_point: 0.0,
            output: 0.0,
            last_time: None,
        }
    }
}

impl PidConfig {
    /// Advance controller state by one step.
    ///
    /// Pure with respect to its arguments: `now` is the clock reading for
    /// this step (`None` when the time step is not measured externally), so
    /// the same inputs always produce the same state.
    ///
    /// # Arguments
    ///
    /// * `state` - State from the previous step (or `Default` before any)
    /// * `set_point` - Desired target value
    /// * `measurement` - Current observed value
    /// * `now` - Monotonic clock reading, when external timing is enabled
    ///
    /// # Returns
    ///
    /// The committed state for this step; `state.output` is the actuation
    /// value, clamped to the output limits.
    pub fn advance(
        &self,
        state: &PidState,
        set_point: f64,
        measurement: f64,
        now: Option<Instant>,
    ) -> PidState {
        // Effective time step. Without a previous clock reading there is
        // nothing to measure against, so the very first externally-timed step
        // falls back to the configured nominal value.
        let t = if self.use_external_t {
            match (state.last_time, now) {
                (Some(previous), Some(current)) => elapsed_seconds(previous, current),
                _ => self.t,
            }
        } else {
            self.t
        };

        // Error: e = sp - pv (positive error means PV is below set-point)
        let error = set_point - measurement;

        // Proportional term
        let p = self.kp * error;

        // Derivative reference error. The derivative starts at zero by
        // construction on the first step; on a set-point change the reference
        // is optionally forced to the current error so the jump in error does
        // not spike the derivative.
        let reference_error = match state.last_error {
            None => error,
            Some(_) if self.zero_d_on_set_point_change && set_point != state.last_set_point => {
                error
            }
            Some(previous) => previous,
        };

        // Derivative term, low-pass filtered. tau = 1.0 passes the raw value
        // through; tau = 0.0 freezes the term at its previous value.
        let d_raw = self.kd * (error - reference_error) / t.max(MIN_DERIVATIVE_DT);
        let d = state.d + self.tau * (d_raw - state.d);

        // Integral term with anti-windup: the accumulator itself is clamped
        // to the output limits so it cannot run away during saturation.
        let i = clamp(
            state.i + self.ki * error * t,
            self.output_min,
            self.output_max,
        );

        let output = clamp(p + d + i, self.output_min, self.output_max);

        PidState {
            p,
            i,
            d,
            t,
            last_error: Some(error),
            last_measurement: measurement,
            last_set_point: set_point,
            output,
            last_time: if self.use_external_t { now } else { None },
        }
    }
}

/// A PID controller: configuration, running state, injected clock, and an
/// optional telemetry sink.
///
/// One instance per control loop. Stepping takes `&mut self`; callers running
/// multiple loops hold one instance each, and concurrent access to a single
/// instance must be serialized externally.
///
/// # Example
///
/// ```
/// use rl_pid::{PidConfig, PidController};
///
/// let config = PidConfig::new().with_kp(0.25);
/// let mut controller = PidController::new(config);
///
/// let output = controller.step(1.0, 0.0);
/// assert!((output - 0.25).abs() < 1e-12);
/// ```
pub struct PidController<C: MonotonicClock = SystemClock> {
    config: PidConfig,
    state: PidState,
    clock: C,
    sink: Option<Box<dyn TelemetrySink>>,
}

impl PidController<SystemClock> {
    /// Create a controller on the process monotonic clock, with
    /// zero-initialized state.
    pub fn new(config: PidConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: MonotonicClock> PidController<C> {
    /// Create a controller on an explicit clock (e.g. a manual clock in
    /// tests).
    pub fn with_clock(config: PidConfig, clock: C) -> Self {
        let config = config.normalized();
        trace!(
            kp = config.kp,
            ki = config.ki,
            kd = config.kd,
            tau = config.tau,
            t = config.t,
            output_min = config.output_min,
            output_max = config.output_max,
            "pid controller created"
        );
        Self {
            config,
            state: PidState::default(),
            clock,
            sink: None,
        }
    }

    /// Install a telemetry sink. Records are only emitted when the
    /// configuration also has telemetry enabled.
    pub fn with_telemetry(mut self, sink: impl TelemetrySink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Advance the controller by one cycle and return the clamped output.
    ///
    /// Reads the clock once when external timing is enabled, then performs
    /// the pure state transition and, if telemetry is enabled and a sink is
    /// installed, emits a best-effort record of this step.
    pub fn step(&mut self, set_point: f64, measurement: f64) -> f64 {
        let now = if self.config.use_external_t {
            Some(self.clock.now())
        } else {
            None
        };

        let state = self.config.advance(&self.state, set_point, measurement, now);
        trace!(
            set_point,
            measurement,
            p = state.p,
            i = state.i,
            d = state.d,
            t = state.t,
            output = state.output,
            "pid step"
        );

        if self.config.telemetry_enabled {
            if let Some(sink) = &self.sink {
                sink.emit(
                    &self.config.telemetry_channel,
                    &TelemetryRecord {
                        set_point,
                        measurement,
                        error: set_point - measurement,
                        p: state.p,
                        i: state.i,
                        d: state.d,
                        t: state.t,
                        output: state.output,
                    },
                );
            }
        }

        self.state = state;
        self.state.output
    }

    /// Zero the running state without touching the configuration.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }

    /// Current controller state (terms, last signals, output).
    pub fn state(&self) -> &PidState {
        &self.state
    }

    /// The controller's configuration.
    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// The injected clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn output_and_integral_stay_within_limits(
            kp in -1e6_f64..1e6_f64,
            ki in -1e6_f64..1e6_f64,
            kd in -1e6_f64..1e6_f64,
            set_point in -1e9_f64..1e9_f64,
            measurement in -1e9_f64..1e9_f64,
            steps in 1usize..20,
        ) {
            let config = PidConfig::new().with_kp(kp).with_ki(ki).with_kd(kd);
            let mut controller = PidController::new(config);
            for _ in 0..steps {
                let output = controller.step(set_point, measurement);
                prop_assert!((-1.0..=1.0).contains(&output));
                prop_assert!((-1.0..=1.0).contains(&controller.state().i));
            }
        }
    }
}
