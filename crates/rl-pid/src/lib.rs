//! Discrete-time PID control for regloop.
//!
//! This crate provides a sampled PID (Proportional-Integral-Derivative)
//! controller intended for embedded closed-loop control: one [`step`] per
//! sensor/actuator cycle, producing a bounded actuation output.
//!
//! # Architecture
//!
//! - Configuration ([`PidConfig`]) is immutable per controller and built by
//!   merging overrides over documented defaults (builder or JSON map)
//! - State ([`PidState`]) is advanced purely by the step computation
//! - The stateful wrapper ([`PidController`]) owns config, state, an injected
//!   monotonic clock, and an optional telemetry sink
//!
//! # Design Principles
//!
//! - **Bounded output**: integral anti-windup and output clamping keep the
//!   integral term and the output inside the configured limits on every step
//! - **Filtered derivative**: a first-order low-pass suppresses noise
//!   amplification in the derivative term
//! - **Injected collaborators**: time and telemetry are capabilities passed
//!   in, so stepping is deterministic under a fake clock and telemetry can
//!   never interrupt the control computation
//!
//! [`step`]: PidController::step

pub mod config;
pub mod error;
pub mod pid;
pub mod telemetry;

pub use config::PidConfig;
pub use error::{PidError, PidResult};
pub use pid::{MIN_DERIVATIVE_DT, PidController, PidState};
pub use telemetry::{MemorySink, TelemetryRecord, TelemetrySink, TracingSink};
