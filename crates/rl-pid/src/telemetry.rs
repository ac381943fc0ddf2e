//! Telemetry sink abstraction.
//!
//! A controller with telemetry enabled notifies a sink after each step with a
//! fixed-shape record of that step's signals and terms. Emission is
//! fire-and-forget: the sink's signature is infallible, the controller does
//! not depend on its outcome, and a sink must not panic.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::debug;

/// One step's worth of controller signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub set_point: f64,
    pub measurement: f64,
    pub error: f64,
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub t: f64,
    pub output: f64,
}

/// Receives telemetry records emitted by a controller.
///
/// Implementations must be non-blocking and must not panic; delivery failures
/// are the sink's problem and must never reach the control computation.
pub trait TelemetrySink {
    /// Deliver one record under the configured channel identifier.
    fn emit(&self, channel: &str, record: &TelemetryRecord);
}

// Shared handles are sinks too, so tests and dashboards can keep a reading
// end while the controller owns the writing end.
impl<T: TelemetrySink + ?Sized> TelemetrySink for std::sync::Arc<T> {
    fn emit(&self, channel: &str, record: &TelemetryRecord) {
        (**self).emit(channel, record);
    }
}

/// Sink that forwards records as `tracing` debug events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn emit(&self, channel: &str, record: &TelemetryRecord) {
        debug!(
            channel,
            set_point = record.set_point,
            measurement = record.measurement,
            error = record.error,
            p = record.p,
            i = record.i,
            d = record.d,
            t = record.t,
            output = record.output,
            "pid telemetry"
        );
    }
}

/// Sink that captures records in memory, for tests and offline analysis.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(String, TelemetryRecord)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything captured so far.
    ///
    /// A poisoned mutex yields an empty snapshot rather than a panic; the
    /// sink contract forbids failures from escaping.
    pub fn records(&self) -> Vec<(String, TelemetryRecord)> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl TelemetrySink for MemorySink {
    fn emit(&self, channel: &str, record: &TelemetryRecord) {
        if let Ok(mut guard) = self.records.lock() {
            guard.push((channel.to_string(), *record));
        }
    }
}
