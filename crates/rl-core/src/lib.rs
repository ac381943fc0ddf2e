//! rl-core: stable foundation for regloop.
//!
//! Contains:
//! - numeric (Real + tolerances + the order-normalizing clamp)
//! - timing (monotonic clock abstraction for injectable time sources)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use timing::*;
