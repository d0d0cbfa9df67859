//! Travel-time geometry and synthetic depth-phase signal core.
//!
//! The crate generates training examples for source-depth regression: a
//! layered-Earth travel-time calculator produces P/pP/sP arrivals, and the
//! signal pipeline turns those delays into aligned, normalized per-station
//! envelope traces assembled into a fixed-shape matrix.

pub mod geo;
pub mod math;
pub mod prelude;
pub mod scenario;
pub mod signal;
pub mod telemetry;
pub mod traveltime;

pub use prelude::{TraceConfig, TraceInput, TraceOutput, TraceStage};
