use crate::prelude::ModelResult;
use serde::{Deserialize, Serialize};

/// Seismic phases a reference travel-time model can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    P,
    Pp,
    Sp,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::P => "P",
            Phase::Pp => "pP",
            Phase::Sp => "sP",
        }
    }
}

/// Seam to an external phase travel-time table.
///
/// The core never consumes reference values for its own outputs; the driver's
/// comparison workflow does, and tests substitute stubs.
pub trait ReferenceModel {
    /// Travel times in seconds for the requested phases at the given source
    /// depth and epicentral distance, in request order.
    fn reference_times(
        &self,
        depth_km: f64,
        distance_deg: f64,
        phases: &[Phase],
    ) -> ModelResult<Vec<f64>>;
}
