use crate::geo::{Source, Station, EARTH_RADIUS_KM};
use crate::prelude::ModelResult;
use crate::traveltime::velocity::VelocityModel;
use serde::{Deserialize, Serialize};

/// Absolute travel times in seconds since origin for one source/station pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseArrivals {
    pub p_s: f64,
    pub pp_s: f64,
    pub sp_s: f64,
}

impl PhaseArrivals {
    /// pP - P delay, diagnostic of source depth.
    pub fn delta_pp(&self) -> f64 {
        self.pp_s - self.p_s
    }

    /// sP - P delay.
    pub fn delta_sp(&self) -> f64 {
        self.sp_s - self.p_s
    }
}

/// Straight-ray travel times through a layered spherical Earth.
///
/// The direct P ray follows the chord between hypocenter and station at the
/// depth-averaged P velocity along that chord. Depth phases take a vertical
/// leg from the hypocenter to the surface point above it (P velocity for pP,
/// S for sP), reflect, and continue along the epicenter-to-station direct
/// ray. At zero depth both reflections collapse onto the direct arrival.
pub struct TravelTimeCalculator {
    model: VelocityModel,
}

impl TravelTimeCalculator {
    pub fn new(model: VelocityModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &VelocityModel {
        &self.model
    }

    pub fn arrivals(&self, source: &Source, station: &Station) -> ModelResult<PhaseArrivals> {
        self.model.validate_depth_m(source.depth_m)?;
        let depth_km = source.depth_km();
        let delta_deg = source.epicentral_distance_deg(station);

        let p_s = self.direct_time_s(depth_km, delta_deg);
        let onward_s = self.direct_time_s(0.0, delta_deg);
        let pp_s = self.model.vertical_time_s(depth_km, false) + onward_s;
        let sp_s = self.model.vertical_time_s(depth_km, true) + onward_s;

        Ok(PhaseArrivals { p_s, pp_s, sp_s })
    }

    /// Chord travel time from a point at `depth_km` to a surface point
    /// `delta_deg` away. A zero-length chord returns 0.0.
    fn direct_time_s(&self, depth_km: f64, delta_deg: f64) -> f64 {
        let r_source = EARTH_RADIUS_KM - depth_km;
        let r_surface = EARTH_RADIUS_KM;
        let cos_delta = delta_deg.to_radians().cos();
        let chord_km = (r_source * r_source + r_surface * r_surface
            - 2.0 * r_source * r_surface * cos_delta)
            .max(0.0)
            .sqrt();
        if chord_km == 0.0 {
            return 0.0;
        }
        // The chord's deepest point is either the hypocenter or its sagitta.
        let mid_radius_km = 0.5
            * (r_source * r_source + r_surface * r_surface
                + 2.0 * r_source * r_surface * cos_delta)
                .max(0.0)
                .sqrt();
        let deepest_km = depth_km.max(EARTH_RADIUS_KM - mid_radius_km);
        chord_km / self.model.mean_velocity_km_s(deepest_km, false)
    }
}
