use serde::{Deserialize, Serialize};

/// Mean Earth radius of the spherical model, kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Hypocenter of a synthetic event. Depth is in meters, positive down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub depth_m: f64,
}

/// Surface receiver location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl Source {
    pub fn depth_km(&self) -> f64 {
        self.depth_m / 1000.0
    }

    /// Great-circle distance from the epicenter to a station, degrees.
    pub fn epicentral_distance_deg(&self, station: &Station) -> f64 {
        epicentral_distance_deg(self.lat_deg, self.lon_deg, station.lat_deg, station.lon_deg)
    }

    /// Straight-line distance from the hypocenter to a station, kilometers.
    pub fn direct_distance_km(&self, station: &Station) -> f64 {
        chord_distance_km(
            self.lat_deg,
            self.lon_deg,
            self.depth_km(),
            station.lat_deg,
            station.lon_deg,
            0.0,
        )
    }
}

/// Haversine central angle between two surface points, degrees.
pub fn epicentral_distance_deg(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let d_lat = (lat2_deg - lat1_deg).to_radians();
    let d_lon = (lon2_deg - lon1_deg).to_radians();
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let central = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    central.to_degrees()
}

/// Haversine surface distance between two surface points, kilometers.
pub fn epicentral_distance_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    epicentral_distance_deg(lat1_deg, lon1_deg, lat2_deg, lon2_deg).to_radians() * EARTH_RADIUS_KM
}

/// Straight-line distance through the Earth between two points at depth,
/// kilometers. Coincident points return 0.0.
pub fn chord_distance_km(
    lat1_deg: f64,
    lon1_deg: f64,
    depth1_km: f64,
    lat2_deg: f64,
    lon2_deg: f64,
    depth2_km: f64,
) -> f64 {
    let (x1, y1, z1) = cartesian(lat1_deg, lon1_deg, EARTH_RADIUS_KM - depth1_km);
    let (x2, y2, z2) = cartesian(lat2_deg, lon2_deg, EARTH_RADIUS_KM - depth2_km);
    ((x1 - x2).powi(2) + (y1 - y2).powi(2) + (z1 - z2).powi(2)).sqrt()
}

fn cartesian(lat_deg: f64, lon_deg: f64, radius_km: f64) -> (f64, f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    (
        radius_km * lat.cos() * lon.cos(),
        radius_km * lat.cos() * lon.sin(),
        radius_km * lat.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_along_meridian() {
        let deg = epicentral_distance_deg(0.0, 0.0, 1.0, 0.0);
        assert!((deg - 1.0).abs() < 1e-9);
        let km = epicentral_distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((km - EARTH_RADIUS_KM.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn coincident_points_have_zero_distance() {
        assert_eq!(epicentral_distance_deg(12.0, 45.0, 12.0, 45.0), 0.0);
        assert_eq!(chord_distance_km(12.0, 45.0, 0.0, 12.0, 45.0, 0.0), 0.0);
    }

    #[test]
    fn chord_reduces_to_depth_for_vertical_pairs() {
        let d = chord_distance_km(10.0, 20.0, 50.0, 10.0, 20.0, 0.0);
        assert!((d - 50.0).abs() < 1e-9);
    }

    #[test]
    fn source_distance_helpers_agree_with_free_functions() {
        let source = Source {
            lat_deg: 0.0,
            lon_deg: 0.0,
            depth_m: 50_000.0,
        };
        let station = Station {
            lat_deg: 10.0,
            lon_deg: 0.0,
        };
        assert!((source.epicentral_distance_deg(&station) - 10.0).abs() < 1e-9);
        // At this distance the chord from 50 km depth is slightly shorter
        // than the surface-to-surface chord.
        let direct = source.direct_distance_km(&station);
        let surface = chord_distance_km(0.0, 0.0, 0.0, 10.0, 0.0, 0.0);
        assert!(direct < surface);
        assert!((direct - surface).abs() < 10.0);
    }
}
