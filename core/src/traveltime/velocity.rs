use crate::prelude::{ModelError, ModelResult};

/// One constant-velocity depth layer.
#[derive(Debug, Clone, Copy)]
struct Layer {
    bottom_km: f64,
    vp_km_s: f64,
    vs_km_s: f64,
}

/// Piecewise-constant P/S velocity profile over depth.
///
/// Valid from the surface down to the bottom of the last layer; depths
/// outside that range fail validation rather than extrapolate.
#[derive(Debug, Clone)]
pub struct VelocityModel {
    layers: Vec<Layer>,
}

impl VelocityModel {
    /// Crust / upper-mantle / transition-zone profile, valid to 700 km.
    pub fn standard() -> Self {
        Self {
            layers: vec![
                Layer {
                    bottom_km: 35.0,
                    vp_km_s: 6.1,
                    vs_km_s: 3.55,
                },
                Layer {
                    bottom_km: 410.0,
                    vp_km_s: 8.3,
                    vs_km_s: 4.6,
                },
                Layer {
                    bottom_km: 700.0,
                    vp_km_s: 9.6,
                    vs_km_s: 5.3,
                },
            ],
        }
    }

    pub fn max_depth_km(&self) -> f64 {
        self.layers.last().map(|layer| layer.bottom_km).unwrap_or(0.0)
    }

    pub fn max_depth_m(&self) -> f64 {
        self.max_depth_km() * 1000.0
    }

    pub fn validate_depth_m(&self, depth_m: f64) -> ModelResult<()> {
        if !depth_m.is_finite() || depth_m < 0.0 {
            return Err(ModelError::InvalidDepth(format!(
                "depth {depth_m} m is negative or non-finite"
            )));
        }
        if depth_m > self.max_depth_m() {
            return Err(ModelError::InvalidDepth(format!(
                "depth {} m exceeds model maximum {} m",
                depth_m,
                self.max_depth_m()
            )));
        }
        Ok(())
    }

    /// Travel time of a vertical leg between the surface and `depth_km`.
    pub fn vertical_time_s(&self, depth_km: f64, shear: bool) -> f64 {
        let mut time = 0.0;
        let mut top = 0.0;
        for layer in &self.layers {
            if depth_km <= top {
                break;
            }
            let bottom = layer.bottom_km.min(depth_km);
            let velocity = if shear { layer.vs_km_s } else { layer.vp_km_s };
            time += (bottom - top) / velocity;
            top = layer.bottom_km;
        }
        time
    }

    /// Depth-averaged (harmonic mean) velocity from the surface to `depth_km`.
    pub fn mean_velocity_km_s(&self, depth_km: f64, shear: bool) -> f64 {
        if depth_km <= 0.0 {
            return self
                .layers
                .first()
                .map(|layer| if shear { layer.vs_km_s } else { layer.vp_km_s })
                .unwrap_or(0.0);
        }
        depth_km / self.vertical_time_s(depth_km, shear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_time_crosses_layer_boundaries() {
        let model = VelocityModel::standard();
        // 35 km of crust plus 15 km of upper mantle.
        let expected = 35.0 / 6.1 + 15.0 / 8.3;
        assert!((model.vertical_time_s(50.0, false) - expected).abs() < 1e-9);
    }

    #[test]
    fn shear_legs_are_slower() {
        let model = VelocityModel::standard();
        assert!(model.vertical_time_s(100.0, true) > model.vertical_time_s(100.0, false));
    }

    #[test]
    fn mean_velocity_grows_with_depth() {
        let model = VelocityModel::standard();
        let shallow = model.mean_velocity_km_s(20.0, false);
        let deep = model.mean_velocity_km_s(600.0, false);
        assert!((shallow - 6.1).abs() < 1e-9);
        assert!(deep > shallow);
    }

    #[test]
    fn depth_validation_bounds() {
        let model = VelocityModel::standard();
        assert!(model.validate_depth_m(0.0).is_ok());
        assert!(model.validate_depth_m(700_000.0).is_ok());
        assert!(model.validate_depth_m(-1.0).is_err());
        assert!(model.validate_depth_m(700_001.0).is_err());
        assert!(model.validate_depth_m(f64::NAN).is_err());
    }
}
