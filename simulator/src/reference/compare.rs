use seiscore::geo::{Source, Station};
use seiscore::prelude::{ModelError, ModelResult};
use seiscore::traveltime::{Phase, ReferenceModel, TravelTimeCalculator, VelocityModel};

/// Signed deviation of the calculator's depth-phase delays from a reference
/// model at one geometry (calculator minus reference), seconds.
#[derive(Debug, Clone, Copy)]
pub struct PhaseDeviation {
    pub delta_pp_s: f64,
    pub delta_sp_s: f64,
}

impl PhaseDeviation {
    pub fn within(&self, tolerance_s: f64) -> bool {
        self.delta_pp_s.abs() <= tolerance_s && self.delta_sp_s.abs() <= tolerance_s
    }
}

/// Compares the calculator against `reference` for a source at `depth_km`
/// and a station `distance_deg` away along the equator.
pub fn compare_delays(
    reference: &dyn ReferenceModel,
    depth_km: f64,
    distance_deg: f64,
) -> ModelResult<PhaseDeviation> {
    let source = Source {
        lat_deg: 0.0,
        lon_deg: 0.0,
        depth_m: depth_km * 1000.0,
    };
    let station = Station {
        lat_deg: 0.0,
        lon_deg: distance_deg,
    };

    let calculator = TravelTimeCalculator::new(VelocityModel::standard());
    let arrivals = calculator.arrivals(&source, &station)?;

    let times = reference.reference_times(depth_km, distance_deg, &[Phase::P, Phase::Pp, Phase::Sp])?;
    if times.len() != 3 {
        return Err(ModelError::InvalidInput(format!(
            "reference model returned {} times for 3 phases",
            times.len()
        )));
    }
    let reference_pp = times[1] - times[0];
    let reference_sp = times[2] - times[0];

    Ok(PhaseDeviation {
        delta_pp_s: arrivals.delta_pp() - reference_pp,
        delta_sp_s: arrivals.delta_sp() - reference_sp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::table::TableReferenceModel;

    #[test]
    fn calculator_matches_the_table_at_fifty_km_ten_degrees() {
        let table = TableReferenceModel::new();
        let deviation = compare_delays(&table, 50.0, 10.0).unwrap();
        assert!(deviation.within(2.0), "deviation {deviation:?}");
    }

    #[test]
    fn off_grid_geometries_stay_within_tolerance() {
        let table = TableReferenceModel::new();
        for (depth_km, distance_deg) in [(75.0, 12.5), (250.0, 18.0), (450.0, 27.5)] {
            let deviation = compare_delays(&table, depth_km, distance_deg).unwrap();
            assert!(
                deviation.within(2.0),
                "deviation {deviation:?} at {depth_km} km / {distance_deg} deg"
            );
        }
    }

    #[test]
    fn stub_reference_detects_large_deviations() {
        struct ZeroDelays;
        impl ReferenceModel for ZeroDelays {
            fn reference_times(
                &self,
                _depth_km: f64,
                _distance_deg: f64,
                phases: &[Phase],
            ) -> ModelResult<Vec<f64>> {
                Ok(vec![100.0; phases.len()])
            }
        }

        let deviation = compare_delays(&ZeroDelays, 300.0, 20.0).unwrap();
        assert!(!deviation.within(2.0));
    }
}
