use crate::geo::{Source, Station};
use crate::math::stats::StatsHelper;
use crate::prelude::{ModelError, ModelResult, TraceConfig, TraceInput, TraceStage};
use crate::signal::{
    build_spike_train, BandpassStage, DecimateStage, EnvelopeStage, NoiseStage, WaveletStage,
};
use crate::telemetry::log::LogManager;
use crate::traveltime::{PhaseArrivals, TravelTimeCalculator, VelocityModel};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Configuration for one synthetic scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub stations: usize,
    /// Number of rows zeroed out to simulate inactive stations.
    pub dropout: usize,
    /// Explicit source depth in meters; `None` draws uniformly within the
    /// velocity model's validity range.
    pub depth_m: Option<f64>,
    /// Station footprint radius around the epicenter, degrees.
    pub max_distance_deg: f64,
    pub seed: u64,
    /// Record true source-station distances as auxiliary metadata.
    pub with_distances: bool,
    pub trace: TraceConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            stations: 50,
            dropout: 0,
            depth_m: None,
            max_distance_deg: 30.0,
            seed: 0,
            with_distances: true,
            trace: TraceConfig::default(),
        }
    }
}

/// Per-station bookkeeping attached to a finished scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub station: Station,
    pub distance_km: Option<f64>,
    pub delta_pp_s: f64,
    pub delta_sp_s: f64,
    pub active: bool,
}

/// One training example: the aligned station matrix and its depth label.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub matrix: Array2<f32>,
    pub depth_m: f64,
    pub source: Source,
    pub stations: Vec<StationRecord>,
}

/// Generates a complete scenario: random (or fixed-depth) source, stations
/// scattered in the footprint, one aligned envelope trace per active station,
/// rows sorted by ascending source-station distance and Z-normalized, dropped
/// rows left as all-zero sentinels. All-or-nothing: any failure mid-assembly
/// returns an error with no partial matrix.
pub fn build_scenario(config: &ScenarioConfig) -> ModelResult<Scenario> {
    if config.stations == 0 {
        return Err(ModelError::InvalidInput(
            "scenario needs at least one station".into(),
        ));
    }
    if config.dropout >= config.stations {
        return Err(ModelError::InvalidInput(format!(
            "dropout {} must be below the station count {}",
            config.dropout, config.stations
        )));
    }
    if !config.max_distance_deg.is_finite() || config.max_distance_deg <= 0.0 {
        return Err(ModelError::InvalidInput(format!(
            "station footprint {} deg is invalid",
            config.max_distance_deg
        )));
    }
    let model = VelocityModel::standard();
    if let Some(depth_m) = config.depth_m {
        model.validate_depth_m(depth_m)?;
    }
    let cols = config.trace.output_len();
    if config.trace.raw_len() == 0 || cols == 0 {
        return Err(ModelError::InvalidInput(
            "trace configuration yields an empty trace".into(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let depth_m = match config.depth_m {
        Some(depth_m) => depth_m,
        // Uniform over (0, max]: the surface itself is never drawn.
        None => model.max_depth_m() - rng.gen_range(0.0..model.max_depth_m()),
    };
    let source = Source {
        lat_deg: rng.gen_range(-70.0..70.0),
        lon_deg: rng.gen_range(-180.0..180.0),
        depth_m,
    };

    let calculator = TravelTimeCalculator::new(model);
    let mut rows: Vec<(Station, f64, PhaseArrivals)> = Vec::with_capacity(config.stations);
    for _ in 0..config.stations {
        let station = random_station(&source, config.max_distance_deg, &mut rng);
        let arrivals = calculator.arrivals(&source, &station)?;
        let distance_km = source.direct_distance_km(&station);
        rows.push((station, distance_km, arrivals));
    }
    rows.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    // Uniformly random dropout subset via a partial Fisher-Yates pass.
    let mut active = vec![true; config.stations];
    let mut indices: Vec<usize> = (0..config.stations).collect();
    for i in 0..config.dropout {
        let j = rng.gen_range(i..indices.len());
        indices.swap(i, j);
        active[indices[i]] = false;
    }

    let mut wavelet = WaveletStage::new(1.65, 1.0);
    let mut noise = NoiseStage::new(2.0, 5.0, rng.gen());
    let mut bandpass = BandpassStage::new(0.8, 2.5, 3);
    let mut envelope = EnvelopeStage::new();
    let mut decimate = DecimateStage::new();
    let mut stages: Vec<&mut dyn TraceStage> = vec![
        &mut wavelet,
        &mut noise,
        &mut bandpass,
        &mut envelope,
        &mut decimate,
    ];
    for stage in stages.iter_mut() {
        stage.initialize(&config.trace)?;
    }

    let mut matrix = Array2::<f32>::zeros((config.stations, cols));
    let mut records = Vec::with_capacity(config.stations);
    for (row, (station, distance_km, arrivals)) in rows.into_iter().enumerate() {
        let is_active = active[row];
        if is_active {
            let mut samples = build_spike_train(
                &config.trace,
                arrivals.delta_pp(),
                arrivals.delta_sp(),
                &source,
                &station,
                &mut rng,
            )?;
            for stage in stages.iter_mut() {
                samples = stage.execute(TraceInput { samples })?.samples;
            }
            if samples.len() != cols {
                return Err(ModelError::InvalidInput(format!(
                    "trace pipeline produced {} samples, expected {}",
                    samples.len(),
                    cols
                )));
            }
            StatsHelper::zscore_in_place(&mut samples);
            for (cell, value) in matrix.row_mut(row).iter_mut().zip(&samples) {
                *cell = *value;
            }
        }
        records.push(StationRecord {
            station,
            distance_km: config.with_distances.then_some(distance_km),
            delta_pp_s: arrivals.delta_pp(),
            delta_sp_s: arrivals.delta_sp(),
            active: is_active,
        });
    }
    for stage in stages.iter_mut() {
        stage.cleanup();
    }

    LogManager::new().record(&format!(
        "scenario depth {:.1} km, {} stations ({} inactive), {} columns",
        depth_m / 1000.0,
        config.stations,
        config.dropout,
        cols
    ));

    Ok(Scenario {
        matrix,
        depth_m,
        source,
        stations: records,
    })
}

/// Draws a station uniformly over the circular footprint around the epicenter.
fn random_station(source: &Source, max_distance_deg: f64, rng: &mut StdRng) -> Station {
    let bearing = rng.gen_range(0.0..TAU);
    // sqrt keeps the draw area-uniform over the disc.
    let delta = max_distance_deg.to_radians() * rng.gen::<f64>().sqrt();

    let lat1 = source.lat_deg.to_radians();
    let lon1 = source.lon_deg.to_radians();
    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos())
            .atan2(delta.cos() - lat1.sin() * lat2.sin());

    Station {
        lat_deg: lat2.to_degrees(),
        lon_deg: normalize_lon_deg(lon2.to_degrees()),
    }
}

fn normalize_lon_deg(lon_deg: f64) -> f64 {
    let mut lon = lon_deg;
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}
