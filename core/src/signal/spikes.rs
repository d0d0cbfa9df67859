use crate::geo::{Source, Station};
use crate::prelude::{StageError, StageResult, TraceConfig};
use rand::{rngs::StdRng, Rng};

/// Average crustal/upper-mantle P velocity used to scale coda duration, m/s.
const CODA_P_VELOCITY_M_S: f64 = 7.5e3;
/// Spacing between consecutive coda spikes, seconds.
const CODA_SPACING_S: f64 = 0.1;
/// Exponential decay constant of the coda, seconds.
const CODA_TAU_S: f64 = 3.0;
/// Probability that a coda spike flips polarity.
const CODA_FLIP_PROB: f64 = 0.1;

/// Builds the raw spike train for one station: a P spike pinned at sample 0
/// (the common alignment column), pP and sP spikes at their depth-phase
/// delays, each trailed by an exponentially decaying coda with random
/// polarity flips. Amplitudes and signs model the radiation pattern at the
/// source, so every draw comes from the caller's generator.
pub fn build_spike_train(
    config: &TraceConfig,
    delta_pp_s: f64,
    delta_sp_s: f64,
    source: &Source,
    station: &Station,
    rng: &mut StdRng,
) -> StageResult<Vec<f32>> {
    if !delta_pp_s.is_finite() || !delta_sp_s.is_finite() || delta_pp_s < 0.0 || delta_sp_s < 0.0 {
        return Err(StageError::InvalidInput(format!(
            "depth-phase delays must be finite and nonnegative (tpP {delta_pp_s}, tsP {delta_sp_s})"
        )));
    }
    let len = config.raw_len();
    if len == 0 {
        return Err(StageError::InvalidInput(
            "trace configuration yields an empty trace".into(),
        ));
    }
    let dt = 1.0 / config.sample_rate_hz;
    let mut samples = vec![0.0f32; len];

    // Coda length scales with the straight-line path to the station.
    let path_m = source.direct_distance_km(station) * 1000.0;
    let coda_s = (path_m / CODA_P_VELOCITY_M_S).floor();

    let amp_p: f32 = rng.gen_range(0.5..1.0);
    let sign_p: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    samples[0] = sign_p * amp_p;
    add_coda(&mut samples, 0, amp_p, sign_p, coda_s, dt, rng);

    for delta_s in [delta_pp_s, delta_sp_s] {
        let index = (delta_s / dt) as usize;
        if index >= len {
            continue;
        }
        let amp: f32 = amp_p * rng.gen_range(0.0..1.1);
        let sign: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        samples[index] = sign * amp;
        add_coda(&mut samples, index, amp, sign, coda_s, dt, rng);
    }

    Ok(samples)
}

fn add_coda(
    samples: &mut [f32],
    start: usize,
    amplitude: f32,
    initial_sign: f32,
    coda_s: f64,
    dt: f64,
    rng: &mut StdRng,
) {
    let stride = (CODA_SPACING_S / dt).round() as usize;
    if stride == 0 {
        return;
    }
    let count = (coda_s / CODA_SPACING_S) as usize;
    let mut sign = initial_sign;
    for i in 1..count {
        let index = start + i * stride;
        if index >= samples.len() {
            break;
        }
        if rng.gen::<f64>() < CODA_FLIP_PROB {
            sign = -sign;
        }
        let decay = (-(i as f64) * CODA_SPACING_S / CODA_TAU_S).exp() as f32;
        samples[index] += sign * amplitude * decay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fixture() -> (TraceConfig, Source, Station) {
        let source = Source {
            lat_deg: 0.0,
            lon_deg: 0.0,
            depth_m: 50_000.0,
        };
        let station = Station {
            lat_deg: 10.0,
            lon_deg: 0.0,
        };
        (TraceConfig::default(), source, station)
    }

    #[test]
    fn p_spike_sits_at_the_alignment_column() {
        let (config, source, station) = fixture();
        let mut rng = StdRng::seed_from_u64(7);
        let samples = build_spike_train(&config, 12.0, 18.0, &source, &station, &mut rng).unwrap();
        assert_eq!(samples.len(), config.raw_len());
        let amp = samples[0].abs();
        assert!((0.5..1.0).contains(&amp));
    }

    #[test]
    fn depth_phase_spikes_land_at_their_delays() {
        let (config, source, station) = fixture();
        let mut rng = StdRng::seed_from_u64(3);
        let samples = build_spike_train(&config, 12.0, 18.0, &source, &station, &mut rng).unwrap();
        // 12 s and 18 s at 100 Hz.
        assert!(samples[1200].abs() <= samples[0].abs() * 1.1);
        assert!(samples[1800].abs() <= samples[0].abs() * 1.1);
    }

    #[test]
    fn same_seed_reproduces_the_train() {
        let (config, source, station) = fixture();
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        let first = build_spike_train(&config, 12.0, 18.0, &source, &station, &mut a).unwrap();
        let second = build_spike_train(&config, 12.0, 18.0, &source, &station, &mut b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn delays_beyond_the_window_are_skipped() {
        let (config, source, station) = fixture();
        let mut rng = StdRng::seed_from_u64(5);
        let samples =
            build_spike_train(&config, 120.0, 240.0, &source, &station, &mut rng).unwrap();
        assert_eq!(samples.len(), config.raw_len());
    }

    #[test]
    fn negative_delays_are_rejected() {
        let (config, source, station) = fixture();
        let mut rng = StdRng::seed_from_u64(5);
        assert!(build_spike_train(&config, -1.0, 18.0, &source, &station, &mut rng).is_err());
    }
}
