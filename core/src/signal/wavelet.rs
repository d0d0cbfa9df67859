use crate::math::stats::StatsHelper;
use crate::prelude::{
    StageError, StageResult, TraceConfig, TraceInput, TraceMetadata, TraceOutput, TraceStage,
};
use crate::signal::buffer_pool::BufferPool;
use crate::telemetry::log::LogManager;
use std::f64::consts::PI;

/// Samples an L1-normalized Ricker wavelet of `length_s` support.
pub fn ricker_wavelet(center_freq_hz: f64, length_s: f64, dt_s: f64) -> Vec<f32> {
    let half = length_s / 2.0;
    let count = (length_s / dt_s) as usize;
    let mut wavelet = Vec::with_capacity(count);
    for i in 0..count {
        let t = -half + i as f64 * dt_s;
        let arg = (PI * center_freq_hz * t).powi(2);
        wavelet.push(((1.0 - 2.0 * arg) * (-arg).exp()) as f32);
    }
    // Normalize to unit L1 mass so convolution does not amplify.
    let norm: f32 = wavelet.iter().map(|v| v.abs()).sum();
    if norm > 0.0 {
        for value in &mut wavelet {
            *value /= norm;
        }
    }
    wavelet
}

/// Convolves the spike train with a Ricker wavelet, center-cropping the full
/// convolution back to the input length so the P alignment is preserved.
pub struct WaveletStage {
    center_freq_hz: f64,
    length_s: f64,
    wavelet: Option<Vec<f32>>,
    pool: BufferPool,
    logger: LogManager,
}

impl WaveletStage {
    pub fn new(center_freq_hz: f64, length_s: f64) -> Self {
        Self {
            center_freq_hz,
            length_s,
            wavelet: None,
            pool: BufferPool::with_capacity(2),
            logger: LogManager::new(),
        }
    }
}

impl TraceStage for WaveletStage {
    fn initialize(&mut self, config: &TraceConfig) -> StageResult<()> {
        if self.center_freq_hz <= 0.0 || self.length_s <= 0.0 {
            return Err(StageError::InvalidInput(
                "wavelet frequency and length must be positive".into(),
            ));
        }
        let wavelet = ricker_wavelet(
            self.center_freq_hz,
            self.length_s,
            1.0 / config.sample_rate_hz,
        );
        if wavelet.is_empty() {
            return Err(StageError::InvalidInput(
                "wavelet is shorter than one sample".into(),
            ));
        }
        self.wavelet = Some(wavelet);
        Ok(())
    }

    fn execute(&mut self, input: TraceInput) -> StageResult<TraceOutput> {
        let wavelet = self
            .wavelet
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;
        if input.samples.is_empty() {
            return Err(StageError::InvalidInput("no samples to convolve".into()));
        }

        let n = input.samples.len();
        let full_len = n + wavelet.len() - 1;
        let mut full = self.pool.checkout(full_len)?;
        for (i, &sample) in input.samples.iter().enumerate() {
            if sample == 0.0 {
                // Spike trains are sparse.
                continue;
            }
            for (j, &tap) in wavelet.iter().enumerate() {
                full[i + j] += sample * tap;
            }
        }

        let start = (full_len - n) / 2;
        let mut samples = self.pool.checkout(n)?;
        samples.copy_from_slice(&full[start..start + n]);
        self.pool.release(full);

        let rms = StatsHelper::rms(&samples);
        self.logger.record_detail(&format!("WaveletStage RMS {:.4}", rms));

        Ok(TraceOutput {
            samples,
            metadata: TraceMetadata {
                notes: vec![format!("wavelet RMS {:.4}", rms)],
                ..Default::default()
            },
        })
    }

    fn cleanup(&mut self) {
        self.pool.reset();
        self.wavelet = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ricker_peaks_at_center_with_unit_mass() {
        let wavelet = ricker_wavelet(1.65, 1.0, 0.01);
        assert_eq!(wavelet.len(), 100);
        let peak_index = wavelet
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_index, 50);
        let mass: f32 = wavelet.iter().map(|v| v.abs()).sum();
        assert!((mass - 1.0).abs() < 1e-5);
    }

    #[test]
    fn convolution_preserves_length_and_spreads_spikes() {
        let mut stage = WaveletStage::new(1.65, 1.0);
        stage.initialize(&TraceConfig::default()).unwrap();

        let mut samples = vec![0.0f32; 400];
        samples[200] = 1.0;
        let output = stage.execute(TraceInput { samples }).unwrap();
        assert_eq!(output.samples.len(), 400);
        // Energy spreads into the neighborhood of the spike.
        assert!(output.samples[200] != 0.0);
        assert!(output.samples[195].abs() > 0.0);
        stage.cleanup();
    }

    #[test]
    fn one_stage_instance_handles_many_traces() {
        let mut stage = WaveletStage::new(1.65, 1.0);
        stage.initialize(&TraceConfig::default()).unwrap();

        let mut samples = vec![0.0f32; 400];
        samples[100] = 1.0;
        for _ in 0..4 {
            let output = stage
                .execute(TraceInput {
                    samples: samples.clone(),
                })
                .unwrap();
            assert_eq!(output.samples.len(), 400);
            assert!(output.samples[100] != 0.0);
        }
        stage.cleanup();
    }

    #[test]
    fn execute_before_initialize_fails() {
        let mut stage = WaveletStage::new(1.65, 1.0);
        assert!(stage
            .execute(TraceInput {
                samples: vec![1.0; 8]
            })
            .is_err());
    }
}
