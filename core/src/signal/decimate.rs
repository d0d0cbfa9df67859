use crate::math::fft::FftHelper;
use crate::prelude::{
    StageError, StageResult, TraceConfig, TraceInput, TraceMetadata, TraceOutput, TraceStage,
};
use crate::signal::buffer_pool::BufferPool;
use crate::telemetry::log::LogManager;
use num_complex::Complex32;

/// Anti-aliased integer-factor downsampling (100 Hz to 20 Hz by default).
///
/// The input is low-passed at the decimated Nyquist in the frequency domain
/// (zero-phase), then every `factor`-th sample is kept.
pub struct DecimateStage {
    factor: usize,
    sample_rate_hz: f64,
    fft: Option<FftHelper>,
    pool: BufferPool,
    logger: LogManager,
}

impl DecimateStage {
    pub fn new() -> Self {
        Self {
            factor: 1,
            sample_rate_hz: 0.0,
            fft: None,
            pool: BufferPool::with_capacity(1),
            logger: LogManager::new(),
        }
    }
}

impl Default for DecimateStage {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceStage for DecimateStage {
    fn initialize(&mut self, config: &TraceConfig) -> StageResult<()> {
        if config.decimation == 0 {
            return Err(StageError::InvalidInput(
                "decimation factor must be at least 1".into(),
            ));
        }
        self.factor = config.decimation;
        self.sample_rate_hz = config.sample_rate_hz;
        self.fft = Some(FftHelper::new(config.raw_len()));
        Ok(())
    }

    fn execute(&mut self, input: TraceInput) -> StageResult<TraceOutput> {
        let fft = self
            .fft
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;
        if input.samples.is_empty() || input.samples.len() > fft.size() {
            return Err(StageError::InvalidInput(format!(
                "expected 1..={} samples, got {}",
                fft.size(),
                input.samples.len()
            )));
        }
        if self.factor <= 1 {
            let rms_note = input.samples.len();
            return Ok(TraceOutput {
                samples: input.samples,
                metadata: TraceMetadata {
                    notes: vec![format!("decimation bypassed ({rms_note} samples)")],
                    ..Default::default()
                },
            });
        }

        let cutoff_hz = self.sample_rate_hz / (2.0 * self.factor as f64);
        let mut spectrum = fft.forward(&input.samples);
        for (index, bin) in spectrum.iter_mut().enumerate() {
            if fft.bin_freq_hz(index, self.sample_rate_hz) > cutoff_hz {
                *bin = Complex32::new(0.0, 0.0);
            }
        }
        let filtered = fft.inverse_real(&mut spectrum);

        let out_len = input.samples.len() / self.factor;
        let mut samples = self.pool.checkout(out_len)?;
        for (out, value) in samples
            .iter_mut()
            .zip(filtered.iter().step_by(self.factor))
        {
            *out = *value;
        }

        self.logger.record_detail(&format!(
            "DecimateStage {} -> {} samples",
            input.samples.len(),
            out_len
        ));

        Ok(TraceOutput {
            samples,
            metadata: TraceMetadata {
                notes: vec![format!("decimated by {}", self.factor)],
                ..Default::default()
            },
        })
    }

    fn cleanup(&mut self) {
        self.pool.reset();
        self.fft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn output_length_shrinks_by_the_factor() {
        let config = TraceConfig::default();
        let mut stage = DecimateStage::new();
        stage.initialize(&config).unwrap();

        let samples: Vec<f32> = (0..6000)
            .map(|i| (TAU * 2.0 * i as f32 / 100.0).sin())
            .collect();
        let output = stage.execute(TraceInput { samples }).unwrap();
        assert_eq!(output.samples.len(), 1200);
        stage.cleanup();
    }

    #[test]
    fn slow_tones_survive_decimation() {
        let config = TraceConfig::default();
        let mut stage = DecimateStage::new();
        stage.initialize(&config).unwrap();

        // 2 Hz is well below the 10 Hz decimated Nyquist.
        let samples: Vec<f32> = (0..6000)
            .map(|i| (TAU * 2.0 * i as f32 / 100.0).sin())
            .collect();
        let output = stage.execute(TraceInput { samples }).unwrap();
        let rms = crate::math::stats::StatsHelper::rms(&output.samples);
        assert!((rms - 0.707).abs() < 0.05, "RMS {rms}");
        stage.cleanup();
    }

    #[test]
    fn factor_one_passes_through() {
        let config = TraceConfig {
            decimation: 1,
            ..TraceConfig::default()
        };
        let mut stage = DecimateStage::new();
        stage.initialize(&config).unwrap();
        let samples = vec![1.0f32; 100];
        let output = stage.execute(TraceInput { samples }).unwrap();
        assert_eq!(output.samples.len(), 100);
        stage.cleanup();
    }
}
