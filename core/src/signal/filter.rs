use crate::math::fft::FftHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{
    StageError, StageResult, TraceConfig, TraceInput, TraceMetadata, TraceOutput, TraceStage,
};
use crate::telemetry::log::LogManager;

/// Zero-phase Butterworth-magnitude band-pass applied in the frequency domain.
///
/// Each spectral bin is scaled by the order-n Butterworth band-pass magnitude
/// response; the purely real response keeps the filter zero-phase, the
/// frequency-domain equivalent of a forward-backward time-domain pass.
pub struct BandpassStage {
    lowcut_hz: f64,
    highcut_hz: f64,
    order: u32,
    sample_rate_hz: f64,
    fft: Option<FftHelper>,
    logger: LogManager,
}

impl BandpassStage {
    pub fn new(lowcut_hz: f64, highcut_hz: f64, order: u32) -> Self {
        Self {
            lowcut_hz,
            highcut_hz,
            order,
            sample_rate_hz: 0.0,
            fft: None,
            logger: LogManager::new(),
        }
    }

    fn response(&self, freq_hz: f64) -> f32 {
        if freq_hz == 0.0 {
            return 0.0;
        }
        let center_sq = self.lowcut_hz * self.highcut_hz;
        let bandwidth = self.highcut_hz - self.lowcut_hz;
        let x = (freq_hz * freq_hz - center_sq) / (freq_hz * bandwidth);
        let power = 1.0 + x.powi(2 * self.order as i32);
        (1.0 / power.sqrt()) as f32
    }
}

impl TraceStage for BandpassStage {
    fn initialize(&mut self, config: &TraceConfig) -> StageResult<()> {
        let nyquist = config.sample_rate_hz / 2.0;
        if self.order == 0
            || self.lowcut_hz <= 0.0
            || self.lowcut_hz >= self.highcut_hz
            || self.highcut_hz >= nyquist
        {
            return Err(StageError::InvalidInput(format!(
                "band {}-{} Hz (order {}) is invalid for {} Hz sampling",
                self.lowcut_hz, self.highcut_hz, self.order, config.sample_rate_hz
            )));
        }
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

        let mut spectrum = fft.forward(&input.samples);
        for (index, bin) in spectrum.iter_mut().enumerate() {
            let freq = fft.bin_freq_hz(index, self.sample_rate_hz);
            *bin *= self.response(freq);
        }
        let mut samples = fft.inverse_real(&mut spectrum);
        samples.truncate(input.samples.len());

        let rms = StatsHelper::rms(&samples);
        self.logger
            .record_detail(&format!("BandpassStage RMS {:.4}", rms));

        Ok(TraceOutput {
            samples,
            metadata: TraceMetadata {
                notes: vec![format!("bandpass RMS {:.4}", rms)],
                ..Default::default()
            },
        })
    }

    fn cleanup(&mut self) {
        self.fft = None;
        self.sample_rate_hz = 0.0;
    }
}
