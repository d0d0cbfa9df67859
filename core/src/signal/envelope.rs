use crate::math::fft::FftHelper;
use crate::prelude::{
    StageError, StageResult, TraceConfig, TraceInput, TraceMetadata, TraceOutput, TraceStage,
};
use crate::telemetry::log::LogManager;
use num_complex::Complex32;

/// Extracts the peak-normalized Hilbert (analytic-signal) envelope.
///
/// The analytic signal is built in the frequency domain: positive frequencies
/// doubled, negative frequencies zeroed, DC and Nyquist untouched.
pub struct EnvelopeStage {
    fft: Option<FftHelper>,
    logger: LogManager,
}

impl EnvelopeStage {
    pub fn new() -> Self {
        Self {
            fft: None,
            logger: LogManager::new(),
        }
    }
}

impl Default for EnvelopeStage {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceStage for EnvelopeStage {
    fn initialize(&mut self, config: &TraceConfig) -> StageResult<()> {
        if config.raw_len() == 0 {
            return Err(StageError::InvalidInput(
                "trace configuration yields an empty trace".into(),
            ));
        }
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

        let n = fft.size();
        let mut spectrum = fft.forward(&input.samples);
        for (index, bin) in spectrum.iter_mut().enumerate().skip(1) {
            if 2 * index < n {
                *bin *= 2.0;
            } else if 2 * index > n {
                *bin = Complex32::new(0.0, 0.0);
            }
        }
        fft.inverse(&mut spectrum);

        let mut samples: Vec<f32> = spectrum
            .iter()
            .take(input.samples.len())
            .map(|c| c.norm())
            .collect();

        let peak = samples.iter().cloned().fold(0.0f32, f32::max);
        if peak > 0.0 {
            for value in &mut samples {
                *value /= peak;
            }
        }

        self.logger
            .record_detail(&format!("EnvelopeStage peak {:.4}", peak));

        Ok(TraceOutput {
            samples,
            metadata: TraceMetadata {
                peak: Some(peak),
                ..Default::default()
            },
        })
    }

    fn cleanup(&mut self) {
        self.fft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn envelope_of_a_tone_is_flat_and_normalized() {
        let config = TraceConfig {
            sample_rate_hz: 100.0,
            duration_s: 10.0,
            decimation: 1,
        };
        let mut stage = EnvelopeStage::new();
        stage.initialize(&config).unwrap();

        let samples: Vec<f32> = (0..1000)
            .map(|i| (TAU * 5.0 * i as f32 / 100.0).sin())
            .collect();
        let output = stage.execute(TraceInput { samples }).unwrap();

        let max = output.samples.iter().cloned().fold(0.0f32, f32::max);
        assert!((max - 1.0).abs() < 1e-6);
        // Away from the edges the envelope of a pure tone stays near its peak.
        for &value in &output.samples[100..900] {
            assert!(value > 0.9, "envelope dipped to {value}");
        }
        stage.cleanup();
    }

    #[test]
    fn envelope_is_nonnegative() {
        let config = TraceConfig {
            sample_rate_hz: 100.0,
            duration_s: 1.0,
            decimation: 1,
        };
        let mut stage = EnvelopeStage::new();
        stage.initialize(&config).unwrap();
        let samples: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let output = stage.execute(TraceInput { samples }).unwrap();
        assert!(output.samples.iter().all(|&v| v >= 0.0));
        stage.cleanup();
    }
}
