use crate::prelude::{
    StageError, StageResult, TraceConfig, TraceInput, TraceMetadata, TraceOutput, TraceStage,
};
use crate::signal::buffer_pool::BufferPool;
use crate::telemetry::log::LogManager;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Adds white Gaussian noise scaled to a signal-to-noise ratio drawn
/// uniformly from the configured dB range.
pub struct NoiseStage {
    snr_db_min: f64,
    snr_db_max: f64,
    rng: StdRng,
    pool: BufferPool,
    logger: LogManager,
}

impl NoiseStage {
    pub fn new(snr_db_min: f64, snr_db_max: f64, seed: u64) -> Self {
        Self {
            snr_db_min,
            snr_db_max,
            rng: StdRng::seed_from_u64(seed),
            pool: BufferPool::with_capacity(1),
            logger: LogManager::new(),
        }
    }
}

impl TraceStage for NoiseStage {
    fn initialize(&mut self, _config: &TraceConfig) -> StageResult<()> {
        if !self.snr_db_min.is_finite()
            || !self.snr_db_max.is_finite()
            || self.snr_db_min > self.snr_db_max
        {
            return Err(StageError::InvalidInput(format!(
                "SNR range [{}, {}] dB is invalid",
                self.snr_db_min, self.snr_db_max
            )));
        }
        Ok(())
    }

    fn execute(&mut self, input: TraceInput) -> StageResult<TraceOutput> {
        if input.samples.is_empty() {
            return Err(StageError::InvalidInput("no samples to perturb".into()));
        }

        let signal_power = input
            .samples
            .iter()
            .map(|&v| (v as f64) * (v as f64))
            .sum::<f64>()
            / input.samples.len() as f64;
        let snr_db = if self.snr_db_min == self.snr_db_max {
            self.snr_db_min
        } else {
            self.rng.gen_range(self.snr_db_min..self.snr_db_max)
        };
        let noise_power = signal_power / 10f64.powf(snr_db / 10.0);
        let normal = Normal::new(0.0, noise_power.sqrt())
            .map_err(|e| StageError::Internal(format!("noise distribution: {e}")))?;

        let mut samples = self.pool.checkout(input.samples.len())?;
        for (out, &sample) in samples.iter_mut().zip(&input.samples) {
            *out = sample + normal.sample(&mut self.rng) as f32;
        }

        self.logger
            .record_detail(&format!("NoiseStage SNR {:.2} dB", snr_db));

        Ok(TraceOutput {
            samples,
            metadata: TraceMetadata {
                snr_db: Some(snr_db),
                ..Default::default()
            },
        })
    }

    fn cleanup(&mut self) {
        self.pool.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_respects_the_drawn_snr() {
        let mut stage = NoiseStage::new(3.0, 3.0, 42);
        stage.initialize(&TraceConfig::default()).unwrap();

        let samples = vec![1.0f32; 4096];
        let output = stage.execute(TraceInput { samples }).unwrap();
        assert_eq!(output.metadata.snr_db, Some(3.0));

        // Noise power for a unit signal at 3 dB is ~0.5.
        let noise_power = output
            .samples
            .iter()
            .map(|&v| {
                let n = (v - 1.0) as f64;
                n * n
            })
            .sum::<f64>()
            / output.samples.len() as f64;
        assert!((noise_power - 0.501).abs() < 0.1, "noise power {noise_power}");
        stage.cleanup();
    }

    #[test]
    fn same_seed_adds_identical_noise() {
        let samples = vec![0.5f32; 64];
        let mut run = |seed: u64| {
            let mut stage = NoiseStage::new(2.0, 5.0, seed);
            stage.initialize(&TraceConfig::default()).unwrap();
            stage
                .execute(TraceInput {
                    samples: samples.clone(),
                })
                .unwrap()
                .samples
        };
        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }

    #[test]
    fn inverted_snr_range_fails_validation() {
        let mut stage = NoiseStage::new(5.0, 2.0, 0);
        assert!(stage.initialize(&TraceConfig::default()).is_err());
    }
}
