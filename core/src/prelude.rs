use serde::{Deserialize, Serialize};

/// Sampling configuration shared by every trace stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub sample_rate_hz: f64,
    pub duration_s: f64,
    pub decimation: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 100.0,
            duration_s: 60.0,
            decimation: 5,
        }
    }
}

impl TraceConfig {
    /// Sample count of a raw trace before decimation.
    pub fn raw_len(&self) -> usize {
        (self.duration_s * self.sample_rate_hz) as usize
    }

    /// Sample count of a finished row after decimation.
    pub fn output_len(&self) -> usize {
        self.raw_len() / self.decimation.max(1)
    }

    /// Effective sampling rate of a finished row.
    pub fn output_rate_hz(&self) -> f64 {
        self.sample_rate_hz / self.decimation.max(1) as f64
    }
}

/// Input payload for a trace stage.
#[derive(Debug, Clone)]
pub struct TraceInput {
    pub samples: Vec<f32>,
}

/// Output produced by each stage.
#[derive(Debug, Clone)]
pub struct TraceOutput {
    pub samples: Vec<f32>,
    pub metadata: TraceMetadata,
}

/// Metadata used for chaining stages and telemetry.
#[derive(Debug, Clone, Default)]
pub struct TraceMetadata {
    pub snr_db: Option<f64>,
    pub peak: Option<f32>,
    pub notes: Vec<String>,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("buffer exhaustion: {0}")]
    BufferExhaustion(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Errors surfaced by the travel-time calculator and the scenario builder.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("invalid depth: {0}")]
    InvalidDepth(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("trace stage failed: {0}")]
    Stage(#[from] StageError),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Trait describing the per-station trace-processing stages.
pub trait TraceStage {
    fn initialize(&mut self, config: &TraceConfig) -> StageResult<()>;
    fn execute(&mut self, input: TraceInput) -> StageResult<TraceOutput>;
    fn cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_notebook_sampling() {
        let config = TraceConfig::default();
        assert_eq!(config.raw_len(), 6000);
        assert_eq!(config.output_len(), 1200);
        assert!((config.output_rate_hz() - 20.0).abs() < 1e-12);
    }
}
