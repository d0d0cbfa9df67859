use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use seiscore::scenario::{build_scenario, StationRecord};
use seiscore::telemetry::{MetricsRecorder, MetricsSnapshot};
use serde::Serialize;

/// JSON-serializable form of one generated scenario.
#[derive(Debug, Serialize)]
pub struct DatasetRecord {
    pub depth_km: f64,
    pub rows: Vec<Vec<f32>>,
    pub stations: Vec<StationRecord>,
}

/// Aggregate view of a finished batch.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub scenarios: usize,
    pub rows: usize,
    pub cols: usize,
    pub min_depth_km: f64,
    pub max_depth_km: f64,
}

pub struct Runner {
    config: WorkflowConfig,
    metrics: MetricsRecorder,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn execute(&self) -> anyhow::Result<(Vec<DatasetRecord>, BatchSummary)> {
        let mut records = Vec::with_capacity(self.config.scenarios);
        let mut min_depth_km = f64::INFINITY;
        let mut max_depth_km = f64::NEG_INFINITY;
        let mut cols = 0;

        for index in 0..self.config.scenarios {
            let scenario_config = self.config.to_scenario_config(index);
            let scenario = match build_scenario(&scenario_config) {
                Ok(scenario) => scenario,
                Err(err) => {
                    self.metrics.record_failure();
                    return Err(err).with_context(|| format!("building scenario {index}"));
                }
            };

            let (rows, scenario_cols) = scenario.matrix.dim();
            cols = scenario_cols;
            let depth_km = scenario.depth_m / 1000.0;
            min_depth_km = min_depth_km.min(depth_km);
            max_depth_km = max_depth_km.max(depth_km);
            self.metrics.record_scenario(rows);

            records.push(DatasetRecord {
                depth_km,
                rows: scenario
                    .matrix
                    .outer_iter()
                    .map(|row| row.to_vec())
                    .collect(),
                stations: scenario.stations,
            });
        }

        let summary = BatchSummary {
            scenarios: records.len(),
            rows: self.config.stations,
            cols,
            min_depth_km,
            max_depth_km,
        };
        Ok((records, summary))
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_builds_a_reproducible_batch() {
        let cfg = WorkflowConfig::from_args(2, 4, 1, None, 33);
        let runner = Runner::new(cfg);
        let (records, summary) = runner.execute().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(summary.scenarios, 2);
        assert_eq!(summary.cols, 1200);
        for record in &records {
            assert_eq!(record.rows.len(), 4);
            assert_eq!(record.stations.len(), 4);
            assert!(record.depth_km >= summary.min_depth_km);
            assert!(record.depth_km <= summary.max_depth_km);
        }

        let snapshot = runner.metrics_snapshot();
        assert_eq!(snapshot.scenarios, 2);
        assert_eq!(snapshot.traces, 8);
        assert_eq!(snapshot.failures, 0);
    }

    #[test]
    fn runner_surfaces_validation_errors() {
        let cfg = WorkflowConfig::from_args(1, 4, 4, None, 0);
        let runner = Runner::new(cfg);
        assert!(runner.execute().is_err());
        assert_eq!(runner.metrics_snapshot().failures, 1);
    }
}
