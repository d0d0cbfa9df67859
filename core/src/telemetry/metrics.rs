use std::sync::Mutex;

/// Counts scenario-generation outcomes for batch reporting.
pub struct MetricsRecorder {
    inner: Mutex<Counters>,
}

#[derive(Default, Clone, Copy)]
struct Counters {
    scenarios: usize,
    traces: usize,
    failures: usize,
}

/// Immutable view of the counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub scenarios: usize,
    pub traces: usize,
    pub failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    pub fn record_scenario(&self, traces: usize) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.scenarios += 1;
            counters.traces += traces;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .inner
            .lock()
            .map(|c| *c)
            .unwrap_or_default();
        MetricsSnapshot {
            scenarios: counters.scenarios,
            traces: counters.traces,
            failures: counters.failures,
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
