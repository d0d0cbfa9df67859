use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps the `rustfft` planner for forward/inverse reuse.
pub struct FftHelper {
    fwd: Arc<dyn Fft<f32>>,
    inv: Arc<dyn Fft<f32>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fwd = planner.plan_fft_forward(size);
        let inv = planner.plan_fft_inverse(size);
        Self { fwd, inv, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of a real signal, zero-padded to the planned size.
    pub fn forward(&self, input: &[f32]) -> Vec<Complex32> {
        let mut buffer: Vec<Complex32> = input
            .iter()
            .map(|&value| Complex32::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex32::zero());
        self.fwd.process(&mut buffer);
        buffer
    }

    /// In-place inverse transform with 1/N scaling.
    pub fn inverse(&self, spectrum: &mut [Complex32]) {
        self.inv.process(spectrum);
        let scale = 1.0 / self.size as f32;
        for value in spectrum.iter_mut() {
            *value *= scale;
        }
    }

    /// Inverse transform returning the real part only.
    pub fn inverse_real(&self, spectrum: &mut [Complex32]) -> Vec<f32> {
        self.inverse(spectrum);
        spectrum.iter().map(|c| c.re).collect()
    }

    /// Frequency in Hz represented by spectral bin `index` at `sample_rate_hz`,
    /// folding the negative-frequency half back onto the positive axis.
    pub fn bin_freq_hz(&self, index: usize, sample_rate_hz: f64) -> f64 {
        let folded = index.min(self.size - index);
        folded as f64 * sample_rate_hz / self.size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_returns_planned_length() {
        let helper = FftHelper::new(8);
        let output = helper.forward(&[1.0, 0.0, -1.0, 0.0]);
        assert_eq!(output.len(), 8);
    }

    #[test]
    fn round_trip_recovers_signal() {
        let helper = FftHelper::new(4);
        let input = [1.0, 2.0, 3.0, 4.0];
        let mut spectrum = helper.forward(&input);
        let output = helper.inverse_real(&mut spectrum);
        for (a, b) in input.iter().zip(&output) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn bin_frequencies_fold_at_nyquist() {
        let helper = FftHelper::new(10);
        assert_eq!(helper.bin_freq_hz(0, 100.0), 0.0);
        assert_eq!(helper.bin_freq_hz(1, 100.0), 10.0);
        assert_eq!(helper.bin_freq_hz(5, 100.0), 50.0);
        assert_eq!(helper.bin_freq_hz(9, 100.0), 10.0);
    }
}
